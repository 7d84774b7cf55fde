use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaveError {
    #[error("failed to load dtk plugin library: {0}")]
    LibraryLoad(#[source] libloading::Error),
    #[error("dtk plugin is missing symbol `{symbol}`: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
    #[error("system clock is before the unix epoch")]
    ClockBeforeEpoch,
}

pub type Result<T> = std::result::Result<T, CaveError>;
