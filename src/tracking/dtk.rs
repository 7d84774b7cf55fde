//! Runtime bindings for the vendor `dtkPlugin` tracking library.
//!
//! The library exposes two entry points: `init(bool)` and
//! `getData(i64, *mut SensorData)`. The record layouts below are part of the
//! plugin's ABI; field order and sizes must not change.

use std::time::{SystemTime, UNIX_EPOCH};

use libloading::{Library, Symbol};

use crate::error::{CaveError, Result};

/// Pose block for a generic tracked device: xyz position followed by Euler
/// angles, in the tracker's Z-up axis convention.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct GenericTrackerData {
    pub data: [f32; 6],
}

/// Wand pose block plus joystick axes and a button bitfield.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct WandTrackerData {
    pub data: [f32; 6],
    pub joystick: [f32; 2],
    pub buttons: u8,
}

/// One complete sample as written by the native plugin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct SensorData {
    pub timestamp: i64,
    pub head: GenericTrackerData,
    pub wand: WandTrackerData,
    pub generics: [GenericTrackerData; 1],
}

type InitFn = unsafe extern "C" fn(bool);
type GetDataFn = unsafe extern "C" fn(i64, *mut SensorData);

/// Loaded handle to the native tracking plugin.
///
/// Every [`poll`](Self::poll) fills a fresh stack-local [`SensorData`] and
/// returns it by value. The original bridge reused one unmanaged buffer for
/// all polls in a frame, so a later poll could overwrite a sample still
/// pending use; per-poll buffering removes that hazard.
pub struct DtkLibrary {
    lib: Library,
}

impl DtkLibrary {
    /// Platform library name, resolved through the loader search path.
    pub const DEFAULT_NAME: &'static str = "dtkPlugin";

    /// Load the plugin and run its initializer.
    ///
    /// `include_hand` asks the plugin to also track the hand device.
    pub fn load(name: &str, include_hand: bool) -> Result<Self> {
        let path = libloading::library_filename(name);
        let lib = unsafe { Library::new(path) }.map_err(CaveError::LibraryLoad)?;
        let this = Self { lib };
        unsafe {
            let init = this.symbol::<InitFn>("init")?;
            init(include_hand);
        }
        Ok(this)
    }

    /// Fetch tracker state as of `at_ms` (unix epoch milliseconds).
    ///
    /// The plugin keeps a short history window, so passing `now - latency`
    /// yields latency-compensated samples.
    pub fn poll(&self, at_ms: i64) -> Result<SensorData> {
        let mut sample = SensorData::default();
        unsafe {
            let get_data = self.symbol::<GetDataFn>("getData")?;
            get_data(at_ms, &mut sample);
        }
        Ok(sample)
    }

    unsafe fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>> {
        self.lib
            .get(name.as_bytes())
            .map_err(|source| CaveError::MissingSymbol {
                symbol: name,
                source,
            })
    }
}

/// Milliseconds since the unix epoch, the plugin's query timebase.
pub fn epoch_ms() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| CaveError::ClockBeforeEpoch)?;
    Ok(elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn record_layout_matches_plugin_abi() {
        assert_eq!(size_of::<GenericTrackerData>(), 24);
        assert_eq!(size_of::<WandTrackerData>(), 36);
        assert_eq!(size_of::<SensorData>(), 96);

        assert_eq!(offset_of!(SensorData, timestamp), 0);
        assert_eq!(offset_of!(SensorData, head), 8);
        assert_eq!(offset_of!(SensorData, wand), 32);
        assert_eq!(offset_of!(SensorData, generics), 68);
        assert_eq!(offset_of!(WandTrackerData, joystick), 24);
        assert_eq!(offset_of!(WandTrackerData, buttons), 32);
    }

    // Stands in for the native getData: writes the query timestamp over the
    // whole record, like the plugin overwriting its output buffer.
    unsafe extern "C" fn fill_sample(at_ms: i64, out: *mut SensorData) {
        (*out).timestamp = at_ms;
        (*out).head.data = [at_ms as f32; 6];
        (*out).wand.data = [-(at_ms as f32); 6];
    }

    #[test]
    fn per_poll_buffers_survive_later_polls() {
        // Two polls the way DtkLibrary issues them: each into its own local.
        let mut first = SensorData::default();
        let mut second = SensorData::default();
        unsafe {
            fill_sample(100, &mut first);
            fill_sample(200, &mut second);
        }

        // With the original's single shared buffer the second call would
        // have clobbered the first sample before it was consumed.
        assert_eq!(first.timestamp, 100);
        assert_eq!(first.head.data, [100.0; 6]);
        assert_eq!(second.timestamp, 200);
    }

    #[test]
    fn epoch_ms_is_monotonic_enough() {
        let a = epoch_ms().unwrap();
        let b = epoch_ms().unwrap();
        assert!(b >= a);
        // Sanity: later than 2020-01-01.
        assert!(a > 1_577_836_800_000);
    }
}
