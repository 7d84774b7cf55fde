pub mod drop;
pub mod error;
pub mod tracking;

pub use error::CaveError;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Adds the DTK tracker bridge and the supply-drop demo behaviour to an App.
///
/// The drop plugin expects `RapierPhysicsPlugin` to be installed by the app
/// so its raycasts have colliders to hit.
pub struct CavePlugins;

impl PluginGroup for CavePlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(tracking::CaveTrackingPlugin::default())
            .add(drop::CrateDropPlugin)
    }
}
