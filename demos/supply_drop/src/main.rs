use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_cave::CavePlugins;
use bevy_rapier3d::prelude::*;

mod setup;
use crate::setup::setup_scene;

fn main() {
    color_eyre::install().unwrap();

    info!("Running bevy_cave supply drop demo");
    App::new()
        .add_plugins(DefaultPlugins)
        //lets get the usual diagnostic stuff added
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin)
        //physics for the targeting raycasts
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        //tracker bridge + crate drop
        .add_plugins(CavePlugins)
        .add_systems(Startup, setup_scene)
        .run();
}
