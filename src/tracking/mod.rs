//! Bridge between the DTK native tracking plugin and scene objects.
//!
//! Once per frame the plugin polls the native library three times, one poll
//! per latency-compensated channel (head, hand/camera, AR object), converts
//! the samples from the tracker's Z-up convention and writes them onto the
//! tracked entities. Any fault during polling skips the rest of the frame's
//! update; there is no retry.

pub mod calibration;
pub mod convert;
pub mod dtk;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use calibration::{CalibrationState, OffsetEntry};
use convert::{zup_to_yup, PoseConvert};
use dtk::{epoch_ms, DtkLibrary};

/// Head-mounted display target. Driven position-only; CAVE walls supply
/// the view rotation.
#[derive(Component)]
pub struct TrackedHead;

/// Wand (hand controller) target, driven with full pose.
#[derive(Component)]
pub struct TrackedWand;

/// Augmented-reality overlay object fed from the third poll channel.
#[derive(Component)]
pub struct ArDisplay;

/// Handle to the loaded native library, `None` when loading failed and the
/// bridge is inert.
#[derive(Resource, Default)]
pub struct DtkConnection(pub Option<DtkLibrary>);

#[derive(Default)]
pub struct CaveTrackingPlugin {
    /// Ask the plugin to also track the hand device.
    pub include_hand: bool,
}

#[derive(Resource, Clone, Copy)]
struct TrackerSettings {
    include_hand: bool,
}

impl Plugin for CaveTrackingPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        app.insert_resource(TrackerSettings {
            include_hand: self.include_hand,
        })
        .init_resource::<CalibrationState>()
        .init_resource::<OffsetEntry>()
        .init_resource::<DtkConnection>()
        .add_systems(Startup, load_trackers)
        .add_systems(PreUpdate, poll_trackers)
        .add_systems(Update, calibration::calibration_panel);
    }
}

fn load_trackers(mut connection: ResMut<DtkConnection>, settings: Res<TrackerSettings>) {
    info!("attempting to load trackers");
    match DtkLibrary::load(DtkLibrary::DEFAULT_NAME, settings.include_hand) {
        Ok(lib) => {
            connection.0 = Some(lib);
            info!("trackers initialized");
        }
        Err(err) => {
            // Not fatal: the installation also runs untracked on desks.
            warn!("tracking disabled: {err}");
        }
    }
}

/// Per-frame poll of the three latency-compensated channels.
///
/// The head channel drives the head (position-only) and the wand (full
/// pose). The hand and AR channels are polled at their own timestamps to
/// keep the plugin's history window warm; AR compositors downstream read
/// those samples through their own bridges.
fn poll_trackers(
    connection: Res<DtkConnection>,
    calibration: Res<CalibrationState>,
    mut head: Query<&mut Transform, (With<TrackedHead>, Without<TrackedWand>)>,
    mut wand: Query<&mut Transform, (With<TrackedWand>, Without<TrackedHead>)>,
) {
    let Some(lib) = connection.0.as_ref() else {
        return;
    };
    let now = match epoch_ms() {
        Ok(now) => now,
        Err(err) => {
            warn!("error with getting tracker data: {err}");
            return;
        }
    };

    let sample = match lib.poll(now - calibration.head_latency_ms as i64) {
        Ok(sample) => sample,
        Err(err) => {
            warn!("error with getting tracker data: {err}");
            return;
        }
    };

    let base = PoseConvert {
        scale: calibration.scale,
        origin_offset: calibration.origin_offset,
        ..Default::default()
    };

    if let Ok(mut transform) = head.get_single_mut() {
        *transform = zup_to_yup(
            &sample.head.data,
            PoseConvert {
                position_only: true,
                ..base
            },
        );
    }
    if let Ok(mut transform) = wand.get_single_mut() {
        *transform = zup_to_yup(&sample.wand.data, base);
    }

    for latency in [calibration.hand_latency_ms, calibration.ar_latency_ms] {
        if let Err(err) = lib.poll(now - latency as i64) {
            warn!("error with getting tracker data: {err}");
            return;
        }
    }
}
