//! Session calibration values and the egui panel that edits them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::{TrackedHead, TrackedWand};

/// Session-only calibration, edited live through [`calibration_panel`].
/// Nothing here is persisted across runs.
#[derive(Resource, Clone, Copy)]
pub struct CalibrationState {
    /// Per-channel tracker latency compensation, in milliseconds.
    pub head_latency_ms: f32,
    pub hand_latency_ms: f32,
    pub ar_latency_ms: f32,
    /// Added to every converted position.
    pub origin_offset: Vec3,
    /// Uniform tracker-units-to-meters factor.
    pub scale: f32,
    pub turn_sensitivity: f32,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            head_latency_ms: 0.0,
            hand_latency_ms: 0.0,
            ar_latency_ms: 0.0,
            origin_offset: Vec3::ZERO,
            // assumes the world scale is in meters
            scale: 1.6,
            turn_sensitivity: 0.0,
        }
    }
}

pub const LATENCY_MAX_MS: f32 = 2000.0;
pub const SCALE_MAX: f32 = 5.0;
pub const TURN_SENSITIVITY_MAX: f32 = 10.0;

/// Raw text for the origin-offset fields. Kept separate from
/// [`CalibrationState`] so a half-typed number never corrupts the value.
#[derive(Resource)]
pub struct OffsetEntry {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for OffsetEntry {
    fn default() -> Self {
        Self {
            x: "0".into(),
            y: "0".into(),
            z: "0".into(),
        }
    }
}

/// Latency sliders, origin offset entry, scale and turn sensitivity, plus a
/// snapshot button that logs the current tracked positions.
pub fn calibration_panel(
    mut contexts: EguiContexts,
    mut calibration: ResMut<CalibrationState>,
    mut entry: ResMut<OffsetEntry>,
    head: Query<&GlobalTransform, With<TrackedHead>>,
    wand: Query<&GlobalTransform, With<TrackedWand>>,
) {
    let ctx = contexts.ctx_mut();

    egui::Window::new("Latency Controls").show(ctx, |ui| {
        ui.add(
            egui::Slider::new(&mut calibration.head_latency_ms, 0.0..=LATENCY_MAX_MS)
                .text("Head Latency (ms)"),
        );
        ui.add(
            egui::Slider::new(&mut calibration.hand_latency_ms, 0.0..=LATENCY_MAX_MS)
                .text("Cam Latency (ms)"),
        );
        ui.add(
            egui::Slider::new(&mut calibration.ar_latency_ms, 0.0..=LATENCY_MAX_MS)
                .text("AR Obj Latency (ms)"),
        );
    });

    egui::Window::new("CAVE Calibration").show(ctx, |ui| {
        ui.label("CAVE Origin Offset");
        ui.horizontal(|ui| {
            ui.label("x:");
            ui.text_edit_singleline(&mut entry.x);
            ui.label("y:");
            ui.text_edit_singleline(&mut entry.y);
            ui.label("z:");
            ui.text_edit_singleline(&mut entry.z);
        });
        // unparsable text keeps the previous value
        if let Ok(x) = entry.x.parse::<f32>() {
            calibration.origin_offset.x = x;
        }
        if let Ok(y) = entry.y.parse::<f32>() {
            calibration.origin_offset.y = y;
        }
        if let Ok(z) = entry.z.parse::<f32>() {
            calibration.origin_offset.z = z;
        }

        ui.add(egui::Slider::new(&mut calibration.scale, 0.0..=SCALE_MAX).text("Tracker Scaling"));
        ui.add(
            egui::Slider::new(&mut calibration.turn_sensitivity, 0.0..=TURN_SENSITIVITY_MAX)
                .text("Turn Sensitivity"),
        );

        if ui.button("Get Tracker Snapshot").clicked() {
            if let Ok(head) = head.get_single() {
                let p = head.translation();
                info!("head: {:.1}, {:.1}, {:.1}", p.x, p.y, p.z);
            }
            if let Ok(wand) = wand.get_single() {
                let p = wand.translation();
                info!("wand: {:.1}, {:.1}, {:.1}", p.x, p.y, p.z);
            }
            info!("-----------");
        }
    });
}
