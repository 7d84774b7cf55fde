//! Supply-crate drop: mouse targeting, probability scatter and descent.

pub mod targeting;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin};
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use targeting::{scatter, ProbabilityTable};

/// Descent time constant in seconds. The crate position is a lerp from the
/// start pose parameterized by elapsed time over this constant, so the
/// approach is asymptotic-feeling and ends exactly on the target.
pub const DROP_DURATION_SECS: f32 = 10.0;

/// Where the crate appears relative to the target when released.
pub const DROP_START_OFFSET: Vec3 = Vec3::new(-30.0, 200.0, 0.0);

/// Height added above the ground hit when committing a clicked target.
const CLICK_CLEARANCE: f32 = 0.5;

/// The crate being dropped. Hidden until a target is committed.
#[derive(Component)]
pub struct SupplyCrate;

/// Marks the beacon indicating the requested drop point.
#[derive(Component)]
pub struct DropBeacon;

#[derive(Resource)]
pub struct DropState {
    /// F1: show the coordinate-entry window instead of mouse aiming.
    pub coordinate_entry: bool,
    /// F2: drop exactly on the aimed point instead of scattering.
    pub accurate: bool,
    /// A target has been committed and the crate is descending.
    pub committed: bool,
    pub target: Vec3,
}

impl Default for DropState {
    fn default() -> Self {
        Self {
            coordinate_entry: false,
            accurate: true,
            committed: false,
            target: Vec3::ZERO,
        }
    }
}

/// Shared generator for the probability rolls. No seeding contract; tests
/// seed their own.
#[derive(Resource)]
pub struct DropRng(pub StdRng);

impl Default for DropRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

#[derive(Resource, Default)]
pub struct DropTable(pub ProbabilityTable);

/// Raw text for the coordinate-entry fields.
#[derive(Resource, Default)]
pub struct CoordinateEntry {
    pub x: String,
    pub y: String,
    pub z: String,
}

pub struct CrateDropPlugin;

impl Plugin for CrateDropPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        app.init_resource::<DropState>()
            .init_resource::<DropRng>()
            .init_resource::<DropTable>()
            .init_resource::<CoordinateEntry>()
            .add_systems(
                Update,
                (
                    keyboard_toggles,
                    aim_with_mouse,
                    coordinate_entry_window,
                    release_crate,
                )
                    .chain(),
            );
    }
}

fn keyboard_toggles(
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<DropState>,
    mut crates: Query<&mut Visibility, With<SupplyCrate>>,
) {
    if keys.just_pressed(KeyCode::F1) {
        state.coordinate_entry = !state.coordinate_entry;
    } else if keys.just_pressed(KeyCode::F2) {
        state.accurate = !state.accurate;
    } else if keys.just_pressed(KeyCode::F3) {
        state.committed = false;
        for mut visibility in &mut crates {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Cast the camera-to-cursor ray, draw it, and commit the hit on click.
fn aim_with_mouse(
    mut state: ResMut<DropState>,
    buttons: Res<ButtonInput<MouseButton>>,
    rapier: Res<RapierContext>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    table: Res<DropTable>,
    mut rng: ResMut<DropRng>,
    mut gizmos: Gizmos,
) {
    if state.committed || state.coordinate_entry {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let Some((_, toi)) = rapier.cast_ray(
        ray.origin,
        *ray.direction,
        f32::MAX,
        true,
        QueryFilter::default(),
    ) else {
        return;
    };
    let hit = ray.origin + *ray.direction * toi;
    gizmos.line(ray.origin, hit, Color::YELLOW);

    if buttons.just_pressed(MouseButton::Left) {
        let mut point = hit;
        point.y = ground_snap(&rapier, point).map_or(0.0, |p| p.y) + CLICK_CLEARANCE;

        state.target = if state.accurate {
            point
        } else {
            scatter(point, &table.0, &mut rng.0, |p| ground_snap(&rapier, p))
        };
        state.committed = true;
        info!("drop target committed at {}", state.target);
    }
}

/// First surface under `point`, cast downward from one unit above it.
fn ground_snap(rapier: &RapierContext, point: Vec3) -> Option<Vec3> {
    let origin = point + Vec3::Y;
    let (_, toi) = rapier.cast_ray(origin, -Vec3::Y, f32::MAX, true, QueryFilter::default())?;
    Some(origin - Vec3::Y * toi)
}

fn coordinate_entry_window(
    mut contexts: EguiContexts,
    mut entry: ResMut<CoordinateEntry>,
    mut state: ResMut<DropState>,
) {
    if !state.coordinate_entry {
        return;
    }
    egui::Window::new("Drop Coordinates").show(contexts.ctx_mut(), |ui| {
        ui.text_edit_singleline(&mut entry.x);
        ui.text_edit_singleline(&mut entry.y);
        ui.text_edit_singleline(&mut entry.z);

        if ui.button("Drop Crate").clicked() {
            // commit only when all three parse; otherwise ignore the press
            if let (Ok(x), Ok(y), Ok(z)) = (
                entry.x.parse::<f32>(),
                entry.y.parse::<f32>(),
                entry.z.parse::<f32>(),
            ) {
                state.target = Vec3::new(x, y, z);
                state.committed = true;
            }
        }
    });
}

fn release_crate(
    time: Res<Time>,
    state: Res<DropState>,
    mut crates: Query<(&mut Transform, &mut Visibility), With<SupplyCrate>>,
) {
    if !state.committed {
        return;
    }
    for (mut transform, mut visibility) in &mut crates {
        *visibility = Visibility::Visible;
        transform.translation = descent_position(state.target, time.elapsed_seconds());
    }
}

/// Lerp from the offset start pose toward the target. `elapsed` is time
/// since app start, not since commit, mirroring the installed behavior.
fn descent_position(target: Vec3, elapsed: f32) -> Vec3 {
    let delta = (elapsed / DROP_DURATION_SECS).min(1.0);
    (target + DROP_START_OFFSET).lerp(target, delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descent_starts_at_the_offset_pose() {
        let target = Vec3::new(4.0, 1.0, -2.0);
        assert_eq!(descent_position(target, 0.0), target + DROP_START_OFFSET);
    }

    #[test]
    fn descent_ends_on_the_target() {
        let target = Vec3::new(4.0, 1.0, -2.0);
        assert_eq!(descent_position(target, DROP_DURATION_SECS), target);
        // Unity's Lerp clamps t, so overshoot never happens.
        assert_eq!(descent_position(target, DROP_DURATION_SECS * 3.0), target);
    }

    #[test]
    fn descent_closes_distance_monotonically() {
        let target = Vec3::new(0.0, 0.0, 0.0);
        let mut last = f32::MAX;
        for step in 0..=10 {
            let elapsed = step as f32;
            let distance = descent_position(target, elapsed).distance(target);
            assert!(distance <= last);
            last = distance;
        }
    }

    #[test]
    fn drop_state_defaults_to_accurate_mouse_mode() {
        let state = DropState::default();
        assert!(state.accurate);
        assert!(!state.coordinate_entry);
        assert!(!state.committed);
    }
}
