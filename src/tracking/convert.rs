//! Pose conversion from the tracker's Z-up convention into engine space.

use bevy::math::{EulerRot, Mat3, Mat4, Quat, Vec3, Vec4};
use bevy::transform::components::Transform;

/// Axis permutation that swaps the tracker's Y and Z axes (Z-up to Y-up).
/// The matrix is its own inverse.
const ZUP_TO_YUP: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::Y, Vec4::W);

/// Per-frame conversion settings, passed by value so no UI state leaks into
/// the math.
#[derive(Clone, Copy, Debug)]
pub struct PoseConvert {
    /// Uniform meters-per-unit normalization applied to the raw position.
    pub scale: f32,
    /// Calibration offset added to the converted position.
    pub origin_offset: Vec3,
    /// Clear rotation to identity instead of extracting it.
    pub position_only: bool,
    /// Whether `origin_offset` is applied at all.
    pub apply_offset: bool,
}

impl Default for PoseConvert {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin_offset: Vec3::ZERO,
            position_only: false,
            apply_offset: true,
        }
    }
}

/// Convert a raw 6-float pose (xyz + Euler degrees, Z-up) to a local
/// [`Transform`].
pub fn zup_to_yup(raw: &[f32; 6], cfg: PoseConvert) -> Transform {
    let translation = Vec3::new(raw[0], raw[1], raw[2]) * cfg.scale;
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        raw[4].to_radians(),
        raw[3].to_radians(),
        raw[5].to_radians(),
    );

    let pose = Mat4::from_scale_rotation_translation(Vec3::ONE, rotation, translation);
    let m = ZUP_TO_YUP * pose;

    let mut translation = m.col(3).truncate();
    if cfg.apply_offset {
        translation += cfg.origin_offset;
    }

    let rotation = if cfg.position_only {
        Quat::IDENTITY
    } else {
        look_rotation(m.col(2).truncate(), m.col(1).truncate())
    };

    let scale = Vec3::new(
        m.col(0).truncate().length(),
        m.col(1).truncate().length(),
        m.col(2).truncate().length(),
    );

    Transform {
        translation,
        rotation,
        scale,
    }
}

/// Rotation whose forward axis points along `forward`, matching the
/// transformed basis columns of the permuted pose matrix.
fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let r = up.cross(f).normalize_or_zero();
    if r == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let u = f.cross(r);
    Quat::from_mat3(&Mat3::from_cols(r, u, f))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "expected {b}, got {a}");
    }

    #[test]
    fn identity_pose_only_swaps_axes() {
        let t = zup_to_yup(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], PoseConvert::default());
        // Tracker (x, y, z) lands at engine (x, z, y).
        assert_vec3_eq(t.translation, Vec3::new(1.0, 3.0, 2.0));
        // The only rotation left is the axis swap itself.
        assert_vec3_eq(t.rotation * Vec3::Z, Vec3::Y);
        assert_vec3_eq(t.rotation * Vec3::Y, Vec3::Z);
    }

    #[test]
    fn scale_and_offset_compose_in_order() {
        let cfg = PoseConvert {
            scale: 2.0,
            origin_offset: Vec3::new(1.0, 0.0, 0.0),
            ..Default::default()
        };
        let t = zup_to_yup(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], cfg);
        // Scaled to (2, 4, 6), permuted to (2, 6, 4), then offset.
        assert_vec3_eq(t.translation, Vec3::new(3.0, 6.0, 4.0));
    }

    #[test]
    fn offset_is_skipped_when_disabled() {
        let cfg = PoseConvert {
            origin_offset: Vec3::splat(10.0),
            apply_offset: false,
            ..Default::default()
        };
        let t = zup_to_yup(&[0.0, 1.0, 0.0, 0.0, 0.0, 0.0], cfg);
        assert_vec3_eq(t.translation, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn position_only_clears_rotation() {
        let cfg = PoseConvert {
            position_only: true,
            ..Default::default()
        };
        let t = zup_to_yup(&[0.0, 0.0, 0.0, 30.0, 45.0, 60.0], cfg);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn uniform_input_keeps_unit_scale() {
        let t = zup_to_yup(
            &[0.5, -1.0, 2.0, 10.0, 20.0, 30.0],
            PoseConvert::default(),
        );
        assert!((t.scale.x - 1.0).abs() < EPS);
        assert!((t.scale.y - 1.0).abs() < EPS);
        assert!((t.scale.z - 1.0).abs() < EPS);
    }

    #[test]
    fn rotated_pose_keeps_permuted_translation() {
        let t = zup_to_yup(&[1.0, 2.0, 3.0, 0.0, 90.0, 0.0], PoseConvert::default());
        // Rotation never leaks into the translation column.
        assert_vec3_eq(t.translation, Vec3::new(1.0, 3.0, 2.0));
    }
}
