//! Probability-weighted placement of the drop point.

use bevy::math::Vec3;
use rand::Rng;

/// World units of lateral offset per unit of tier threshold.
pub const LATERAL_SCALE: f32 = 5.0;

/// Cumulative probability thresholds, ascending. Each tier maps to a fixed
/// lateral offset magnitude of `threshold * LATERAL_SCALE`.
#[derive(Clone, Debug)]
pub struct ProbabilityTable(Vec<f32>);

impl ProbabilityTable {
    pub fn new(mut thresholds: Vec<f32>) -> Self {
        thresholds.sort_by(f32::total_cmp);
        Self(thresholds)
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.0
    }

    /// Select the smallest tier whose threshold is at least `roll`.
    ///
    /// A roll beyond every threshold selects the *last* tier, giving the
    /// outer tier the leftover probability mass. That matches the installed
    /// behavior and is pinned by tests; it looks like an off-by-one rather
    /// than intent, so change it only together with the field calibration.
    pub fn select(&self, roll: f32) -> Option<(usize, f32)> {
        for (index, &threshold) in self.0.iter().enumerate() {
            if threshold >= roll {
                return Some((index, threshold));
            }
        }
        let index = self.0.len().checked_sub(1)?;
        Some((index, self.0[index]))
    }
}

impl Default for ProbabilityTable {
    /// One, two and three standard deviations of a normal drop pattern.
    fn default() -> Self {
        Self::new(vec![0.68, 0.95, 0.997])
    }
}

/// Offset `center` by a rolled tier, then snap the point to the ground.
///
/// `ground` resolves the surface under a point (cast from one unit above);
/// when nothing is hit the point falls back to the world origin's height.
/// The lateral sign of the x offset is a fair coin flip; the z offset is
/// always toward negative z.
pub fn scatter<R, F>(center: Vec3, table: &ProbabilityTable, rng: &mut R, ground: F) -> Vec3
where
    R: Rng + ?Sized,
    F: FnOnce(Vec3) -> Option<Vec3>,
{
    let roll = rng.gen::<f32>();
    let Some((_, threshold)) = table.select(roll) else {
        return center;
    };
    let lateral = threshold * LATERAL_SCALE;
    let x = if rng.gen::<f32>() < 0.5 {
        -lateral
    } else {
        lateral
    };

    let mut position = Vec3::new(center.x + x, center.y, center.z - lateral);
    position.y = ground(position).map_or(0.0, |hit| hit.y);
    position
}
