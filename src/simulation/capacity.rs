// simulation/capacity.rs
// Maps how clustered the population is to the quadtree node capacity for the next frame.

use crate::config::CLUSTER_NORMALIZATION;

/// Fraction of particles that collided last frame, normalised so that 60% of
/// the population colliding saturates at 1.
pub fn cluster_factor(highlighted: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    // Dividing the fraction keeps exactly 60% at exactly 1.
    let fraction = highlighted as f32 / total as f32;
    (fraction / CLUSTER_NORMALIZATION).min(1.0)
}

/// Interpolate from `max` (sparse) down to `min` (clustered), snap to the
/// nearest power of two and clamp back into `[min, max]`.
pub fn adaptive_capacity(cluster_factor: f32, min: usize, max: usize) -> usize {
    let min = min.max(1);
    let max = max.max(min);
    let factor = if cluster_factor.is_finite() {
        cluster_factor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let raw = max as f32 - (max - min) as f32 * factor;
    let exponent = raw.log2().round().max(0.0) as u32;
    let power_of_two = 1usize.checked_shl(exponent).unwrap_or(max);
    power_of_two.clamp(min, max)
}
