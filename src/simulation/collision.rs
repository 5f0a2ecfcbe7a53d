// simulation/collision.rs
// Contact detection and resolution against the neighbour set gathered for gravity.

use crate::particle::{pair_mut, Particle};
use crate::quadtree::Point;

/// Resolve every contact of particle `i` with its neighbours. A pair is
/// resolved at most once per frame; the partner's id is recorded on both sides.
pub fn resolve_contacts(particles: &mut [Particle], i: usize, neighbors: &[Point<usize>], cor: f32) -> usize {
    let mut resolved = 0;
    for point in neighbors {
        let j = point.data;
        if j == i {
            continue;
        }
        let (particle, other) = pair_mut(particles, i, j);
        if particle.has_collided_with(other.id) || !particle.intersects(other) {
            continue;
        }
        particle.resolve_collision(other, cor);
        resolved += 1;
    }
    resolved
}
