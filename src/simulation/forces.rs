// simulation/forces.rs
// Force passes of a frame: neighbourhood gravity, attractor fields and explosion impulses.

use crate::attractor::Attractor;
use crate::particle::{pair_mut, Particle};
use crate::profile_scope;
use crate::quadtree::{Point, Quadtree};
use ultraviolet::Vec2;

/// Pull particle `i` towards every other neighbour returned by its range query.
///
/// Distances below [`MIN_DISTANCE`](crate::config::MIN_DISTANCE) are floored to it; partners sitting
/// exactly on the particle's centre are skipped.
pub fn apply_gravity(particles: &mut [Particle], i: usize, neighbors: &[Point<usize>], g: f32) -> usize {
    if g == 0.0 {
        return 0;
    }
    let mut applied = 0;
    for point in neighbors {
        let j = point.data;
        if j == i {
            continue;
        }
        let (particle, other) = pair_mut(particles, i, j);
        if other.pos == particle.pos {
            continue;
        }
        particle.attract_to(other, g);
        applied += 1;
    }
    applied
}

/// Let every attractor act on the particles the index finds inside its influence radius.
pub fn apply_attractors(attractors: &[Attractor], index: &Quadtree<usize>, particles: &mut [Particle]) -> usize {
    profile_scope!("attractors");
    attractors
        .iter()
        .map(|attractor| attractor.apply_force(index, particles))
        .sum()
}

/// Explosion impulse on the whole population. Returns how many particles were in range.
pub fn explode(particles: &mut [Particle], center: Vec2, force: f32, radius: f32) -> usize {
    let mut hit = 0;
    for particle in particles.iter_mut() {
        if (particle.pos - center).mag() <= radius {
            hit += 1;
        }
        particle.apply_explosion_force(center, force, radius);
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(particles: &[Particle], j: usize) -> Point<usize> {
        Point::new(particles[j].pos, j)
    }

    #[test]
    fn gravity_pulls_overlapping_neighbour_at_floor_distance() {
        let mut particles = vec![
            Particle::new(0, Vec2::new(50.0, 50.0), Vec2::zero(), 1.0),
            Particle::new(1, Vec2::new(50.6, 50.0), Vec2::zero(), 1.0),
        ];
        let neighbors = vec![point(&particles, 0), point(&particles, 1)];
        assert_eq!(apply_gravity(&mut particles, 0, &neighbors, 4.0), 1);
        assert!((particles[0].acc.x - 4.0).abs() < 1e-5, "acc = {:?}", particles[0].acc);
        assert_eq!(particles[1].acc, Vec2::zero());
    }

    #[test]
    fn gravity_skips_self_and_coincident_partners() {
        let mut particles = vec![
            Particle::new(0, Vec2::new(50.0, 50.0), Vec2::zero(), 1.0),
            Particle::new(1, Vec2::new(50.0, 50.0), Vec2::zero(), 1.0),
        ];
        let neighbors = vec![point(&particles, 0), point(&particles, 1)];
        assert_eq!(apply_gravity(&mut particles, 0, &neighbors, 4.0), 0);
        assert_eq!(particles[0].acc, Vec2::zero());
        assert_eq!(apply_gravity(&mut particles, 1, &neighbors, 0.0), 0);
    }
}
