// Defines the particle struct (position, velocity, acceleration, mass, radius) and its methods
// for force accumulation, integration, wall reflection and pairwise collision resolution.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::config;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    /// Index of the particle in the simulation's particle vector.
    pub id: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub max_speed: f32,
    /// Set when the particle collided during the current frame.
    pub highlighted: bool,
    /// Ids of the partners already resolved against this frame.
    pub collided_with: SmallVec<[usize; 4]>,
}

impl Particle {
    pub fn new(id: usize, pos: Vec2, vel: Vec2, mass: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            acc: Vec2::zero(),
            mass,
            radius: Self::radius_for_mass(mass),
            max_speed: config::DEFAULT_MAX_SPEED,
            highlighted: false,
            collided_with: SmallVec::new(),
        }
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn radius_for_mass(mass: f32) -> f32 {
        config::RADIUS_SCALE * mass.sqrt()
    }

    pub fn speed(&self) -> f32 {
        self.vel.mag()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force / self.mass;
    }

    /// Radial push away from `center` that fades linearly to zero at `radius`.
    pub fn apply_explosion_force(&mut self, center: Vec2, force: f32, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let d = self.pos - center;
        let distance = d.mag();
        if distance > radius {
            return;
        }
        let distance = distance.max(config::MIN_DISTANCE);
        let magnitude = force * (1.0 - distance / radius).max(0.0);
        self.apply_force(d / distance * magnitude);
    }

    /// Newtonian pull `g * m1 * m2 / d^2` towards `other`, with `d` floored
    /// at [`config::MIN_DISTANCE`]. Coincident centres have no direction and
    /// exert nothing.
    pub fn attract_to(&mut self, other: &Particle, g: f32) {
        let d = other.pos - self.pos;
        let distance = d.mag();
        if distance == 0.0 {
            return;
        }
        let floored = distance.max(config::MIN_DISTANCE);
        let force = g * self.mass * other.mass / (floored * floored);
        self.apply_force(d / distance * force);
    }

    pub fn limit_speed(&mut self) {
        let speed = self.speed();
        if speed > self.max_speed {
            self.vel = self.vel / speed * self.max_speed;
        }
    }

    /// `v += a`, cap the speed and clear the accumulator.
    pub fn integrate_velocity(&mut self) {
        self.vel += self.acc;
        self.limit_speed();
        self.acc = Vec2::zero();
    }

    pub fn integrate_position(&mut self) {
        self.pos += self.vel;
    }

    /// Reflect off the arena walls, losing energy according to `cor`.
    pub fn bounce_off_walls(&mut self, width: f32, height: f32, cor: f32) {
        let r = self.radius;
        if self.pos.x - r < 0.0 || self.pos.x + r > width {
            self.vel.x *= -cor;
            self.pos.x = self.pos.x.max(r).min(width - r);
        }
        if self.pos.y - r < 0.0 || self.pos.y + r > height {
            self.vel.y *= -cor;
            self.pos.y = self.pos.y.max(r).min(height - r);
        }
    }

    pub fn intersects(&self, other: &Particle) -> bool {
        let r = self.radius + other.radius;
        (other.pos - self.pos).mag_sq() < r * r
    }

    pub fn has_collided_with(&self, id: usize) -> bool {
        self.collided_with.contains(&id)
    }

    /// Separate two overlapping particles and exchange momentum along the
    /// line of centres. Normal components are scaled by `cor`; tangential
    /// components are kept.
    pub fn resolve_collision(&mut self, other: &mut Particle, cor: f32) {
        let d = other.pos - self.pos;
        let distance = d.mag();
        let normal = if distance > 0.0 { d / distance } else { Vec2::new(1.0, 0.0) };

        let overlap = (self.radius + other.radius - distance) * 0.5;
        let separation = normal * overlap;
        self.pos -= separation;
        other.pos += separation;

        let tangent = Vec2::new(-normal.y, normal.x);
        let tan1 = self.vel.dot(tangent);
        let tan2 = other.vel.dot(tangent);
        let norm1 = self.vel.dot(normal);
        let norm2 = other.vel.dot(normal);

        let m1 = self.mass;
        let m2 = other.mass;
        let total = m1 + m2;
        let new_norm1 = (norm1 * (m1 - m2) + 2.0 * m2 * norm2) / total;
        let new_norm2 = (norm2 * (m2 - m1) + 2.0 * m1 * norm1) / total;

        self.vel = tangent * tan1 + normal * (new_norm1 * cor);
        other.vel = tangent * tan2 + normal * (new_norm2 * cor);

        self.limit_speed();
        other.limit_speed();

        self.collided_with.push(other.id);
        other.collided_with.push(self.id);
        self.highlighted = true;
        other.highlighted = true;
    }

    pub fn reset_collisions(&mut self) {
        self.collided_with.clear();
        self.highlighted = false;
    }
}

/// Mutable access to two distinct particles of the same slice.
pub fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    assert_ne!(i, j, "pair_mut needs two distinct indices");
    if i < j {
        let (head, tail) = particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = particles.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
