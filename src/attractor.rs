// Autonomous field sources ("black holes" and "white holes") that pull in or push away
// particles inside their influence radius while drifting around the arena.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::config;
use crate::particle::Particle;
use crate::quadtree::{Circle, Quadtree};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attractor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub influence_radius: f32,
    /// `false` turns the attractor into a repulsor.
    pub attracting: bool,
}

impl Attractor {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32, radius: f32, attracting: bool) -> Self {
        Self {
            pos,
            vel,
            mass,
            radius,
            influence_radius: radius * config::INFLUENCE_RADIUS_FACTOR,
            attracting,
        }
    }

    /// Force `mass / d^2` exerted on a particle at `target`, or `None` outside
    /// the open band between the body radius and the influence radius.
    pub fn force_on(&self, target: Vec2) -> Option<Vec2> {
        let d = self.pos - target;
        let distance = d.mag();
        if distance <= self.radius || distance >= self.influence_radius {
            return None;
        }
        let force = d / distance * (self.mass / (distance * distance));
        Some(if self.attracting { force } else { -force })
    }

    /// Apply the field to every particle the index reports inside the influence radius.
    pub fn apply_force(&self, index: &Quadtree<usize>, particles: &mut [Particle]) -> usize {
        let mut affected = 0;
        for point in index.query(&Circle::new(self.pos, self.influence_radius)) {
            let particle = &mut particles[point.data];
            if let Some(force) = self.force_on(particle.pos) {
                particle.apply_force(force);
                affected += 1;
            }
        }
        affected
    }

    /// Drift by the current velocity, take a random nudge on a fixed cadence
    /// and bounce off the arena walls.
    pub fn advance(&mut self, width: f32, height: f32, frame: usize, rng: &mut fastrand::Rng) {
        self.pos += self.vel;

        if frame % config::ATTRACTOR_NUDGE_INTERVAL == 0 {
            self.vel.x += (rng.f32() * 2.0 - 1.0) * config::ATTRACTOR_NUDGE;
            self.vel.y += (rng.f32() * 2.0 - 1.0) * config::ATTRACTOR_NUDGE;
        }

        let r = self.radius;
        if self.pos.x - r < 0.0 || self.pos.x + r > width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.max(r).min(width - r);
        }
        if self.pos.y - r < 0.0 || self.pos.y + r > height {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.max(r).min(height - r);
        }
    }
}
