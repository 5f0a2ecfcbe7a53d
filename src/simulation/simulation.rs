// simulation/simulation.rs
// Contains the Simulation struct and the per-frame pipeline: adaptive capacity, quadtree
// rebuild, attractor fields, neighbourhood gravity, collisions and integration.

use ultraviolet::Vec2;

use super::{capacity, collision, forces};
use crate::attractor::Attractor;
use crate::config::{self, SimConfig};
use crate::diagnostics::{self, CollisionRate, FrameStats};
use crate::particle::Particle;
use crate::profile_scope;
use crate::quadtree::{Circle, Point, Quadtree, Rectangle};
use crate::snapshot::{AttractorView, FrameSnapshot, ParticleView};

pub struct Simulation {
    pub frame: usize,
    pub width: f32,
    pub height: f32,
    pub particles: Vec<Particle>,
    pub attractors: Vec<Attractor>,
    pub rng: fastrand::Rng,
    /// Node capacity used by the most recent frame.
    pub capacity: usize,
    /// Boundaries of the last frame's quadtree, kept only while tree drawing is on.
    pub tree: Vec<Rectangle>,
    pub stats: FrameStats,
    collision_rate: CollisionRate,
    neighbors: Vec<Point<usize>>,
}

impl Simulation {
    pub fn new(width: f32, height: f32, mut particles: Vec<Particle>, attractors: Vec<Attractor>, seed: u64) -> Self {
        for (i, particle) in particles.iter_mut().enumerate() {
            particle.id = i;
        }
        Self {
            frame: 0,
            width,
            height,
            particles,
            attractors,
            rng: fastrand::Rng::with_seed(seed),
            capacity: config::QUADTREE_MAX_CAPACITY,
            tree: Vec::new(),
            stats: FrameStats::default(),
            collision_rate: CollisionRate::default(),
            neighbors: Vec::new(),
        }
    }

    pub fn arena(&self) -> Rectangle {
        Rectangle::arena(self.width, self.height)
    }

    pub fn highlighted_count(&self) -> usize {
        diagnostics::count_highlighted(&self.particles)
    }

    pub fn kinetic_energy(&self) -> f32 {
        diagnostics::kinetic_energy(&self.particles)
    }

    /// FPS comes from the external frame clock, not from the physics.
    pub fn set_fps(&mut self, fps: f32) {
        self.stats.fps = fps;
    }

    /// Radial impulse around `center`, integrated on the next step.
    pub fn explode(&mut self, center: Vec2, force: f32, radius: f32) -> usize {
        forces::explode(&mut self.particles, center, force, radius)
    }

    /// Advance the simulation by one frame using the tunables in `config`.
    pub fn step(&mut self, config: &SimConfig) -> FrameStats {
        profile_scope!("frame");
        let config = config.sanitized();
        self.frame += 1;

        // Capacity follows last frame's clustering; afterwards the frame boundary
        // clears every particle's collision bookkeeping.
        let highlighted = self.highlighted_count();
        let factor = capacity::cluster_factor(highlighted, self.particles.len());
        self.capacity = capacity::adaptive_capacity(factor, config.min_capacity, config.max_capacity);
        for particle in &mut self.particles {
            particle.reset_collisions();
        }

        let mut tree = Quadtree::with_max_depth(self.arena(), self.capacity, config.max_depth);

        for attractor in &mut self.attractors {
            attractor.advance(self.width, self.height, self.frame, &mut self.rng);
        }

        let rejected = self.build_index(&mut tree);
        forces::apply_attractors(&self.attractors, &tree, &mut self.particles);
        let collisions = self.update_particles(&tree, &config);

        self.tree = if config.show_quadtree { tree.boundaries() } else { Vec::new() };

        self.stats = FrameStats {
            frame: self.frame,
            fps: self.stats.fps,
            capacity: self.capacity,
            highlighted,
            particle_count: self.particles.len(),
            kinetic_energy: self.kinetic_energy(),
            collisions,
            collisions_per_second: self.collision_rate.record(self.frame, collisions),
            rejected_points: rejected,
        };
        self.stats
    }

    fn build_index(&self, tree: &mut Quadtree<usize>) -> usize {
        profile_scope!("quadtree_build");
        let mut rejected = 0;
        for particle in &self.particles {
            if !tree.insert(Point::new(particle.pos, particle.id)) {
                log::trace!(
                    "frame {}: particle {} at ({:.2}, {:.2}) outside the index",
                    self.frame, particle.id, particle.pos.x, particle.pos.y
                );
                rejected += 1;
            }
        }
        rejected
    }

    fn update_particles(&mut self, tree: &Quadtree<usize>, config: &SimConfig) -> usize {
        profile_scope!("particles");
        let mut neighbors = std::mem::take(&mut self.neighbors);
        let mut collisions = 0;

        for i in 0..self.particles.len() {
            neighbors.clear();
            let range = Circle::new(self.particles[i].pos, config.gravity_range);
            tree.query_into(&range, &mut neighbors);

            forces::apply_gravity(&mut self.particles, i, &neighbors, config.gravity);
            self.particles[i].integrate_velocity();
            collisions += collision::resolve_contacts(&mut self.particles, i, &neighbors, config.restitution);

            let particle = &mut self.particles[i];
            particle.integrate_position();
            particle.bounce_off_walls(self.width, self.height, config.restitution);
        }

        self.neighbors = neighbors;
        collisions
    }

    /// Render hook: read-only view of the last completed frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            width: self.width,
            height: self.height,
            particles: self.particles.iter().map(ParticleView::from).collect(),
            attractors: self.attractors.iter().map(AttractorView::from).collect(),
            tree: self.tree.clone(),
            stats: self.stats,
        }
    }

    /// Reset particles whose state became non-finite. Returns how many were fixed.
    pub fn repair_invalid(&mut self) -> usize {
        let (cx, cy) = (self.width * 0.5, self.height * 0.5);
        let mut fixed = 0;
        for particle in &mut self.particles {
            let pos_ok = particle.pos.x.is_finite() && particle.pos.y.is_finite();
            let vel_ok = particle.vel.x.is_finite() && particle.vel.y.is_finite();
            let acc_ok = particle.acc.x.is_finite() && particle.acc.y.is_finite();
            if pos_ok && vel_ok && acc_ok {
                continue;
            }
            if !pos_ok {
                particle.pos = Vec2::new(cx, cy);
            }
            if !vel_ok {
                particle.vel = Vec2::zero();
            }
            particle.acc = Vec2::zero();
            fixed += 1;
        }
        fixed
    }
}
