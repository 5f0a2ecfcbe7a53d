// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};

// ====================
// Arena & Population
// ====================
pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;
pub const DEFAULT_PARTICLE_COUNT: usize = 800;
pub const DEFAULT_MASS_MIN: f32 = 0.5;
pub const DEFAULT_MASS_MAX: f32 = 5.0;
/// Initial velocity components are drawn from `[-v, v]`.
pub const DEFAULT_INITIAL_SPEED: f32 = 1.0;
pub const DEFAULT_SEED: u64 = 0x5eed;

// ====================
// Particle Parameters
// ====================
/// Particle radius is `RADIUS_SCALE * sqrt(mass)`.
pub const RADIUS_SCALE: f32 = 4.0;
pub const DEFAULT_MAX_SPEED: f32 = 8.0;
/// Distances below this are treated as degenerate when used as a divisor.
pub const MIN_DISTANCE: f32 = 1.0;

// ====================
// Physics Tunables
// ====================
pub const DEFAULT_RESTITUTION: f32 = 0.89;
pub const RESTITUTION_RANGE: (f32, f32) = (0.0, 1.0);
pub const DEFAULT_GRAVITY: f32 = 4.0;
pub const GRAVITY_RANGE: (f32, f32) = (0.0, 10.0);
/// Radius of the neighbourhood each particle gathers gravity and contacts from.
pub const DEFAULT_GRAVITY_RANGE: f32 = 100.0;
pub const DEFAULT_EXPLOSION_FORCE: f32 = 200.0;
pub const DEFAULT_EXPLOSION_RADIUS: f32 = 100.0;

// ====================
// Attractor Parameters
// ====================
pub const INFLUENCE_RADIUS_FACTOR: f32 = 5.0;
/// Attractors get a random velocity nudge every this many frames.
pub const ATTRACTOR_NUDGE_INTERVAL: usize = 60;
pub const ATTRACTOR_NUDGE: f32 = 1.0;

// ====================
// Quadtree Parameters
// ====================
pub const QUADTREE_MIN_CAPACITY: usize = 4;
pub const QUADTREE_MAX_CAPACITY: usize = 64;
pub const QUADTREE_MAX_DEPTH: usize = 16;
/// Share of the population that must be colliding for the cluster factor to saturate.
pub const CLUSTER_NORMALIZATION: f32 = 0.6;

// ====================
// Frame Clock & Diagnostics
// ====================
pub const TARGET_FPS: f32 = 60.0;
/// Collision counts roll over every this many frames.
pub const COLLISION_WINDOW_FRAMES: usize = 60;
/// Frame times averaged by the FPS readout.
pub const FPS_WINDOW_FRAMES: usize = 30;
pub const DEFAULT_REPORT_EVERY: usize = 60;

// ====================
// Threading
// ====================
pub const MIN_THREADS: usize = 3;
pub const THREADS_LEAVE_FREE: usize = 2;

/// Tunables read by the physics step. Sampled once at the start of a frame
/// and held constant until the frame completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Coefficient of restitution (`cor`), 1 = elastic, 0 = fully inelastic.
    pub restitution: f32,
    /// Gravitational constant `G`.
    pub gravity: f32,
    pub gravity_range: f32,
    pub explosion_force: f32,
    pub explosion_radius: f32,
    pub min_capacity: usize,
    pub max_capacity: usize,
    pub max_depth: usize,
    /// Only affects the render snapshot, never the physics.
    pub show_quadtree: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            restitution: DEFAULT_RESTITUTION,
            gravity: DEFAULT_GRAVITY,
            gravity_range: DEFAULT_GRAVITY_RANGE,
            explosion_force: DEFAULT_EXPLOSION_FORCE,
            explosion_radius: DEFAULT_EXPLOSION_RADIUS,
            min_capacity: QUADTREE_MIN_CAPACITY,
            max_capacity: QUADTREE_MAX_CAPACITY,
            max_depth: QUADTREE_MAX_DEPTH,
            show_quadtree: false,
        }
    }
}

impl SimConfig {
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Clamp every value into its legal range.
    pub fn sanitized(&self) -> Self {
        let min_capacity = self.min_capacity.max(1);
        Self {
            restitution: clamp_or(self.restitution, RESTITUTION_RANGE, DEFAULT_RESTITUTION),
            gravity: clamp_or(self.gravity, GRAVITY_RANGE, DEFAULT_GRAVITY),
            gravity_range: self.gravity_range.max(0.0),
            explosion_force: self.explosion_force.max(0.0),
            explosion_radius: self.explosion_radius.max(0.0),
            min_capacity,
            max_capacity: self.max_capacity.max(min_capacity),
            max_depth: self.max_depth,
            show_quadtree: self.show_quadtree,
        }
    }
}

fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(lo).min(hi)
    } else {
        fallback
    }
}
