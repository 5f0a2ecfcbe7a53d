// diagnostics.rs
// Observational statistics derived from the simulation every frame. Nothing in here
// feeds back into the physics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use crate::config;
use crate::particle::Particle;

/// Per-frame numbers exposed to the HUD / log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: usize,
    pub fps: f32,
    /// Quadtree node capacity used this frame.
    pub capacity: usize,
    /// Particles flagged as collided in the previous frame.
    pub highlighted: usize,
    pub particle_count: usize,
    pub kinetic_energy: f32,
    /// Collisions resolved this frame.
    pub collisions: usize,
    /// Collisions counted over the last completed window.
    pub collisions_per_second: usize,
    /// Particles that fell outside the index this frame.
    pub rejected_points: usize,
}

const ENERGY_CHUNK: usize = 256;

/// Total kinetic energy `sum(0.5 * m * |v|^2)`.
///
/// Partial sums run over fixed chunks and are combined in order, so the result
/// does not depend on how rayon schedules the work.
pub fn kinetic_energy(particles: &[Particle]) -> f32 {
    let partials: Vec<f32> = particles
        .par_chunks(ENERGY_CHUNK)
        .map(|chunk| chunk.iter().map(Particle::kinetic_energy).sum::<f32>())
        .collect();
    partials.into_iter().sum()
}

pub fn count_highlighted(particles: &[Particle]) -> usize {
    particles.iter().filter(|p| p.highlighted).count()
}

/// Rolling collision counter. Accumulates collisions and publishes the total
/// once every `window` frames, like a once-per-second readout at 60 fps.
#[derive(Clone, Debug)]
pub struct CollisionRate {
    window: usize,
    current: usize,
    last_total: usize,
}

impl CollisionRate {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            current: 0,
            last_total: 0,
        }
    }

    /// Add this frame's collisions; rolls the window over when `frame` hits the cadence.
    pub fn record(&mut self, frame: usize, collisions: usize) -> usize {
        self.current += collisions;
        if frame % self.window == 0 {
            self.last_total = self.current;
            self.current = 0;
        }
        self.last_total
    }

    pub fn per_window(&self) -> usize {
        self.last_total
    }
}

impl Default for CollisionRate {
    fn default() -> Self {
        Self::new(config::COLLISION_WINDOW_FRAMES)
    }
}

/// Frames-per-second from the external frame clock, averaged over a short window.
#[derive(Clone, Debug)]
pub struct FpsMeter {
    window: usize,
    samples: VecDeque<Duration>,
}

impl FpsMeter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            samples: VecDeque::new(),
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        self.samples.push_back(frame_time);
        if self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    pub fn fps(&self) -> f32 {
        let total: Duration = self.samples.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.samples.len() as f32 / total.as_secs_f32()
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(config::FPS_WINDOW_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec2;

    #[test]
    fn kinetic_energy_sums_particles() {
        let particles = vec![
            Particle::new(0, Vec2::zero(), Vec2::new(3.0, 4.0), 2.0),
            Particle::new(1, Vec2::zero(), Vec2::new(1.0, 0.0), 4.0),
        ];
        assert!((kinetic_energy(&particles) - 27.0).abs() < 1e-5);
        assert_eq!(kinetic_energy(&[]), 0.0);
    }

    #[test]
    fn kinetic_energy_is_reproducible() {
        let particles: Vec<Particle> = (0..2000)
            .map(|i| {
                let v = Vec2::new((i % 17) as f32 * 0.37 - 3.0, (i % 11) as f32 * 0.53 - 2.5);
                Particle::new(i, Vec2::zero(), v, 0.5 + (i % 7) as f32 * 0.61)
            })
            .collect();
        let serial: f32 = particles
            .chunks(ENERGY_CHUNK)
            .map(|c| c.iter().map(Particle::kinetic_energy).sum::<f32>())
            .sum();
        for _ in 0..20 {
            assert_eq!(kinetic_energy(&particles).to_bits(), serial.to_bits());
        }
    }

    #[test]
    fn fps_meter_has_its_own_window() {
        let mut fps = FpsMeter::default();
        for _ in 0..config::FPS_WINDOW_FRAMES {
            fps.record(Duration::from_millis(100));
        }
        fps.record(Duration::from_millis(10));
        // The slowest sample fell out of the window.
        let expected = config::FPS_WINDOW_FRAMES as f32 / (0.1 * (config::FPS_WINDOW_FRAMES - 1) as f32 + 0.01);
        assert!((fps.fps() - expected).abs() < 1e-2);
    }

    #[test]
    fn collision_rate_rolls_over_each_window() {
        let mut rate = CollisionRate::new(60);
        for frame in 1..60 {
            assert_eq!(rate.record(frame, 2), 0);
        }
        assert_eq!(rate.record(60, 2), 120);
        assert_eq!(rate.record(61, 5), 120);
        for frame in 62..120 {
            rate.record(frame, 0);
        }
        assert_eq!(rate.record(120, 0), 5);
        assert_eq!(rate.per_window(), 5);
    }

    #[test]
    fn fps_meter_averages_frame_times() {
        let mut fps = FpsMeter::new(4);
        assert_eq!(fps.fps(), 0.0);
        for _ in 0..10 {
            fps.record(Duration::from_millis(20));
        }
        assert!((fps.fps() - 50.0).abs() < 1e-3);
    }
}
