use crate::attractor::Attractor;
use crate::init_config::{AttractorConfig, ScenarioConfig};
use crate::particle::Particle;
use crate::simulation::Simulation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ultraviolet::Vec2;

/// Random population spread over the arena, each particle fully inside the walls.
#[allow(clippy::too_many_arguments)]
pub fn random_particles(
    count: usize,
    width: f32,
    height: f32,
    mass_min: f32,
    mass_max: f32,
    initial_speed: f32,
    max_speed: f32,
    rng: &mut StdRng,
) -> Vec<Particle> {
    (0..count)
        .map(|id| {
            let mass = rng.random_range(mass_min..=mass_max);
            let r = Particle::radius_for_mass(mass);
            let pos = Vec2::new(span(rng, r, width - r), span(rng, r, height - r));
            let vel = Vec2::new(
                span(rng, -initial_speed, initial_speed),
                span(rng, -initial_speed, initial_speed),
            );
            Particle::new(id, pos, vel, mass).with_max_speed(max_speed)
        })
        .collect()
}

// Arena narrower than a particle: collapse to the low edge.
fn span(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

pub fn attractor_from_config(cfg: &AttractorConfig) -> Attractor {
    Attractor::new(
        Vec2::new(cfg.x, cfg.y),
        Vec2::new(cfg.vx, cfg.vy),
        cfg.mass,
        cfg.radius,
        cfg.attracting,
    )
}

/// Seeded population plus the scenario's attractors.
pub fn build_simulation(scenario: &ScenarioConfig) -> Simulation {
    let arena = &scenario.arena;
    let p = &scenario.particles;
    let mut rng = StdRng::seed_from_u64(p.seed);
    let particles = random_particles(
        p.count,
        arena.width,
        arena.height,
        p.mass_min,
        p.mass_max,
        p.initial_speed,
        p.max_speed,
        &mut rng,
    );
    let attractors = scenario.attractors.iter().map(attractor_from_config).collect();
    Simulation::new(arena.width, arena.height, particles, attractors, p.seed)
}
