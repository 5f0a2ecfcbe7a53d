// Frame-level tests for the Simulation pipeline

use super::simulation::Simulation;
use crate::app::spawn;
use crate::attractor::Attractor;
use crate::config::{self, SimConfig};
use crate::init_config::ScenarioConfig;
use crate::particle::Particle;
use ultraviolet::Vec2;

fn particle(x: f32, y: f32, vx: f32, vy: f32, mass: f32) -> Particle {
    Particle::new(0, Vec2::new(x, y), Vec2::new(vx, vy), mass)
}

fn sim(width: f32, height: f32, particles: Vec<Particle>) -> Simulation {
    Simulation::new(width, height, particles, Vec::new(), 1)
}

fn no_gravity() -> SimConfig {
    SimConfig::default().with_gravity(0.0)
}

mod frame {
    use super::*;

    #[test]
    fn frames_are_numbered_from_one() {
        let mut s = sim(100.0, 100.0, vec![particle(50.0, 50.0, 0.0, 0.0, 1.0)]);
        assert_eq!(s.frame, 0);
        let stats = s.step(&SimConfig::default());
        assert_eq!(stats.frame, 1);
        assert_eq!(s.step(&SimConfig::default()).frame, 2);
    }

    #[test]
    fn new_assigns_ids_by_index() {
        let s = sim(
            100.0,
            100.0,
            vec![particle(10.0, 10.0, 0.0, 0.0, 1.0), particle(80.0, 80.0, 0.0, 0.0, 1.0)],
        );
        assert_eq!(s.particles[0].id, 0);
        assert_eq!(s.particles[1].id, 1);
    }

    #[test]
    fn wall_rebound_through_step() {
        let mut s = sim(100.0, 100.0, vec![particle(94.0, 50.0, 5.0, 0.0, 1.0)]);
        s.step(&SimConfig::default().with_restitution(0.9));
        let p = &s.particles[0];
        assert!((p.vel.x + 4.5).abs() < 1e-5, "vel = {:?}", p.vel);
        assert_eq!(p.pos.x, 96.0);
        assert_eq!(p.pos.y, 50.0);
    }

    #[test]
    fn two_body_gravity_through_step() {
        let mut s = sim(
            200.0,
            200.0,
            vec![particle(50.0, 100.0, 0.0, 0.0, 10.0), particle(100.0, 100.0, 0.0, 0.0, 10.0)],
        );
        s.step(&SimConfig::default().with_gravity(4.0));
        assert!((s.particles[0].vel.x - 0.016).abs() < 1e-4, "{:?}", s.particles[0].vel);
        assert!((s.particles[1].vel.x + 0.016).abs() < 1e-4, "{:?}", s.particles[1].vel);
        assert!(s.particles[0].vel.y.abs() < 1e-6);
        assert_eq!(s.stats.collisions, 0);
    }

    #[test]
    fn gravity_ignores_particles_out_of_range() {
        let mut s = sim(
            400.0,
            400.0,
            vec![particle(50.0, 200.0, 0.0, 0.0, 5.0), particle(300.0, 200.0, 0.0, 0.0, 5.0)],
        );
        s.step(&SimConfig::default());
        assert_eq!(s.particles[0].vel, Vec2::zero());
        assert_eq!(s.particles[1].vel, Vec2::zero());
    }

    #[test]
    fn out_of_arena_particle_is_rejected_then_clamped() {
        let mut s = sim(100.0, 100.0, vec![particle(-5.0, 50.0, 0.0, 0.0, 1.0)]);
        let stats = s.step(&SimConfig::default());
        assert_eq!(stats.rejected_points, 1);
        assert_eq!(s.particles[0].pos.x, s.particles[0].radius);

        let stats = s.step(&SimConfig::default());
        assert_eq!(stats.rejected_points, 0);
    }

    #[test]
    fn empty_simulation_steps() {
        let mut s = sim(100.0, 100.0, Vec::new());
        let stats = s.step(&SimConfig::default());
        assert_eq!(stats.particle_count, 0);
        assert_eq!(stats.capacity, config::QUADTREE_MAX_CAPACITY);
        assert_eq!(stats.kinetic_energy, 0.0);
    }
}

mod collisions {
    use super::*;

    #[test]
    fn pair_is_resolved_once_per_frame() {
        let mut s = sim(
            100.0,
            100.0,
            vec![particle(50.0, 50.0, 0.0, 0.0, 1.0), particle(55.0, 50.0, 0.0, 0.0, 1.0)],
        );
        let stats = s.step(&no_gravity());
        assert_eq!(stats.collisions, 1);
        assert_eq!(s.particles[0].collided_with.as_slice(), &[1]);
        assert_eq!(s.particles[1].collided_with.as_slice(), &[0]);
        assert!(s.particles[0].highlighted && s.particles[1].highlighted);
        // Separated to touching distance.
        assert!(((s.particles[1].pos - s.particles[0].pos).mag() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn highlights_last_one_frame() {
        let mut s = sim(
            100.0,
            100.0,
            vec![particle(50.0, 50.0, 0.0, 0.0, 1.0), particle(55.0, 50.0, 0.0, 0.0, 1.0)],
        );
        s.step(&no_gravity());
        assert_eq!(s.highlighted_count(), 2);

        // The next frame reports last frame's highlights, then clears them.
        let stats = s.step(&no_gravity());
        assert_eq!(stats.highlighted, 2);
        assert_eq!(stats.collisions, 0);
        assert_eq!(s.highlighted_count(), 0);
        assert!(s.particles.iter().all(|p| p.collided_with.is_empty()));
    }

    #[test]
    fn capacity_shrinks_after_clustered_frame() {
        let mut particles = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                particles.push(particle(100.0 + 2.0 * i as f32, 100.0 + 2.0 * j as f32, 0.0, 0.0, 1.0));
            }
        }
        let mut s = sim(200.0, 200.0, particles);

        let first = s.step(&no_gravity());
        assert_eq!(first.capacity, config::QUADTREE_MAX_CAPACITY);
        assert!(first.collisions > 0);

        let second = s.step(&no_gravity());
        assert!(second.highlighted >= 2);
        assert!(second.capacity < config::QUADTREE_MAX_CAPACITY);
        assert!(second.capacity >= config::QUADTREE_MIN_CAPACITY);
        assert!(second.capacity.is_power_of_two());
    }
}

mod explosions {
    use super::*;

    #[test]
    fn explosion_pushes_only_inside_radius() {
        let mut s = sim(
            400.0,
            400.0,
            vec![
                particle(230.0, 200.0, 0.0, 0.0, 1.0),
                particle(200.0, 300.0, 0.0, 0.0, 1.0),
                particle(350.0, 200.0, 0.0, 0.0, 1.0),
            ],
        );
        let hit = s.explode(Vec2::new(200.0, 200.0), 200.0, 100.0);
        // The particle exactly on the radius is in range but feels no force.
        assert_eq!(hit, 2);

        s.step(&no_gravity());
        let inside = &s.particles[0];
        assert!((inside.vel.x - inside.max_speed).abs() < 1e-4);
        assert!(inside.vel.y.abs() < 1e-6);
        assert!((inside.pos.x - 238.0).abs() < 1e-4);
        assert_eq!(s.particles[1].vel, Vec2::zero());
        assert_eq!(s.particles[2].vel, Vec2::zero());
    }
}

mod attractors {
    use super::*;

    #[test]
    fn attractor_pulls_particle_in_band() {
        let attractor = Attractor::new(Vec2::new(200.0, 200.0), Vec2::zero(), 400.0, 10.0, true);
        let mut s = Simulation::new(
            400.0,
            400.0,
            vec![particle(230.0, 200.0, 0.0, 0.0, 1.0)],
            vec![attractor],
            1,
        );
        s.step(&no_gravity());
        let p = &s.particles[0];
        // 400 / 30^2 towards the attractor.
        assert!((p.vel.x + 400.0 / 900.0).abs() < 1e-5, "vel = {:?}", p.vel);
        assert!(p.vel.y.abs() < 1e-6);
    }

    #[test]
    fn repulsor_pushes_particle_away() {
        let repulsor = Attractor::new(Vec2::new(200.0, 200.0), Vec2::zero(), 400.0, 10.0, false);
        let mut s = Simulation::new(
            400.0,
            400.0,
            vec![particle(200.0, 230.0, 0.0, 0.0, 1.0)],
            vec![repulsor],
            1,
        );
        s.step(&no_gravity());
        assert!(s.particles[0].vel.y > 0.0);
    }
}

mod runs {
    use super::*;

    fn scenario() -> ScenarioConfig {
        ScenarioConfig::from_toml_str(
            "[arena]\nwidth = 400.0\nheight = 300.0\n\
             [particles]\ncount = 150\nseed = 42\n\
             [[attractors]]\nx = 200.0\ny = 150.0\nmass = 60.0\nradius = 12.0\nvx = 0.5\n",
        )
        .unwrap()
    }

    #[test]
    fn speeds_stay_capped_and_state_finite() {
        let mut s = spawn::build_simulation(&scenario());
        let cfg = SimConfig::default();
        for _ in 0..120 {
            let stats = s.step(&cfg);
            assert_eq!(stats.particle_count, 150);
            for p in &s.particles {
                assert!(p.speed() <= p.max_speed + 1e-4, "frame {}: speed {}", stats.frame, p.speed());
                assert!(p.pos.x.is_finite() && p.pos.y.is_finite());
            }
        }
        assert_eq!(s.repair_invalid(), 0);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = spawn::build_simulation(&scenario());
        let mut b = spawn::build_simulation(&scenario());
        let cfg = SimConfig::default();
        for _ in 0..70 {
            a.step(&cfg);
            b.step(&cfg);
        }
        for (x, y) in a.particles.iter().zip(&b.particles) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
        assert_eq!(a.attractors[0].pos, b.attractors[0].pos);
    }

    #[test]
    fn tree_boundaries_follow_toggle() {
        let mut s = spawn::build_simulation(&scenario());
        s.step(&SimConfig::default());
        assert!(s.snapshot().tree.is_empty());

        let cfg = SimConfig { show_quadtree: true, ..SimConfig::default() };
        s.step(&cfg);
        let snap = s.snapshot();
        assert!(!snap.tree.is_empty());
        assert_eq!(snap.tree[0], s.arena());
        assert_eq!(snap.particles.len(), 150);
        assert_eq!(snap.attractors.len(), 1);
        assert_eq!(snap.frame, 2);
    }

    #[test]
    fn repair_resets_non_finite_particles() {
        let mut s = sim(100.0, 80.0, vec![particle(10.0, 10.0, 1.0, 0.0, 1.0)]);
        s.particles[0].pos.x = f32::NAN;
        s.particles[0].acc.y = f32::INFINITY;
        assert_eq!(s.repair_invalid(), 1);
        assert_eq!(s.particles[0].pos, Vec2::new(50.0, 40.0));
        assert_eq!(s.particles[0].vel, Vec2::new(1.0, 0.0));
        assert_eq!(s.particles[0].acc, Vec2::zero());
    }

    #[test]
    fn invalid_tunables_are_sanitized() {
        let mut s = sim(100.0, 100.0, vec![particle(94.0, 50.0, 5.0, 0.0, 1.0)]);
        let cfg = SimConfig::default().with_restitution(f32::NAN).with_gravity(-3.0);
        s.step(&cfg);
        let expected = -5.0 * config::DEFAULT_RESTITUTION;
        assert!((s.particles[0].vel.x - expected).abs() < 1e-5);
    }
}
