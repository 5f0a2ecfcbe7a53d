//! Index build + range query throughput, and a full simulation frame.
//!
//! Run with: `cargo bench --bench quadtree`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quadsim::app::spawn;
use quadsim::config::SimConfig;
use quadsim::init_config::ScenarioConfig;
use quadsim::quadtree::{Circle, Point, Quadtree, Rectangle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ultraviolet::Vec2;

fn random_points(count: usize) -> Vec<Point<usize>> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..count)
        .map(|i| Point::new(Vec2::new(rng.random_range(0.0..1280.0), rng.random_range(0.0..720.0)), i))
        .collect()
}

fn build_and_query(c: &mut Criterion) {
    let points = random_points(2000);
    let arena = Rectangle::arena(1280.0, 720.0);
    let mut group = c.benchmark_group("quadtree");
    for capacity in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("build", capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let mut tree = Quadtree::new(arena, capacity);
                for p in &points {
                    tree.insert(*p);
                }
                black_box(tree.len())
            })
        });

        let mut tree = Quadtree::new(arena, capacity);
        for p in &points {
            tree.insert(*p);
        }
        group.bench_with_input(BenchmarkId::new("query", capacity), &tree, |b, tree| {
            let mut found = Vec::new();
            b.iter(|| {
                let mut total = 0;
                for p in points.iter().step_by(10) {
                    found.clear();
                    tree.query_into(&Circle::new(p.pos, 100.0), &mut found);
                    total += found.len();
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

fn simulation_frame(c: &mut Criterion) {
    let mut scenario = ScenarioConfig::default();
    scenario.particles.count = 800;
    let mut sim = spawn::build_simulation(&scenario);
    let cfg = SimConfig::default();
    c.bench_function("simulation_step_800", |b| b.iter(|| black_box(sim.step(&cfg))));
}

criterion_group!(benches, build_and_query, simulation_frame);
criterion_main!(benches);
