use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use verlet_rope::*;

const DT: f64 = 1.0 / 60.0;

fn prepare_world(rope_count: usize) -> RopeWorld {
    let mut world = RopeWorld::new();
    for i in 0..rope_count {
        let config = RopeConfig::standard()
            .with_jitter_seed(i as u64)
            .with_particle_count(32)
            .with_collision(CollisionType::StaticOnly, CollisionBehavior::SlideStretch);
        world
            .spawn_rope(config, RopeAttachments::hanging(Vec3::new(i as f32 * 0.5, 2.0, 0.0)))
            .expect("valid rope config");
    }
    world
}

fn floor() -> CollisionScene {
    let mut scene = CollisionScene::new();
    scene.add_static_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(500.0, 0.5, 5.0), 1);
    scene
}

fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    let scene = floor();
    for &count in &[16usize, 128, 512] {
        group.bench_with_input(BenchmarkId::new("sequential", count), &count, |b, &count| {
            let mut world = prepare_world(count);
            world.set_parallel_enabled(false);
            b.iter(|| black_box(world.step(black_box(DT), &scene)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |b, &count| {
            let mut world = prepare_world(count);
            world.set_parallel_enabled(true);
            b.iter(|| black_box(world.step(black_box(DT), &scene)))
        });
    }
    group.finish();
}

fn bench_stiffness(c: &mut Criterion) {
    let mut group = c.benchmark_group("stiffness_relax");
    for &particles in &[16usize, 64, 300] {
        group.bench_with_input(BenchmarkId::new("relax", particles), &particles, |b, &particles| {
            let positions: Vec<Vec3> = (0..particles)
                .map(|i| Vec3::new(i as f32 * 0.12, (i as f32 * 0.7).sin() * 0.05, 0.0))
                .collect();
            let chain = ChainInitializer::from_positions(&positions, 0.1).expect("valid chain");
            let solver = StiffnessSolver::new(0.9, 4);
            b.iter(|| {
                let mut chain = chain.clone();
                black_box(solver.relax(chain.as_mut_slice(), 0.1))
            })
        });
    }
    group.finish();
}

fn bench_initializer(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_initializer");
    for layout in [ChainLayout::Straight, ChainLayout::Arc, ChainLayout::Zigzag] {
        let config = RopeConfig::standard()
            .with_particle_count(100)
            .with_rope_length(10.0)
            .with_layout(layout);
        let initializer = ChainInitializer::from_config(&config);
        group.bench_function(format!("{layout:?}"), |b| {
            b.iter(|| {
                black_box(initializer.initialize(
                    Vec3::ZERO,
                    Some(Vec3::new(6.0, 0.0, 0.0)),
                    config.gravity.acceleration(),
                    100,
                    config.average_segment_length(),
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_step, bench_stiffness, bench_initializer);
criterion_main!(benches);
