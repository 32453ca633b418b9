/*
 * Robot Arena Benchmark
 *
 * Measures the cost of one simulation tick at several population sizes,
 * non-overlapping placement into a filling arena, and layout parsing.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use std::time::Duration;

use robot_arena::{
    load_layout, place_non_overlapping, save_layout, Arena, Blueprint, Kind, KindTag, SimulationParams,
};

fn bench_params() -> SimulationParams {
    SimulationParams {
        arena_width: 4000.0,
        arena_height: 3000.0,
        ..SimulationParams::default()
    }
}

// A seeded mix of every kind, placed without overlap
fn populated_arena(params: &SimulationParams, n: usize) -> Arena {
    let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
    let mut arena = Arena::from_params(params).unwrap();
    for i in 0..n {
        let tag = KindTag::ALL[i % KindTag::ALL.len()];
        let heading = rng.gen_range(0.0..TAU);
        let blueprint = Blueprint::unplaced(Kind::with_defaults(tag, heading));
        place_non_overlapping(&mut arena, blueprint, &mut rng, params.placement_attempts).unwrap();
    }
    arena
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let params = bench_params();

    for num_entities in [50, 200, 500, 1000].iter() {
        let arena = populated_arena(&params, *num_entities);
        group.bench_with_input(BenchmarkId::from_parameter(num_entities), &arena, |b, arena| {
            b.iter_batched(
                || arena.clone(),
                |mut arena| black_box(arena.tick(&params)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    let params = bench_params();

    for num_entities in [100, 500, 1000].iter() {
        let arena = populated_arena(&params, *num_entities);
        group.bench_with_input(BenchmarkId::from_parameter(num_entities), &arena, |b, arena| {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            b.iter_batched(
                || arena.clone(),
                |mut arena| {
                    let food = Blueprint::unplaced(Kind::Food);
                    black_box(place_non_overlapping(&mut arena, food, &mut rng, params.placement_attempts))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let params = bench_params();
    let text = save_layout(&populated_arena(&params, 1000));

    c.bench_function("load_layout/1000", |b| {
        b.iter(|| black_box(load_layout(&text, &params).unwrap()));
    });
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_tick, bench_placement, bench_layout
}

criterion_main!(benches);
