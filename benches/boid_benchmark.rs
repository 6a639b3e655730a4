/*
 * Flocking Benchmark
 *
 * Measures the per-frame phases separately and together: grid build with
 * both sort strategies, the force update over a built grid, and a full step.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use flocking::{
    EdgeRule, FlockingForceModel, FrameInput, GridLayout, NeighborQuery, RayonExecutor, Simulation,
    SimulationParams, SortStrategy, SpatialGrid, UnitStore,
};

const POPULATIONS: [usize; 3] = [1_000, 5_000, 10_000];

fn population(n: usize) -> (SimulationParams, UnitStore) {
    let params = SimulationParams { unit_count: n, seed: Some(42), ..SimulationParams::default() };
    let store = UnitStore::random(&params, &mut StdRng::seed_from_u64(42)).unwrap();
    (params, store)
}

fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");

    for strategy in [SortStrategy::Counting, SortStrategy::Comparison] {
        for &n in POPULATIONS.iter() {
            let (params, store) = population(n);
            let mut grid = SpatialGrid::new(GridLayout::from_params(&params), strategy);

            group.bench_with_input(BenchmarkId::new(format!("{strategy:?}"), n), &n, |b, _| {
                b.iter(|| grid.build(black_box(store.units()), &RayonExecutor));
            });
        }
    }

    group.finish();
}

fn bench_force_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_update");

    for &n in POPULATIONS.iter() {
        let (params, store) = population(n);
        let model = FlockingForceModel::from_params(&params);
        let mut grid = SpatialGrid::new(GridLayout::from_params(&params), params.sort_strategy);
        grid.build(store.units(), &RayonExecutor);
        let units = store.units();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let query = NeighborQuery::new(&grid, EdgeRule::Clamped);
            let probe = FrameInput::running().probe;
            b.iter(|| {
                for (i, unit) in units.iter().enumerate() {
                    let neighbors = query.candidates(unit).map(|j| (j, &units[j]));
                    black_box(model.update(i, unit, neighbors, &probe));
                }
            });
        });
    }

    group.finish();
}

fn bench_full_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_step");
    group.measurement_time(Duration::from_secs(10));

    for &n in POPULATIONS.iter() {
        let (params, store) = population(n);
        let mut sim = Simulation::from_store(params, store, RayonExecutor).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(sim.step(&FrameInput::running())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_build, bench_force_update, bench_full_step);
criterion_main!(benches);
