//! Criterion benchmarks for city composition.
//!
//! Benchmarks:
//!   - full composition of the 16x16 reference layout
//!   - road layout alone
//!   - vehicle sampling at a high fill ratio
//!
//! Run with: cargo bench --bench compose

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use neon_diorama::city::layout::reference_layout;
use neon_diorama::city::roads::build_road_layout;
use neon_diorama::city::vehicles::place_vehicles;
use neon_diorama::city::{compose_city, CityConfig, TileCode};

fn bench_compose(c: &mut Criterion) {
    let grid = reference_layout();
    let config = CityConfig::default();

    let mut group = c.benchmark_group("compose");

    group.bench_function("reference_layout", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| black_box(compose_city(black_box(&grid), &config, &mut rng)));
    });

    group.bench_function("road_layout", |b| {
        b.iter(|| black_box(build_road_layout(black_box(&grid), &config)));
    });

    group.finish();
}

fn bench_vehicles(c: &mut Criterion) {
    let grid = reference_layout();
    let config = CityConfig::default();
    // Three quarters of the drivable tiles.
    let count = grid.count(TileCode::is_drivable) * 3 / 4;

    c.bench_function("vehicles_dense", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(place_vehicles(&grid, count, &config, &mut rng)));
    });
}

criterion_group!(benches, bench_compose, bench_vehicles);
criterion_main!(benches);
