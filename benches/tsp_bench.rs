//! Criterion benchmarks for the TSP solvers.
//!
//! Uses synthetic locations on a latitude/longitude grid, jittered with a
//! fixed seed, so runs are comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_tsp::christofides::ChristofidesSolver;
use u_tsp::ga::{GaConfig, GaRunner};
use u_tsp::geo::{Location, LocationSet};
use u_tsp::random::create_rng;
use u_tsp::tour::tour_length;

fn synthetic_locations(n: usize) -> LocationSet {
    let mut rng = create_rng(7);
    let locations = (0..n)
        .map(|i| {
            let lat = rng.random_range(42.0..51.0);
            let lon = rng.random_range(-4.5..8.0);
            Location::new(format!("city-{i}"), lat, lon)
        })
        .collect();
    LocationSet::new(locations).expect("synthetic names are unique")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_tour_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour_length");

    for &n in &[20usize, 100, 500] {
        let set = synthetic_locations(n);
        let tour: Vec<usize> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(set, tour), |b, (s, t)| {
            b.iter(|| black_box(tour_length(black_box(t), s)))
        });
    }
    group.finish();
}

fn bench_christofides(c: &mut Criterion) {
    let mut group = c.benchmark_group("christofides");
    group.sample_size(10);

    for &n in &[20usize, 50, 100] {
        let set = synthetic_locations(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &set, |b, s| {
            b.iter(|| black_box(ChristofidesSolver::solve(black_box(s))))
        });
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga");
    group.sample_size(10);

    for (n, pop, gen) in [(20usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        let set = synthetic_locations(n);
        let config = GaConfig::default()
            .with_population_size(pop)
            .with_generations(gen)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_g{}", n, pop, gen), n),
            &(set, config),
            |b, (s, c)| b.iter(|| black_box(GaRunner::run(black_box(s), black_box(c)))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tour_length, bench_christofides, bench_ga);
criterion_main!(benches);
