mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;

const RADII: [f32; 4] = [8.0, 4.0, 2.0, 1.5];
const SEARCHES: [(&str, NeighborSearch); 2] = [
    ("linear", NeighborSearch::Linear),
    ("grid", NeighborSearch::Grid),
];

fn sample_count(config: &SamplerConfig, surface: &SurfaceLayers, seed: u64) -> usize {
    sample_surface(config.clone(), surface, StdRng::seed_from_u64(seed))
        .map(|points| points.len())
        .unwrap_or(0)
}

fn sampling_neighbor_search_benches(c: &mut Criterion) {
    let surface = common::flat_ground();

    for (name, search) in SEARCHES {
        let mut group = c.benchmark_group(format!("sampling/flat/{name}"));

        for &radius in &RADII {
            let config = SamplerConfig::new(common::bench_region())
                .with_sampling_radius(radius)
                .with_neighbor_search(search);
            let expected = sample_count(&config, &surface, 0xBEEF_u64 ^ radius.to_bits() as u64);
            group.throughput(common::samples_throughput(expected));

            let mut seed = 0xC0FFEE_u64 ^ radius.to_bits() as u64;
            group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
                b.iter(|| {
                    seed = seed.wrapping_add(1);
                    black_box(sample_count(&config, &surface, seed));
                });
            });
        }

        group.finish();
    }
}

fn sampling_terrain_benches(c: &mut Criterion) {
    let surface = common::rolling_hills();
    let mut group = c.benchmark_group("sampling/rolling_hills/grid");

    for &radius in &RADII {
        let config = SamplerConfig::new(common::bench_region())
            .with_sampling_radius(radius)
            .with_neighbor_search(NeighborSearch::Grid);
        let expected = sample_count(&config, &surface, 0xA11CE_u64 ^ radius.to_bits() as u64);
        group.throughput(common::samples_throughput(expected));

        let mut seed = 0xE57_u64 ^ radius.to_bits() as u64;
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(sample_count(&config, &surface, seed));
            });
        });
    }

    group.finish();
}

fn sampling_batch_benches(c: &mut Criterion) {
    let surface = common::flat_ground();
    let config = SamplerConfig::new(common::bench_region())
        .with_sampling_radius(2.0)
        .with_batch_limit(100)
        .with_neighbor_search(NeighborSearch::Grid);

    c.bench_function("sampling/flat/first_batch", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut sampler =
                SurfacePoissonSampler::new(config.clone(), &surface, StdRng::seed_from_u64(seed));
            black_box(sampler.run_batch().ok());
        });
    });
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_neighbor_search_benches, sampling_terrain_benches, sampling_batch_benches
}
criterion_main!(benches);
