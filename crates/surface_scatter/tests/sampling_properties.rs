use std::thread;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;

const EPSILON: f32 = 1e-5;

fn flat_ground() -> SurfaceLayers {
    SurfaceLayers::single(DEFAULT_SURFACE_LAYER, FlatSurface::new(0.0))
}

fn unit_config() -> SamplerConfig {
    SamplerConfig::new(Bounds::default())
        .with_sampling_radius(0.2)
        .with_sample_limit(10)
}

fn run<S: SurfaceQuery>(config: SamplerConfig, surface: S, seed: u64) -> Vec<Vec3> {
    let mut sampler = SurfacePoissonSampler::try_new(config, surface, StdRng::seed_from_u64(seed))
        .expect("valid config");
    sampler.run_to_completion().expect("seed found");
    sampler.into_points()
}

fn min_pairwise_distance(points: &[Vec3]) -> f32 {
    let mut min = f32::MAX;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            min = min.min(points[i].distance(points[j]));
        }
    }
    min
}

#[test]
fn accepted_points_keep_minimum_separation() {
    for seed in 0..8 {
        let points = run(unit_config(), flat_ground(), seed);
        assert!(points.len() > 1);
        assert!(
            min_pairwise_distance(&points) >= 0.2 - EPSILON,
            "seed {seed} violates separation"
        );
    }
}

#[test]
fn accepted_points_stay_inside_bounds() {
    let bounds = Bounds::new(Vec3::new(10.0, 2.0, -4.0), Vec3::new(3.0, 2.0, 1.5));
    let hills = SurfaceLayers::single(
        DEFAULT_SURFACE_LAYER,
        HeightFn(|c: Vec2| Some(2.0 + (c.x * 1.7).sin() * (c.y * 2.3).cos())),
    );
    let config = SamplerConfig::new(bounds).with_sampling_radius(0.35);
    let points = run(config, hills, 11);
    assert!(points.len() > 10);
    for p in &points {
        assert!(bounds.contains(*p), "{p} outside {bounds:?}");
    }
}

#[test]
fn flat_unit_square_density_is_plausible() {
    let points = run(unit_config(), flat_ground(), 42);
    assert!(
        (8..=30).contains(&points.len()),
        "unexpected sample count {}",
        points.len()
    );
    assert!(points.iter().all(|p| p.y == 0.0));
}

#[test]
fn sloped_terrain_separation_is_measured_in_3d() {
    let slope = SurfaceLayers::single(DEFAULT_SURFACE_LAYER, HeightFn(|c: Vec2| Some(c.x)));
    let config = SamplerConfig::new(Bounds::from_size(Vec3::ZERO, Vec3::new(2.0, 3.0, 2.0)))
        .with_sampling_radius(0.25);
    let points = run(config, slope, 3);
    assert!(min_pairwise_distance(&points) >= 0.25 - EPSILON);
    for p in &points {
        assert!((p.y - p.x).abs() < EPSILON, "{p} not on the slope");
    }
}

#[test]
fn holes_in_the_surface_receive_no_samples() {
    let trench = SurfaceLayers::single(
        DEFAULT_SURFACE_LAYER,
        HeightFn(|c: Vec2| if c.x.abs() < 0.15 { None } else { Some(0.0) }),
    );
    let config = unit_config()
        .with_sampling_radius(0.1)
        .with_seed_attempts(16);
    let points = run(config, trench, 5);
    assert!(points.len() > 5);
    assert!(points.iter().all(|p| p.x.abs() >= 0.15));
}

#[test]
fn other_layers_are_ignored() {
    let mut layers = SurfaceLayers::new();
    layers.register("Water", FlatSurface::new(0.3));
    layers.register("Ground", FlatSurface::new(-0.2));
    let points = run(unit_config(), layers, 6);
    assert!(points.iter().all(|p| p.y == -0.2));
}

#[test]
fn missing_surface_reports_no_valid_seed() {
    let mut sampler = SurfacePoissonSampler::try_new(
        unit_config(),
        SurfaceLayers::new(),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    let err = sampler.run_to_completion().unwrap_err();
    assert!(matches!(err, Error::NoValidSeed { attempts: 1 }));
    assert!(sampler.points().is_empty());
    assert!(sampler.is_terminated());
}

#[test]
fn surface_outside_vertical_extent_reports_no_valid_seed() {
    let high = SurfaceLayers::single(DEFAULT_SURFACE_LAYER, FlatSurface::new(5.0));
    let result = sample_surface(
        unit_config().with_seed_attempts(4),
        high,
        StdRng::seed_from_u64(1),
    );
    assert!(matches!(result, Err(Error::NoValidSeed { attempts: 4 })));
}

#[test]
fn bounds_smaller_than_radius_hold_exactly_one_sample() {
    let tiny = Bounds::from_size(Vec3::ZERO, Vec3::new(0.1, 1.0, 0.1));
    let mut sampler = SurfacePoissonSampler::try_new(
        unit_config().with_bounds(tiny),
        flat_ground(),
        StdRng::seed_from_u64(9),
    )
    .unwrap();
    let summary = sampler.run_to_completion().unwrap();
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.stats.evictions, 1);
    assert_eq!(summary.stats.attempts, 10);
    assert_eq!(summary.stats.rejections(), 10);
}

#[test]
fn accepted_points_only_grow_during_a_run() {
    let mut sampler =
        SurfacePoissonSampler::new(unit_config(), flat_ground(), StdRng::seed_from_u64(12));
    sampler.step().unwrap();
    assert_eq!(sampler.points().len(), 1);

    let mut previous = sampler.points().to_vec();
    while !sampler.is_terminated() {
        sampler.step().unwrap();
        let current = sampler.points();
        assert!(current.len() >= previous.len());
        assert_eq!(&current[..previous.len()], previous.as_slice());
        previous = current.to_vec();
    }
}

#[test]
fn run_terminates_within_attempt_bound() {
    let mut sampler =
        SurfacePoissonSampler::new(unit_config(), flat_ground(), StdRng::seed_from_u64(13));
    let mut steps = 0usize;
    while sampler.step().unwrap() != StepOutcome::Terminated && !sampler.is_terminated() {
        steps += 1;
        assert!(steps < 10_000, "run did not terminate");
    }
    // One seed step, one step per later acceptance, one eviction per sample.
    let accepted = sampler.points().len();
    assert_eq!(steps + 1, 1 + (accepted - 1) + accepted);
}

#[test]
fn identical_seeds_give_identical_runs() {
    let a = run(unit_config(), flat_ground(), 77);
    let b = run(unit_config(), flat_ground(), 77);
    let c = run(unit_config(), flat_ground(), 78);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn grid_search_matches_linear_search() {
    let bounds = Bounds::from_size(Vec3::ZERO, Vec3::new(6.0, 2.0, 4.0));
    let base = SamplerConfig::new(bounds).with_sampling_radius(0.3);
    let linear = run(
        base.clone().with_neighbor_search(NeighborSearch::Linear),
        flat_ground(),
        21,
    );
    let grid = run(
        base.with_neighbor_search(NeighborSearch::Grid),
        flat_ground(),
        21,
    );
    assert_eq!(linear, grid);
}

#[test]
fn spawner_sees_every_sample_and_the_clear() {
    let mut sampler =
        SurfacePoissonSampler::new(unit_config(), flat_ground(), StdRng::seed_from_u64(14));
    let mut sink = SpawnerSink::new(Vec::<Vec3>::new());
    sampler.run_to_completion_with_events(&mut sink).unwrap();
    assert_eq!(sink.spawner().as_slice(), sampler.points());

    sampler.clear_with_events(&mut sink);
    assert!(sink.spawner().is_empty());
    assert!(sampler.points().is_empty());
}

#[test]
fn independent_runs_can_execute_in_parallel() {
    let surface = std::sync::Arc::new(flat_ground());
    let results: Vec<Vec<Vec3>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let surface = surface.clone();
                scope.spawn(move || run(unit_config(), surface, seed))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("sampling thread panicked"))
            .collect()
    });

    for (seed, points) in results.iter().enumerate() {
        assert_eq!(points, &run(unit_config(), flat_ground(), seed as u64));
    }
}
