use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_points_to_png, RenderConfig};
use tracing::info;

const LAKES: [(Vec2, f32); 3] = [
    (Vec2::new(-15.0, 10.0), 12.0),
    (Vec2::new(20.0, -18.0), 9.0),
    (Vec2::new(25.0, 25.0), 6.0),
];

/// Counts what would be spawned in a scene.
#[derive(Default)]
struct TreeSpawner {
    trees: Vec<Vec3>,
    clears: usize,
}

impl Spawner for TreeSpawner {
    fn on_point_accepted(&mut self, point: Vec3) {
        self.trees.push(point);
    }

    fn on_clear(&mut self) {
        self.trees.clear();
        self.clears += 1;
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let bounds = Bounds::from_size(Vec3::ZERO, Vec3::new(80.0, 10.0, 80.0));

    let ground = HeightGrid::from_fn(Vec2::splat(-40.0), 0.5, 161, 161, |c| {
        if LAKES.iter().any(|(center, r)| c.distance(*center) < *r) {
            f32::NAN
        } else {
            (c.x * 0.1).sin() * 1.5
        }
    })?;

    let mut layers = SurfaceLayers::new();
    layers.register(DEFAULT_SURFACE_LAYER, ground);
    // Water sits above the ground but is never hit by ground casts.
    layers.register("Water", FlatSurface::new(3.0));

    let config = SamplerConfig::new(bounds)
        .with_sampling_radius(1.5)
        .with_seed_attempts(32);

    let mut sampler = SurfacePoissonSampler::try_new(config, &layers, StdRng::seed_from_u64(7))?;
    let mut sink = SpawnerSink::new(TreeSpawner::default());

    // Drive the run one step at a time, as a frame loop would.
    let mut frames = 0usize;
    loop {
        match sampler.step_with_events(&mut sink)? {
            StepOutcome::Terminated => break,
            _ => frames += 1,
        }
        if sampler.is_terminated() {
            break;
        }
    }

    let stats = sampler.stats();
    info!(
        "{} trees in {} steps; {} candidates fell into lakes.",
        sink.spawner().trees.len(), frames, stats.projection_misses
    );

    let cfg = RenderConfig::new((800, 800), bounds)
        .with_projector(sampler.config().projector())
        .with_point_color([20, 110, 40]);
    render_points_to_png(
        &sink.spawner().trees,
        Some(&layers),
        &cfg,
        "surface-scatter-terrain-with-holes.png",
    )?;

    sampler.clear_with_events(&mut sink);
    info!(
        "After clear: {} trees, {} clear(s).",
        sink.spawner().trees.len(), sink.spawner().clears
    );
    Ok(())
}
