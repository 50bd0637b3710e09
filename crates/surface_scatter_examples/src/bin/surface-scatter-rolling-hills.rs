use std::sync::atomic::AtomicBool;
use std::time::Duration;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_points_to_png, RenderConfig};
use tracing::info;

fn hill_height(c: Vec2) -> Option<f32> {
    Some(10.0 + (c.x * 0.08).sin() * 4.0 + (c.y * 0.05).cos() * 3.0)
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let bounds = Bounds::from_size(Vec3::new(0.0, 10.0, 0.0), Vec3::new(100.0, 20.0, 100.0));
    let surface = SurfaceLayers::single(DEFAULT_SURFACE_LAYER, HeightFn(hill_height));

    let config = SamplerConfig::new(bounds)
        .with_sampling_radius(2.0)
        .with_batch_limit(250)
        .with_pacing_delay(Duration::ZERO)
        .with_neighbor_search(NeighborSearch::Grid);

    let mut sampler = SurfacePoissonSampler::try_new(config, &surface, StdRng::seed_from_u64(42))?;
    let pacer = Pacer::for_sampler(&sampler);
    let cancel = AtomicBool::new(false);

    let mut progress = FnSink::new(|event| {
        if let SamplerEvent::BatchYielded { total_accepted, .. } = event {
            info!("{total_accepted} samples so far.");
        }
    });
    let outcome = pacer.run(&mut sampler, &mut progress, &cancel)?;
    let summary = outcome.summary();
    info!(
        "{} samples, {} candidates tried, {} batches.",
        summary.accepted, summary.stats.attempts, summary.stats.batches
    );

    let cfg = RenderConfig::new((800, 800), bounds).with_projector(sampler.config().projector());
    render_points_to_png(
        sampler.points(),
        Some(&surface),
        &cfg,
        "surface-scatter-rolling-hills.png",
    )?;
    Ok(())
}
