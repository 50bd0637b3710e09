use std::time::Instant;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::*;
use surface_scatter_examples::{init_tracing, render_points_to_png, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let bounds = Bounds::from_size(Vec3::ZERO, Vec3::new(120.0, 4.0, 120.0));
    let surface = SurfaceLayers::single(DEFAULT_SURFACE_LAYER, FlatSurface::new(0.0));
    let base = SamplerConfig::new(bounds).with_sampling_radius(1.5);

    let mut results = Vec::new();
    for search in [NeighborSearch::Linear, NeighborSearch::Grid] {
        let config = base.clone().with_neighbor_search(search);
        let start = Instant::now();
        let points = sample_surface(config, &surface, StdRng::seed_from_u64(1234))?;
        info!(
            "{search:?}: {} samples in {:.1} ms.",
            points.len(), start.elapsed().as_secs_f64() * 1000.0
        );
        results.push(points);
    }

    anyhow::ensure!(
        results[0] == results[1],
        "neighbor searches disagree for the same seed"
    );
    info!("Both searches produced identical samples.");

    let cfg = RenderConfig::new((900, 900), bounds)
        .with_point_radius(1)
        .with_point_color([0, 0, 0]);
    let path = "surface-scatter-linear-vs-grid.png";
    render_points_to_png(&results[1], None, &cfg, path)?;
    Ok(())
}
