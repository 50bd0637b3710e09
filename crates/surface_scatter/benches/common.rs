use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::{Vec2, Vec3};
use surface_scatter::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn samples_throughput(samples: usize) -> Throughput {
    Throughput::Elements(samples.max(1) as u64)
}

/// 96 x 96 footprint, tall enough for the rolling hills.
pub fn bench_region() -> Bounds {
    Bounds::from_size(Vec3::ZERO, Vec3::new(96.0, 40.0, 96.0))
}

pub fn flat_ground() -> SurfaceLayers {
    SurfaceLayers::single(DEFAULT_SURFACE_LAYER, FlatSurface::new(0.0))
}

pub fn rolling_hills() -> SurfaceLayers {
    let grid = HeightGrid::from_fn(Vec2::splat(-48.0), 0.5, 193, 193, |c| {
        (c.x * 0.11).sin() * 6.0 + (c.y * 0.07).cos() * 4.0
    })
    .expect("valid terrain grid");
    SurfaceLayers::single(DEFAULT_SURFACE_LAYER, grid)
}
