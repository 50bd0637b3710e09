use std::path::Path;

use anyhow::Context;
use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use surface_scatter::prelude::{Bounds, SurfaceProjector, SurfaceQuery};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Top-down rendering settings. The image covers the footprint of `bounds`.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub bounds: Bounds,
    pub background: [u8; 3],
    /// Color for cells without surface below them when shading terrain.
    pub hole_color: [u8; 3],
    /// Fixed point color; `None` colors points by height.
    pub point_color: Option<[u8; 3]>,
    pub point_radius: u32,
    /// Projection used to shade terrain below each pixel.
    pub projector: SurfaceProjector,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), bounds: Bounds) -> Self {
        Self {
            image_size,
            bounds,
            background: [255, 255, 255],
            hole_color: [40, 70, 120],
            point_color: None,
            point_radius: 2,
            projector: SurfaceProjector::default(),
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_hole_color(mut self, color: [u8; 3]) -> Self {
        self.hole_color = color;
        self
    }

    pub fn with_point_color(mut self, color: [u8; 3]) -> Self {
        self.point_color = Some(color);
        self
    }

    pub fn with_point_radius(mut self, radius: u32) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn with_projector(mut self, projector: SurfaceProjector) -> Self {
        self.projector = projector;
        self
    }

    fn pixel_to_column(&self, x: u32, y: u32) -> Vec2 {
        let (w, h) = self.image_size;
        let min = self.bounds.min();
        let size = self.bounds.size();
        let u = (x as f32 + 0.5) / w as f32;
        let v = (y as f32 + 0.5) / h as f32;
        Vec2::new(min.x + u * size.x, min.z + (1.0 - v) * size.z)
    }

    fn point_to_pixel(&self, p: Vec3) -> (i64, i64) {
        let (w, h) = self.image_size;
        let min = self.bounds.min();
        let size = self.bounds.size();
        let u = (p.x - min.x) / size.x.max(f32::EPSILON);
        let v = 1.0 - (p.z - min.z) / size.z.max(f32::EPSILON);
        ((u * w as f32) as i64, (v * h as f32) as i64)
    }

    fn height_t(&self, y: f32) -> f32 {
        let min = self.bounds.min().y;
        let span = self.bounds.size().y.max(f32::EPSILON);
        ((y - min) / span).clamp(0.0, 1.0)
    }
}

/// Renders `points` seen from above into a PNG at `path`.
///
/// With a `surface`, the background is shaded by the height found below each pixel.
pub fn render_points_to_png(
    points: &[Vec3],
    surface: Option<&dyn SurfaceQuery>,
    cfg: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = cfg.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(cfg.background));

    if let Some(surface) = surface {
        for y in 0..h {
            for x in 0..w {
                let column = cfg.pixel_to_column(x, y);
                let color = match cfg.projector.project(column, &cfg.bounds, surface) {
                    Some(hit) => {
                        let shade = (90.0 + cfg.height_t(hit.y) * 150.0) as u8;
                        [shade, shade, shade]
                    }
                    None => cfg.hole_color,
                };
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }

    let r = cfg.point_radius as i64;
    let fill = cfg.point_color;
    for p in points {
        let color = fill.unwrap_or_else(|| height_ramp(cfg.height_t(p.y)));
        let (cx, cy) = cfg.point_to_pixel(*p);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (px, py) = (cx + dx, cy + dy);
                if px >= 0 && py >= 0 && px < w as i64 && py < h as i64 {
                    img.put_pixel(px as u32, py as u32, Rgb(color));
                }
            }
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} samples to {}.", points.len(), path.display());
    Ok(())
}

// Low samples blue, high samples orange.
fn height_ramp(t: f32) -> [u8; 3] {
    let lerp = |a: f32, b: f32| (a + (b - a) * t) as u8;
    [lerp(30.0, 235.0), lerp(90.0, 120.0), lerp(220.0, 20.0)]
}
