//! Surface queries used to drop horizontal candidates onto terrain.
//!
//! The sampler never inspects terrain directly. It asks a [`SurfaceQuery`] to cast a
//! ray straight down from a point high above the bounds and reports where the ray
//! hits a surface of a given classification (layer). This module provides:
//! - [`SurfaceQuery`]: the downward-cast seam a host implements for its own geometry.
//! - [`Surface`]: a single height source, with [`FlatSurface`], [`HeightFn`] and
//!   [`HeightGrid`] implementations.
//! - [`SurfaceLayers`]: a registry of surfaces keyed by layer name that implements
//!   [`SurfaceQuery`].
//! - [`SurfaceProjector`]: turns an `(x, z)` column into a point on the surface.
use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use mint::Vector3;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::Bounds;

/// Layer name queried when none is configured.
pub const DEFAULT_SURFACE_LAYER: &str = "Ground";

/// Height above the bounds from which downward casts start.
pub const DEFAULT_RAY_HEIGHT_OFFSET: f32 = 1000.0;

/// Downward ray cast against classified surfaces.
///
/// Implementors return the first hit at or below `origin` along `-Y`, considering only
/// surfaces classified as `layer`, or `None` if the ray hits nothing.
pub trait SurfaceQuery: Send + Sync {
    fn cast_down(&self, origin: Vector3<f32>, layer: &str) -> Option<Vector3<f32>>;
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for &T {
    #[inline]
    fn cast_down(&self, origin: Vector3<f32>, layer: &str) -> Option<Vector3<f32>> {
        (**self).cast_down(origin, layer)
    }
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for Box<T> {
    #[inline]
    fn cast_down(&self, origin: Vector3<f32>, layer: &str) -> Option<Vector3<f32>> {
        (**self).cast_down(origin, layer)
    }
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for Arc<T> {
    #[inline]
    fn cast_down(&self, origin: Vector3<f32>, layer: &str) -> Option<Vector3<f32>> {
        (**self).cast_down(origin, layer)
    }
}

/// A single height source over the horizontal plane.
///
/// `column` holds `(x, z)`. `None` marks a hole: there is no surface in that column.
pub trait Surface: Send + Sync {
    fn height_at(&self, column: Vec2) -> Option<f32>;
}

/// Horizontal plane at a fixed height, optionally limited to a rectangular footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatSurface {
    pub height: f32,
    /// Inclusive `(min, max)` corners of the plane in `(x, z)`. `None` means unbounded.
    pub footprint: Option<(Vec2, Vec2)>,
}

impl FlatSurface {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            footprint: None,
        }
    }

    /// Limits the plane to the rectangle spanned by `a` and `b`.
    pub fn with_footprint(mut self, a: Vec2, b: Vec2) -> Self {
        self.footprint = Some((a.min(b), a.max(b)));
        self
    }
}

impl Surface for FlatSurface {
    fn height_at(&self, column: Vec2) -> Option<f32> {
        match self.footprint {
            Some((min, max)) if column.cmplt(min).any() || column.cmpgt(max).any() => None,
            _ => Some(self.height),
        }
    }
}

/// Height field backed by a closure.
pub struct HeightFn<F>(pub F)
where
    F: Fn(Vec2) -> Option<f32> + Send + Sync;

impl<F> Surface for HeightFn<F>
where
    F: Fn(Vec2) -> Option<f32> + Send + Sync,
{
    #[inline]
    fn height_at(&self, column: Vec2) -> Option<f32> {
        (self.0)(column)
    }
}

/// Regular grid of height samples with bilinear interpolation.
///
/// Sample `(ix, iz)` sits at `origin + (ix, iz) * cell_size` and is stored row-major
/// (`iz * width + ix`). `NaN` samples are holes; any cell touching one has no surface.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    origin: Vec2,
    cell_size: f32,
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    pub fn new(
        origin: Vec2,
        cell_size: f32,
        width: usize,
        depth: usize,
        heights: Vec<f32>,
    ) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::InvalidConfig("cell_size must be > 0".into()));
        }
        if width < 2 || depth < 2 {
            return Err(Error::InvalidConfig("height grid needs at least 2x2 samples".into()));
        }
        let count = sample_count(width, depth)?;
        if heights.len() != count {
            return Err(Error::InvalidConfig(format!(
                "expected {} height samples, got {}",
                count, heights.len()
            )));
        }
        Ok(Self {
            origin,
            cell_size,
            width,
            depth,
            heights,
        })
    }

    /// Builds a grid by evaluating `f` at every sample position.
    pub fn from_fn(
        origin: Vec2,
        cell_size: f32,
        width: usize,
        depth: usize,
        f: impl Fn(Vec2) -> f32,
    ) -> Result<Self> {
        let mut heights = Vec::with_capacity(sample_count(width, depth)?);
        for iz in 0..depth {
            for ix in 0..width {
                heights.push(f(origin + Vec2::new(ix as f32, iz as f32) * cell_size));
            }
        }
        Self::new(origin, cell_size, width, depth, heights)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Far corner of the covered area.
    pub fn extent_max(&self) -> Vec2 {
        self.origin + Vec2::new((self.width - 1) as f32, (self.depth - 1) as f32) * self.cell_size
    }

    #[inline]
    fn sample(&self, ix: usize, iz: usize) -> f32 {
        self.heights[iz * self.width + ix]
    }
}

fn sample_count(width: usize, depth: usize) -> Result<usize> {
    match width.checked_mul(depth) {
        Some(count) => Ok(count),
        None => Err(Error::InvalidConfig("height grid is too large".into())),
    }
}

impl Surface for HeightGrid {
    fn height_at(&self, column: Vec2) -> Option<f32> {
        let local = (column - self.origin) / self.cell_size;
        let max = Vec2::new((self.width - 1) as f32, (self.depth - 1) as f32);
        if !(local.cmpge(Vec2::ZERO).all() && local.cmple(max).all()) {
            return None;
        }

        let ix0 = (local.x.floor() as usize).min(self.width - 2);
        let iz0 = (local.y.floor() as usize).min(self.depth - 2);
        let tx = local.x - ix0 as f32;
        let tz = local.y - iz0 as f32;

        let h00 = self.sample(ix0, iz0);
        let h10 = self.sample(ix0 + 1, iz0);
        let h01 = self.sample(ix0, iz0 + 1);
        let h11 = self.sample(ix0 + 1, iz0 + 1);
        if h00.is_nan() || h10.is_nan() || h01.is_nan() || h11.is_nan() {
            return None;
        }

        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        Some(near + (far - near) * tz)
    }
}

/// Registry of surfaces grouped by layer name.
///
/// A cast only sees surfaces registered under the requested layer, so a `"Water"`
/// plane above `"Ground"` terrain does not block a `"Ground"` query.
#[derive(Default, Clone)]
pub struct SurfaceLayers {
    layers: HashMap<String, Vec<Arc<dyn Surface>>>,
}

impl SurfaceLayers {
    /// Creates a new, empty [`SurfaceLayers`].
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
        }
    }

    /// Creates a registry holding one surface under `layer`.
    pub fn single<T>(layer: impl Into<String>, surface: T) -> Self
    where
        T: Surface + 'static,
    {
        let mut layers = Self::new();
        layers.register(layer, surface);
        layers
    }

    /// Adds a surface under `layer`. A layer may hold any number of surfaces.
    pub fn register<T>(&mut self, layer: impl Into<String>, surface: T)
    where
        T: Surface + 'static,
    {
        self.register_arc(layer, Arc::new(surface));
    }

    /// Adds a shared surface under `layer`.
    pub fn register_arc(&mut self, layer: impl Into<String>, surface: Arc<dyn Surface>) {
        self.layers.entry(layer.into()).or_default().push(surface);
    }

    /// Total number of registered surfaces across all layers.
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl SurfaceQuery for SurfaceLayers {
    fn cast_down(&self, origin: Vector3<f32>, layer: &str) -> Option<Vector3<f32>> {
        let origin = Vec3::from(origin);
        let Some(surfaces) = self.layers.get(layer) else {
            trace!("No surfaces registered under layer '{}'.", layer);
            return None;
        };

        let column = Vec2::new(origin.x, origin.z);
        surfaces
            .iter()
            .filter_map(|s| s.height_at(column))
            .filter(|h| h.is_finite() && *h <= origin.y)
            .reduce(f32::max)
            .map(|h| Vec3::new(origin.x, h, origin.z).into())
    }
}

/// Maps horizontal columns onto the surface below them.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProjector {
    /// Layer passed to every [`SurfaceQuery::cast_down`].
    pub layer: String,
    /// Distance above the top of the bounds where casts start.
    pub ray_height_offset: f32,
}

impl Default for SurfaceProjector {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_LAYER, DEFAULT_RAY_HEIGHT_OFFSET)
    }
}

impl SurfaceProjector {
    pub fn new(layer: impl Into<String>, ray_height_offset: f32) -> Self {
        Self {
            layer: layer.into(),
            ray_height_offset,
        }
    }

    /// Casts down through `column` from above `bounds` and returns `(x, hit height, z)`.
    ///
    /// The result is not checked against `bounds`; that is up to the caller.
    pub fn project(
        &self,
        column: Vec2,
        bounds: &Bounds,
        surface: &dyn SurfaceQuery,
    ) -> Option<Vec3> {
        let origin = Vec3::new(column.x, bounds.max().y + self.ray_height_offset, column.y);
        let hit = Vec3::from(surface.cast_down(origin.into(), &self.layer)?);
        Some(Vec3::new(column.x, hit.y, column.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> Bounds {
        Bounds::default()
    }

    #[test]
    fn flat_surface_respects_footprint() {
        let plane = FlatSurface::new(2.0).with_footprint(Vec2::ONE, Vec2::NEG_ONE);
        assert_eq!(plane.height_at(Vec2::ZERO), Some(2.0));
        assert_eq!(plane.height_at(Vec2::new(1.0, -1.0)), Some(2.0));
        assert_eq!(plane.height_at(Vec2::new(1.5, 0.0)), None);
        assert_eq!(FlatSurface::new(0.0).height_at(Vec2::splat(1e6)), Some(0.0));
    }

    #[test]
    fn height_grid_interpolates_bilinearly() {
        let grid = HeightGrid::new(Vec2::ZERO, 1.0, 2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(grid.height_at(Vec2::new(0.0, 0.0)), Some(0.0));
        assert_eq!(grid.height_at(Vec2::new(1.0, 1.0)), Some(3.0));
        assert_eq!(grid.height_at(Vec2::new(0.5, 0.5)), Some(1.5));
        assert_eq!(grid.height_at(Vec2::new(1.01, 0.5)), None);
        assert_eq!(grid.extent_max(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn height_grid_nan_samples_are_holes() {
        let nan = f32::NAN;
        let heights = vec![0.0, 0.0, nan, 0.0, 0.0, 0.0];
        let grid = HeightGrid::new(Vec2::ZERO, 1.0, 3, 2, heights).unwrap();
        assert_eq!(grid.height_at(Vec2::new(0.5, 0.5)), Some(0.0));
        assert_eq!(grid.height_at(Vec2::new(1.5, 0.5)), None);
    }

    #[test]
    fn height_grid_rejects_mismatched_samples() {
        let err = HeightGrid::new(Vec2::ZERO, 1.0, 3, 3, vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        let flat_cells = HeightGrid::new(Vec2::ZERO, 0.0, 2, 2, vec![0.0; 4]);
        assert!(flat_cells.is_err());
    }

    #[test]
    fn height_grid_rejects_overflowing_dimensions() {
        let err = HeightGrid::new(Vec2::ZERO, 1.0, usize::MAX, 2, vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        let result = HeightGrid::from_fn(Vec2::ZERO, 1.0, 2, usize::MAX, |_| 0.0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn layers_filter_by_classification_and_pick_topmost() {
        let mut layers = SurfaceLayers::new();
        layers.register("Ground", FlatSurface::new(0.0));
        let raised = FlatSurface::new(1.0).with_footprint(Vec2::ZERO, Vec2::ONE);
        layers.register("Ground", raised);
        layers.register("Water", FlatSurface::new(5.0));
        assert_eq!(layers.len(), 3);

        let origin = Vec3::new(0.5, 100.0, 0.5);
        let hit = layers.cast_down(origin.into(), "Ground").map(Vec3::from);
        assert_eq!(hit, Some(Vec3::new(0.5, 1.0, 0.5)));

        let outside = Vec3::new(-0.5, 100.0, 0.5);
        let hit = layers.cast_down(outside.into(), "Ground").map(Vec3::from);
        assert_eq!(hit, Some(Vec3::new(-0.5, 0.0, 0.5)));

        assert!(layers.cast_down(origin.into(), "Lava").is_none());
    }

    #[test]
    fn layers_ignore_surfaces_above_origin() {
        let layers = SurfaceLayers::single("Ground", FlatSurface::new(50.0));
        let below = Vec3::new(0.0, 10.0, 0.0);
        assert!(layers.cast_down(below.into(), "Ground").is_none());
    }

    #[test]
    fn projector_casts_from_above_bounds() {
        let layers = SurfaceLayers::single(
            "Ground",
            HeightFn(|c: Vec2| if c.x < 0.0 { None } else { Some(c.x * 0.1) }),
        );
        let projector = SurfaceProjector::default();
        let p = projector
            .project(Vec2::new(0.4, -0.2), &unit_bounds(), &layers)
            .expect("surface below column");
        assert_eq!(p.x, 0.4);
        assert_eq!(p.z, -0.2);
        assert!((p.y - 0.04).abs() < 1e-6);
        let miss = projector.project(Vec2::new(-0.1, 0.0), &unit_bounds(), &layers);
        assert!(miss.is_none());
    }

    #[test]
    fn projector_uses_configured_layer() {
        let layers = SurfaceLayers::single("Terrain", FlatSurface::new(0.0));
        let ground = SurfaceProjector::default();
        let terrain = SurfaceProjector::new("Terrain", DEFAULT_RAY_HEIGHT_OFFSET);
        let bounds = unit_bounds();
        assert!(ground.project(Vec2::ZERO, &bounds, &layers).is_none());
        assert!(terrain.project(Vec2::ZERO, &bounds, &layers).is_some());
    }
}
