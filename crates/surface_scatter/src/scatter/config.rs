//! Configuration of a sampling run.
use std::time::Duration;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Bounds;
use crate::sampling::NeighborSearch;
use crate::surface::{SurfaceProjector, DEFAULT_RAY_HEIGHT_OFFSET, DEFAULT_SURFACE_LAYER};

/// Attempts per active sample before it counts as saturated.
pub const DEFAULT_SAMPLE_LIMIT: usize = 30;

/// Accepted samples per batch before the driver yields.
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Configuration for a [`crate::scatter::SurfacePoissonSampler`] run.
///
/// Very small radii relative to the bounds make runs long; the driver does not guard
/// against that.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplerConfig {
    /// Region all samples must lie in.
    pub bounds: Bounds,
    /// Minimum distance between any two accepted samples.
    pub sampling_radius: f32,
    /// Candidate attempts per picked active sample.
    pub sample_limit: usize,
    /// Accepted samples per batch.
    pub batch_limit: usize,
    /// Pause between batches when driven by [`crate::scatter::Pacer`].
    pub pacing_delay: Duration,
    /// Random columns tried when placing the first sample.
    pub seed_attempts: usize,
    /// Height above `bounds` where surface casts start.
    pub ray_height_offset: f32,
    /// Surface classification the casts are restricted to.
    pub surface_layer: String,
    /// Strategy for minimum-distance queries.
    pub neighbor_search: NeighborSearch,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            sampling_radius: 0.5,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            batch_limit: DEFAULT_BATCH_LIMIT,
            pacing_delay: Duration::from_secs(3),
            seed_attempts: 1,
            ray_height_offset: DEFAULT_RAY_HEIGHT_OFFSET,
            surface_layer: DEFAULT_SURFACE_LAYER.to_owned(),
            neighbor_search: NeighborSearch::Linear,
        }
    }
}

impl SamplerConfig {
    /// Creates a new [`SamplerConfig`] for the given bounds.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Sets the sampling region.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the sampling region from a center and full size.
    pub fn with_region(self, center: Vec3, size: Vec3) -> Self {
        self.with_bounds(Bounds::from_size(center, size))
    }

    /// Sets the minimum separation.
    pub fn with_sampling_radius(mut self, sampling_radius: f32) -> Self {
        self.sampling_radius = sampling_radius;
        self
    }

    /// Sets the attempts per active sample.
    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    /// Sets the accepted samples per batch.
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    /// Sets the pause between batches.
    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self
    }

    /// Sets the number of seed attempts.
    pub fn with_seed_attempts(mut self, seed_attempts: usize) -> Self {
        self.seed_attempts = seed_attempts;
        self
    }

    /// Sets the cast start height above the bounds.
    pub fn with_ray_height_offset(mut self, ray_height_offset: f32) -> Self {
        self.ray_height_offset = ray_height_offset;
        self
    }

    /// Sets the surface layer.
    pub fn with_surface_layer(mut self, surface_layer: impl Into<String>) -> Self {
        self.surface_layer = surface_layer.into();
        self
    }

    /// Sets the neighbor search strategy.
    pub fn with_neighbor_search(mut self, neighbor_search: NeighborSearch) -> Self {
        self.neighbor_search = neighbor_search;
        self
    }

    /// Projector matching this configuration.
    pub fn projector(&self) -> SurfaceProjector {
        SurfaceProjector::new(self.surface_layer.clone(), self.ray_height_offset)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_finite() {
            return Err(Error::InvalidConfig("bounds must be finite".into()));
        }
        let half = self.bounds.half_extents;
        if half.x <= 0.0 || half.z <= 0.0 || half.y < 0.0 {
            return Err(Error::InvalidConfig(
                "bounds half_extents must be > 0 in x and z and >= 0 in y".into(),
            ));
        }
        if !self.sampling_radius.is_finite() || self.sampling_radius <= 0.0 {
            return Err(Error::InvalidConfig("sampling_radius must be > 0".into()));
        }
        if self.sample_limit == 0 {
            return Err(Error::InvalidConfig("sample_limit must be >= 1".into()));
        }
        if self.batch_limit == 0 {
            return Err(Error::InvalidConfig("batch_limit must be >= 1".into()));
        }
        if self.seed_attempts == 0 {
            return Err(Error::InvalidConfig("seed_attempts must be >= 1".into()));
        }
        if !self.ray_height_offset.is_finite() || self.ray_height_offset < 0.0 {
            return Err(Error::InvalidConfig("ray_height_offset must be finite and >= 0".into()));
        }

        Ok(())
    }
}
