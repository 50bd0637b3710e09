//! Axis-aligned sampling region.
//!
//! [`Bounds`] is the box every accepted sample has to lie in. Horizontal columns are
//! passed around as [`Vec2`] holding `(x, z)`; the vertical axis is `y`.
use glam::{Vec2, Vec3};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::rand01;

/// Axis-aligned box described by its center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// World-space center of the box.
    pub center: Vec3,
    /// Half of the box size along each axis.
    pub half_extents: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(Vec3::ZERO, Vec3::ONE)
    }
}

impl Bounds {
    /// Creates bounds from a center and half-extents.
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Creates bounds from a center and full size.
    pub fn from_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    /// Creates bounds spanning two corners, in any order.
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Full size of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Returns `true` if `p` lies inside the box. Faces count as inside.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y && p.z >= min.z && p.z <= max.z
    }

    /// Returns `true` if the column `(x, z)` lies inside the horizontal footprint.
    #[inline]
    pub fn contains_column(&self, column: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        column.x >= min.x && column.x <= max.x && column.y >= min.z && column.y <= max.z
    }

    /// Draws a uniformly distributed column `(x, z)` from the horizontal footprint.
    pub fn random_column(&self, rng: &mut dyn RngCore) -> Vec2 {
        let min = self.min();
        let size = self.size();
        Vec2::new(min.x + rand01(rng) * size.x, min.z + rand01(rng) * size.z)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.center.is_finite() && self.half_extents.is_finite()
    }
}
