//! Acceptance test for a single candidate.
use std::fmt;

use glam::{Vec2, Vec3};

use crate::geometry::Bounds;
use crate::sampling::AcceptedPoints;
use crate::surface::{SurfaceProjector, SurfaceQuery};

/// Why a candidate was not accepted. Rejections only cost one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// No surface of the configured layer below the candidate column.
    ProjectionMiss,
    /// The projected point is closer than the sampling radius to an accepted sample.
    TooClose {
        /// Distance to the closest accepted sample.
        distance: f32,
    },
    /// The projected point keeps its distance but lies outside the bounds.
    OutOfBounds,
}

impl Rejection {
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::ProjectionMiss => "projection_miss",
            Rejection::TooClose { .. } => "too_close",
            Rejection::OutOfBounds => "out_of_bounds",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooClose { distance } => write!(f, "too close ({distance:.4})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Projects candidates and checks them against the accepted set and the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityTester {
    /// Minimum separation between accepted samples.
    pub radius: f32,
    pub projector: SurfaceProjector,
}

impl ValidityTester {
    pub fn new(radius: f32, projector: SurfaceProjector) -> Self {
        Self { radius, projector }
    }

    /// Returns the projected sample if `candidate` may be accepted.
    ///
    /// Only `candidate.x` and `candidate.z` are used; the height comes from the surface.
    pub fn test(
        &self,
        candidate: Vec3,
        bounds: &Bounds,
        accepted: &AcceptedPoints,
        surface: &dyn SurfaceQuery,
    ) -> Result<Vec3, Rejection> {
        let column = Vec2::new(candidate.x, candidate.z);
        let projected = self
            .projector
            .project(column, bounds, surface)
            .ok_or(Rejection::ProjectionMiss)?;

        if let Some(distance) = accepted.closest_within(projected, self.radius) {
            return Err(Rejection::TooClose { distance });
        }
        if !bounds.contains(projected) {
            return Err(Rejection::OutOfBounds);
        }
        Ok(projected)
    }
}
