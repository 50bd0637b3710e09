#![forbid(unsafe_code)]
//! surface_scatter: Poisson-disk sampling of points on the surface below a bounded region.
//!
//! Modules:
//! - geometry: the axis-aligned sampling bounds
//! - surface: downward surface queries, height sources, layer registry, projection
//! - sampling: candidate generation, active list, accepted set, validity test
//! - scatter: configuration, the step-driven sampler, events, spawner adapter, pacing
//!
//! Accepted samples are never closer than the sampling radius to each other and always
//! lie inside the bounds.
pub mod error;
pub mod geometry;
pub mod sampling;
pub mod scatter;
pub mod surface;

/// Convenient re-exports for common types. Import with `use surface_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Bounds;
    pub use crate::sampling::{
        AcceptedPoints, ActiveList, CandidateGenerator, NeighborSearch, Rejection, ValidityTester,
    };
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, SamplerEvent, SamplerEventKind, VecSink,
    };
    pub use crate::scatter::spawner::{Spawner, SpawnerSink};
    pub use crate::scatter::{
        sample_surface, BatchReport, PacedOutcome, Pacer, RunSummary, SamplerConfig, SamplerState,
        SamplerStats, StepOutcome, SurfacePoissonSampler,
    };
    pub use crate::surface::{
        FlatSurface, HeightFn, HeightGrid, Surface, SurfaceLayers, SurfaceProjector, SurfaceQuery,
        DEFAULT_RAY_HEIGHT_OFFSET, DEFAULT_SURFACE_LAYER,
    };
}
