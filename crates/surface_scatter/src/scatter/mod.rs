//! Driving a sampling run: configuration, the step-driven sampler, events and hosts.
pub mod config;
pub mod driver;
pub mod events;
pub mod pacing;
pub mod spawner;

pub use config::SamplerConfig;
pub use driver::{
    sample_surface, BatchReport, RunSummary, SamplerState, SamplerStats, StepOutcome,
    SurfacePoissonSampler,
};
pub use pacing::{PacedOutcome, Pacer};
