//! Blocking host loop that spreads a run over time.
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rand::RngCore;
use tracing::{debug, info};

use crate::error::Result;
use crate::scatter::driver::{RunSummary, SurfacePoissonSampler};
use crate::scatter::events::EventSink;
use crate::surface::SurfaceQuery;

/// How a paced run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PacedOutcome {
    /// The active list ran empty.
    Completed(RunSummary),
    /// The cancel flag was raised at a batch boundary.
    Cancelled(RunSummary),
}

impl PacedOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            PacedOutcome::Completed(summary) | PacedOutcome::Cancelled(summary) => summary,
        }
    }
}

/// Runs one batch at a time and sleeps between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    pub delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pacer using the sampler's configured `pacing_delay`.
    pub fn for_sampler<S, R>(sampler: &SurfacePoissonSampler<S, R>) -> Self
    where
        S: SurfaceQuery,
        R: RngCore,
    {
        Self::new(sampler.config().pacing_delay)
    }

    /// Drives `sampler` to termination, checking `cancel` before each batch.
    ///
    /// A cancelled run is aborted; its samples stay valid.
    pub fn run<S, R>(
        &self,
        sampler: &mut SurfacePoissonSampler<S, R>,
        sink: &mut dyn EventSink,
        cancel: &AtomicBool,
    ) -> Result<PacedOutcome>
    where
        S: SurfaceQuery,
        R: RngCore,
    {
        loop {
            if cancel.load(Ordering::Relaxed) {
                info!(
                    "Paced run cancelled after {} samples.",
                    sampler.points().len()
                );
                sampler.abort_with_events(sink);
                return Ok(PacedOutcome::Cancelled(sampler.summary()));
            }

            let report = sampler.run_batch_with_events(sink)?;
            if report.finished {
                return Ok(PacedOutcome::Completed(sampler.summary()));
            }

            if !self.delay.is_zero() {
                debug!("Pausing {:?} before the next batch.", self.delay);
                thread::sleep(self.delay);
            }
        }
    }
}
