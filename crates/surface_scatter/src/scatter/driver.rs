//! Step-driven Poisson-disk sampler over a surface.
//!
//! [`SurfacePoissonSampler`] is an explicit state machine. Each call to
//! [`SurfacePoissonSampler::step`] does one unit of work (place the seed, or process one
//! active sample), so a host can interleave sampling with its own loop, stop between
//! any two steps, or run everything at once with
//! [`SurfacePoissonSampler::run_to_completion`].
use glam::Vec3;
use rand::RngCore;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::sampling::{AcceptedPoints, ActiveList, CandidateGenerator, Rejection, ValidityTester};
use crate::scatter::config::SamplerConfig;
use crate::scatter::events::{EventSink, SamplerEvent, SamplerEventKind};
use crate::surface::SurfaceQuery;

/// Lifecycle of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    /// Nothing sampled yet.
    #[default]
    Idle,
    /// Looking for the first surface point.
    Seeding,
    /// Growing samples around active samples.
    Sampling,
    /// The current batch is full; the next step starts a new batch.
    Draining,
    /// No further samples can be produced.
    Terminated,
}

/// Result of a single [`SurfacePoissonSampler::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The first sample was placed.
    Seeded(Vec3),
    /// A new sample was accepted around an active sample.
    Accepted(Vec3),
    /// The picked active sample saturated and was removed from the active list.
    Evicted(Vec3),
    /// The run is over; nothing was done.
    Terminated,
}

/// Counters collected while sampling.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Random columns tried while seeding.
    pub seed_attempts: usize,
    /// Candidates generated around active samples.
    pub attempts: usize,
    pub projection_misses: usize,
    pub too_close: usize,
    pub out_of_bounds: usize,
    /// Active samples removed after exhausting their attempts.
    pub evictions: usize,
    /// Batches started.
    pub batches: usize,
}

impl SamplerStats {
    /// Total rejected candidates.
    pub fn rejections(&self) -> usize {
        self.projection_misses + self.too_close + self.out_of_bounds
    }

    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::ProjectionMiss => self.projection_misses += 1,
            Rejection::TooClose { .. } => self.too_close += 1,
            Rejection::OutOfBounds => self.out_of_bounds += 1,
        }
    }
}

/// Summary of a run.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Number of accepted samples, seed included.
    pub accepted: usize,
    pub stats: SamplerStats,
    /// `true` if the run was stopped with [`SurfacePoissonSampler::abort`].
    pub aborted: bool,
}

/// What happened during one [`SurfacePoissonSampler::run_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Samples accepted in this batch, seed included.
    pub accepted: usize,
    /// Active samples evicted in this batch.
    pub evicted: usize,
    /// `true` once the run has terminated.
    pub finished: bool,
}

/// Poisson-disk sampler that places samples on the surface below a bounded region.
///
/// The sampler owns its active list and accepted set; nothing is shared between
/// samplers, so independent runs may execute on different threads.
pub struct SurfacePoissonSampler<S, R> {
    config: SamplerConfig,
    surface: S,
    rng: R,
    generator: CandidateGenerator,
    tester: ValidityTester,
    active: ActiveList,
    accepted: AcceptedPoints,
    state: SamplerState,
    batch_accepted: usize,
    stats: SamplerStats,
    aborted: bool,
}

impl<S: SurfaceQuery, R: RngCore> SurfacePoissonSampler<S, R> {
    /// Validates `config` and creates an idle sampler.
    pub fn try_new(config: SamplerConfig, surface: S, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, surface, rng))
    }

    /// Creates an idle sampler without validating `config`.
    ///
    /// Prefer [`Self::try_new`]. An invalid configuration is still caught when the run
    /// starts: the first step returns [`Error::InvalidConfig`] and the sampler terminates.
    pub fn new(config: SamplerConfig, surface: S, rng: R) -> Self {
        Self::build(config, surface, rng)
    }

    fn build(config: SamplerConfig, surface: S, rng: R) -> Self {
        let radius = config.sampling_radius;
        let accepted = AcceptedPoints::with_search(config.neighbor_search, &config.bounds, radius);
        Self {
            generator: CandidateGenerator::new(radius),
            tester: ValidityTester::new(radius, config.projector()),
            active: ActiveList::new(),
            accepted,
            state: SamplerState::Idle,
            batch_accepted: 0,
            stats: SamplerStats::default(),
            aborted: false,
            config,
            surface,
            rng,
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SamplerState::Terminated
    }

    /// Accepted samples in acceptance order.
    pub fn points(&self) -> &[Vec3] {
        self.accepted.as_slice()
    }

    pub fn accepted(&self) -> &AcceptedPoints {
        &self.accepted
    }

    /// Number of samples that can still spawn candidates.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn stats(&self) -> &SamplerStats {
        &self.stats
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            accepted: self.accepted.len(),
            stats: self.stats.clone(),
            aborted: self.aborted,
        }
    }

    /// Consumes the sampler and returns the accepted samples.
    pub fn into_points(self) -> Vec<Vec3> {
        self.accepted.into_vec()
    }

    /// Performs one unit of work.
    pub fn step(&mut self) -> Result<StepOutcome> {
        self.step_with_events(&mut ())
    }

    /// Performs one unit of work, reporting to `sink`.
    ///
    /// Returns [`Error::NoValidSeed`] if the first sample cannot be placed; the run is
    /// terminated afterwards with no samples.
    pub fn step_with_events(&mut self, sink: &mut dyn EventSink) -> Result<StepOutcome> {
        match self.state {
            SamplerState::Idle => {
                self.start(sink)?;
                self.seed(sink)
            }
            SamplerState::Seeding => self.seed(sink),
            SamplerState::Draining => {
                self.resume();
                Ok(self.grow(sink))
            }
            SamplerState::Sampling => Ok(self.grow(sink)),
            SamplerState::Terminated => Ok(StepOutcome::Terminated),
        }
    }

    /// Steps until the batch limit is reached or the run terminates.
    pub fn run_batch(&mut self) -> Result<BatchReport> {
        self.run_batch_with_events(&mut ())
    }

    pub fn run_batch_with_events(&mut self, sink: &mut dyn EventSink) -> Result<BatchReport> {
        if self.state == SamplerState::Draining {
            self.resume();
        }

        let mut report = BatchReport::default();
        loop {
            match self.step_with_events(sink)? {
                StepOutcome::Seeded(_) | StepOutcome::Accepted(_) => report.accepted += 1,
                StepOutcome::Evicted(_) => report.evicted += 1,
                StepOutcome::Terminated => break,
            }
            if matches!(
                self.state,
                SamplerState::Draining | SamplerState::Terminated
            ) {
                break;
            }
        }
        report.finished = self.is_terminated();
        Ok(report)
    }

    /// Runs batches back to back until the run terminates.
    pub fn run_to_completion(&mut self) -> Result<RunSummary> {
        self.run_to_completion_with_events(&mut ())
    }

    pub fn run_to_completion_with_events(
        &mut self,
        sink: &mut dyn EventSink,
    ) -> Result<RunSummary> {
        while !self.run_batch_with_events(sink)?.finished {}
        Ok(self.summary())
    }

    /// Stops the run. Samples accepted so far are kept and remain well separated.
    pub fn abort(&mut self) {
        self.abort_with_events(&mut ());
    }

    pub fn abort_with_events(&mut self, sink: &mut dyn EventSink) {
        if self.is_terminated() {
            return;
        }
        self.aborted = true;
        self.active.clear();
        self.finish(sink);
    }

    /// Discards all samples and returns to [`SamplerState::Idle`].
    pub fn clear(&mut self) {
        self.clear_with_events(&mut ());
    }

    pub fn clear_with_events(&mut self, sink: &mut dyn EventSink) {
        if !matches!(self.state, SamplerState::Idle | SamplerState::Terminated) {
            warn!(
                "Clearing an unfinished run with {} accepted samples.",
                self.accepted.len()
            );
        }
        self.active.clear();
        self.accepted.clear();
        self.stats = SamplerStats::default();
        self.batch_accepted = 0;
        self.aborted = false;
        self.state = SamplerState::Idle;
        if sink.wants(SamplerEventKind::Cleared) {
            sink.send(SamplerEvent::Cleared);
        }
    }

    fn start(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        if let Err(err) = self.config.validate() {
            warn!("Refusing to start sampling: {}.", err);
            self.state = SamplerState::Terminated;
            return Err(err);
        }

        info!(
            "Sampling started: radius {}, sample limit {}, batch limit {}.",
            self.config.sampling_radius, self.config.sample_limit, self.config.batch_limit
        );
        self.state = SamplerState::Seeding;
        self.batch_accepted = 0;
        self.stats.batches = 1;
        if sink.wants(SamplerEventKind::RunStarted) {
            sink.send(SamplerEvent::RunStarted {
                config: self.config.clone(),
            });
        }
        Ok(())
    }

    fn seed(&mut self, sink: &mut dyn EventSink) -> Result<StepOutcome> {
        let bounds = self.config.bounds;
        for _ in 0..self.config.seed_attempts {
            self.stats.seed_attempts += 1;
            let column = bounds.random_column(&mut self.rng);
            let projector = &self.tester.projector;
            match projector.project(column, &bounds, &self.surface) {
                Some(point) if bounds.contains(point) => {
                    let index = self.accepted.push(point);
                    self.active.push(point);
                    self.state = SamplerState::Sampling;
                    info!("Seed placed at {} (index {}).", point, index);
                    if sink.wants(SamplerEventKind::SeedPlaced) {
                        sink.send(SamplerEvent::SeedPlaced { point });
                    }
                    return Ok(StepOutcome::Seeded(point));
                }
                Some(point) => trace!("Seed candidate {} lies outside the bounds.", point),
                None => trace!("No surface below seed column {}.", column),
            }
        }

        let attempts = self.stats.seed_attempts;
        warn!(
            "No valid seed after {} attempt(s); move the bounds over the surface layer '{}'.",
            attempts, self.config.surface_layer
        );
        self.state = SamplerState::Terminated;
        if sink.wants(SamplerEventKind::SeedFailed) {
            sink.send(SamplerEvent::SeedFailed { attempts });
        }
        Err(Error::NoValidSeed { attempts })
    }

    fn resume(&mut self) {
        self.state = SamplerState::Sampling;
        self.batch_accepted = 0;
        self.stats.batches += 1;
        debug!("Batch {} started.", self.stats.batches);
    }

    fn grow(&mut self, sink: &mut dyn EventSink) -> StepOutcome {
        let Some((slot, seed)) = self.active.pick(&mut self.rng) else {
            return self.finish(sink);
        };

        let bounds = self.config.bounds;
        for _ in 0..self.config.sample_limit {
            self.stats.attempts += 1;
            let candidate = self.generator.generate(seed, &mut self.rng);
            let tester = &self.tester;
            match tester.test(candidate, &bounds, &self.accepted, &self.surface) {
                Ok(point) => {
                    self.accept(point, sink);
                    return StepOutcome::Accepted(point);
                }
                Err(reason) => {
                    self.stats.record(reason);
                    trace!("Candidate around {} rejected: {}.", seed, reason);
                    if sink.wants(SamplerEventKind::CandidateRejected) {
                        sink.send(SamplerEvent::CandidateRejected { seed, reason });
                    }
                }
            }
        }

        self.active.evict(slot);
        self.stats.evictions += 1;
        trace!(
            "Active sample {} saturated; {} left.",
            seed, self.active.len()
        );
        if sink.wants(SamplerEventKind::SeedEvicted) {
            sink.send(SamplerEvent::SeedEvicted { point: seed });
        }
        if self.active.is_empty() {
            self.finish(sink);
        }
        StepOutcome::Evicted(seed)
    }

    fn accept(&mut self, point: Vec3, sink: &mut dyn EventSink) {
        let index = self.accepted.push(point);
        self.active.push(point);
        self.batch_accepted += 1;
        if sink.wants(SamplerEventKind::PointAccepted) {
            sink.send(SamplerEvent::PointAccepted { index, point });
        }

        if self.batch_accepted >= self.config.batch_limit {
            self.state = SamplerState::Draining;
            debug!(
                "Batch {} full with {} samples; {} accepted in total.",
                self.stats.batches, self.batch_accepted, self.accepted.len()
            );
            if sink.wants(SamplerEventKind::BatchYielded) {
                sink.send(SamplerEvent::BatchYielded {
                    accepted_in_batch: self.batch_accepted,
                    total_accepted: self.accepted.len(),
                });
            }
        }
    }

    fn finish(&mut self, sink: &mut dyn EventSink) -> StepOutcome {
        self.state = SamplerState::Terminated;
        let summary = self.summary();
        info!(
            "Sampling finished: {} samples, {} attempts, {} rejections, {} batches{}.",
            summary.accepted,
            summary.stats.attempts,
            summary.stats.rejections(),
            summary.stats.batches,
            if summary.aborted { " (aborted)" } else { "" }
        );
        if sink.wants(SamplerEventKind::RunFinished) {
            sink.send(SamplerEvent::RunFinished { summary });
        }
        StepOutcome::Terminated
    }
}

/// Samples `surface` inside `config.bounds` until no more samples fit.
pub fn sample_surface<S, R>(config: SamplerConfig, surface: S, rng: R) -> Result<Vec<Vec3>>
where
    S: SurfaceQuery,
    R: RngCore,
{
    let mut sampler = SurfacePoissonSampler::try_new(config, surface, rng)?;
    sampler.run_to_completion()?;
    Ok(sampler.into_points())
}
