//! Event types and sinks for observing sampling runs.
//!
//! This module defines [`SamplerEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while stepping a
//! [`crate::scatter::SurfacePoissonSampler`].
use glam::Vec3;

use crate::sampling::Rejection;
use crate::scatter::config::SamplerConfig;
use crate::scatter::driver::RunSummary;

/// Describes events emitted by a sampling run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SamplerEvent {
    /// Emitted when a run leaves `Idle`.
    RunStarted {
        /// The configuration used.
        config: SamplerConfig,
    },

    /// Emitted when the first sample was placed.
    SeedPlaced {
        /// The seed sample on the surface.
        point: Vec3,
    },

    /// Emitted when no seed could be placed. The run is over.
    SeedFailed {
        /// Number of random columns tried.
        attempts: usize,
    },

    /// Emitted for every sample accepted around an active sample.
    PointAccepted {
        /// Index of the sample in the accepted set.
        index: usize,
        /// The accepted sample.
        point: Vec3,
    },

    /// Emitted when a candidate around `seed` was rejected.
    CandidateRejected {
        /// The active sample the candidate was drawn around.
        seed: Vec3,
        /// Why the candidate was rejected.
        reason: Rejection,
    },

    /// Emitted when an active sample ran out of attempts and left the active list.
    SeedEvicted {
        /// The saturated sample.
        point: Vec3,
    },

    /// Emitted when a batch reached its limit and the driver yields.
    BatchYielded {
        /// Samples accepted during the batch.
        accepted_in_batch: usize,
        /// Samples accepted so far in the run.
        total_accepted: usize,
    },

    /// Emitted when the active list is exhausted or the run was aborted.
    RunFinished {
        /// Summary of the finished run.
        summary: RunSummary,
    },

    /// Emitted when the run was cleared and all samples discarded.
    Cleared,
}

impl SamplerEvent {
    /// Returns the [`SamplerEventKind`] of this event.
    pub fn kind(&self) -> SamplerEventKind {
        match self {
            SamplerEvent::RunStarted { .. } => SamplerEventKind::RunStarted,
            SamplerEvent::SeedPlaced { .. } => SamplerEventKind::SeedPlaced,
            SamplerEvent::SeedFailed { .. } => SamplerEventKind::SeedFailed,
            SamplerEvent::PointAccepted { .. } => SamplerEventKind::PointAccepted,
            SamplerEvent::CandidateRejected { .. } => SamplerEventKind::CandidateRejected,
            SamplerEvent::SeedEvicted { .. } => SamplerEventKind::SeedEvicted,
            SamplerEvent::BatchYielded { .. } => SamplerEventKind::BatchYielded,
            SamplerEvent::RunFinished { .. } => SamplerEventKind::RunFinished,
            SamplerEvent::Cleared => SamplerEventKind::Cleared,
        }
    }
}

/// Discriminant of [`SamplerEvent`], used to filter events before they are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerEventKind {
    RunStarted,
    SeedPlaced,
    SeedFailed,
    PointAccepted,
    CandidateRejected,
    SeedEvicted,
    BatchYielded,
    RunFinished,
    Cleared,
}

/// A generic event sink that accepts [`SamplerEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SamplerEvent);

    /// Returns `false` if events of `kind` would be discarded. The driver skips building
    /// them in that case.
    #[inline]
    fn wants(&self, _kind: SamplerEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SamplerEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SamplerEvent) {}

    #[inline]
    fn wants(&self, _kind: SamplerEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SamplerEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SamplerEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SamplerEvent),
{
    #[inline]
    fn send(&mut self, event: SamplerEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally limited to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SamplerEvent>,
    only: Option<Vec<SamplerEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collects only events whose kind is listed in `kinds`.
    pub fn only(kinds: impl IntoIterator<Item = SamplerEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<SamplerEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SamplerEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: SamplerEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SamplerEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    #[inline]
    fn wants(&self, kind: SamplerEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SamplerEvent) {
        let kind = event.kind();
        let mut targets = self.sinks.iter_mut().filter(|s| s.wants(kind)).peekable();
        while let Some(sink) = targets.next() {
            if targets.peek().is_some() {
                sink.send(event.clone());
            } else {
                sink.send(event);
                break;
            }
        }
    }

    fn wants(&self, kind: SamplerEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
