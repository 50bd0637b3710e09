//! Adapter between sampling events and whatever materializes samples in a scene.
use glam::Vec3;

use crate::scatter::events::{EventSink, SamplerEvent, SamplerEventKind};

/// Receives accepted samples and removal requests.
///
/// Implement this for the renderer or entity spawner of the host and wrap it in a
/// [`SpawnerSink`] to feed it from a run.
pub trait Spawner {
    /// A sample was accepted at `point`. Called for the seed as well.
    fn on_point_accepted(&mut self, point: Vec3);

    /// Every previously spawned object should be removed.
    fn on_clear(&mut self);
}

/// Collects spawned points in memory.
impl Spawner for Vec<Vec3> {
    fn on_point_accepted(&mut self, point: Vec3) {
        self.push(point);
    }

    fn on_clear(&mut self) {
        self.clear();
    }
}

/// [`EventSink`] forwarding placement and clear events to a [`Spawner`].
pub struct SpawnerSink<S: Spawner> {
    spawner: S,
}

impl<S: Spawner> SpawnerSink<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut S {
        &mut self.spawner
    }

    pub fn into_inner(self) -> S {
        self.spawner
    }
}

impl<S: Spawner> EventSink for SpawnerSink<S> {
    fn send(&mut self, event: SamplerEvent) {
        match event {
            SamplerEvent::SeedPlaced { point } | SamplerEvent::PointAccepted { point, .. } => {
                self.spawner.on_point_accepted(point)
            }
            SamplerEvent::Cleared => self.spawner.on_clear(),
            _ => {}
        }
    }

    fn wants(&self, kind: SamplerEventKind) -> bool {
        matches!(
            kind,
            SamplerEventKind::SeedPlaced
                | SamplerEventKind::PointAccepted
                | SamplerEventKind::Cleared
        )
    }
}
