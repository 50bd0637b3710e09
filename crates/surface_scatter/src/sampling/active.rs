//! Working set of samples that can still spawn candidates.
use glam::Vec3;
use rand::RngCore;

use crate::sampling::rand_index;

/// Accepted samples that are not yet saturated.
///
/// Each entry stands for one acceptance, so two samples with equal coordinates stay
/// distinct. Order carries no meaning: eviction swaps the last entry into the hole.
#[derive(Debug, Clone, Default)]
pub struct ActiveList {
    entries: Vec<Vec3>,
}

/// Position of an entry inside the [`ActiveList`], valid until the list is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSlot(usize);

impl ActiveList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, point: Vec3) {
        self.entries.push(point);
    }

    /// Picks an entry uniformly at random.
    pub fn pick(&self, rng: &mut dyn RngCore) -> Option<(ActiveSlot, Vec3)> {
        if self.entries.is_empty() {
            return None;
        }
        let slot = rand_index(rng, self.entries.len());
        Some((ActiveSlot(slot), self.entries[slot]))
    }

    /// Removes the entry at `slot` and returns it.
    pub fn evict(&mut self, slot: ActiveSlot) -> Option<Vec3> {
        (slot.0 < self.entries.len()).then(|| self.entries.swap_remove(slot.0))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.entries.iter()
    }
}
