//! Building blocks of surface Poisson-disk sampling.
//!
//! The driver in [`crate::scatter`] combines these pieces:
//! - [`CandidateGenerator`]: random offsets in the `[r, 2r)` annulus around a seed.
//! - [`ActiveList`]: accepted samples that may still spawn candidates.
//! - [`AcceptedPoints`]: the append-only result set used for distance rejection.
//! - [`ValidityTester`]: projection, separation and bounds checks for one candidate.
use rand::RngCore;

pub mod accepted;
pub mod active;
pub mod candidate;
pub mod validity;

pub use accepted::{AcceptedPoints, NeighborSearch};
pub use active::ActiveList;
pub use candidate::CandidateGenerator;
pub use validity::{Rejection, ValidityTester};

/// Generate a random float in the range [0, 1).
///
/// Uses the top 24 bits so the result is exactly representable and never rounds up to 1.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Pick a uniformly distributed index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0);
    let scaled = (rng.next_u64() as u128 * len as u128) >> 64;
    scaled as usize
}
