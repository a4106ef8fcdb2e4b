//! Core deterministic primitives.
//!
//! Everything in this module is platform-independent: the same seed and
//! the same inputs always yield the same values and hashes.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use hash::{compute_state_hash, StateHash, StateHasher};
