//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform determinism.
//! They form the foundation for state-hash and replay verification.

pub mod fixed;
pub mod rect;
pub mod rng;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use rect::{FixedRect, FixedVec2};
pub use rng::DeterministicRng;
pub use hash::compute_state_hash;
