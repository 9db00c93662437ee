//! # Redoubt Simulation Core
//!
//! Deterministic tile-grid arena defense simulation: one player unit
//! defends a fixed objective against a wave of hostiles, with axis-aligned
//! movement, projectile combat, and destructible terrain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       REDOUBT CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic            │
//! │  ├── rect.rs     - Fixed-point points and AABBs             │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG          │
//! │  └── hash.rs     - State hashing for verification           │
//! │                                                             │
//! │  game/           - Simulation (deterministic)               │
//! │  ├── input.rs    - Intent frames and recording              │
//! │  ├── arena.rs    - Terrain grid and objective               │
//! │  ├── unit.rs     - Player and hostile unit model            │
//! │  ├── projectile.rs - Projectile model and resolution        │
//! │  ├── spawn.rs    - Hostile spawn controller                 │
//! │  ├── ai.rs       - Hostile decision policy                  │
//! │  ├── state.rs    - Session state                            │
//! │  ├── tick.rs     - Per-step orchestration and replay        │
//! │  └── events.rs   - Events for presentation layers           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The entire crate is **100% deterministic**:
//! - No floating-point arithmetic in simulation logic
//! - Entity vectors keep spawn order, so iteration order is fixed
//! - No system time dependencies; hosts supply millisecond timestamps
//! - All randomness from one seeded Xorshift128+ per session
//!
//! Given an identical seed and `(intents, timestamp)` sequence, two
//! sessions produce **identical state** on any platform (x86, ARM, WASM),
//! verified by SHA-256 state hashes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::rect::{FixedRect, FixedVec2};
pub use core::rng::DeterministicRng;
pub use game::input::{IntentFrame, IntentDelta, IntentRecording};
pub use game::state::{SessionState, HudSnapshot};
pub use game::tick::{step, replay, SimConfig, StepResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recommended step cadence (ms between simulation steps)
pub const STEP_INTERVAL_MS: u64 = 16;
