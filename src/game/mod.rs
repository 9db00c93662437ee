//! Simulation Module
//!
//! All session simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: logical intent frames and delta-compressed recording
//! - `arena`: terrain grid, objective, fixed layout
//! - `unit`: shared unit model (player and hostiles)
//! - `projectile`: projectile model and per-step resolution
//! - `spawn`: rate/capacity-limited hostile spawn controller
//! - `ai`: hostile decision policy
//! - `state`: session state, counters, outcome flags
//! - `tick`: per-step orchestration, config, replay
//! - `events`: simulation events for presentation layers

pub mod input;
pub mod arena;
pub mod unit;
pub mod projectile;
pub mod spawn;
pub mod ai;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use input::{IntentFrame, IntentDelta, IntentRecording};
pub use arena::{Arena, Tile, TileKind, Objective};
pub use unit::{Unit, UnitId, Faction, Direction};
pub use projectile::Projectile;
pub use state::{SessionState, HudSnapshot};
pub use tick::{SimConfig, ConfigError, StepResult};
pub use events::{SimEvent, SimEventData};
