//! Simulation Events
//!
//! Events generated during a step for presentation layers (HUD, audio,
//! effects). The simulation itself never reads them back.

use serde::{Serialize, Deserialize};
use crate::core::rect::FixedVec2;
use crate::game::unit::UnitId;

/// Simulation event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEventData {
    /// A hostile entered the arena
    HostileSpawned {
        /// Unit id of the new hostile
        id: UnitId,
        /// Spawn position (top-left)
        at: FixedVec2,
    },

    /// A player projectile destroyed a hostile
    HostileDestroyed {
        /// Unit id of the destroyed hostile
        id: UnitId,
        /// Running count of destroyed hostiles
        destroyed_total: u32,
    },

    /// A projectile destroyed a brick tile
    BrickDestroyed {
        /// Grid column of the brick
        col: i32,
        /// Grid row of the brick
        row: i32,
    },

    /// Two projectiles annihilated each other
    ProjectilesCollided {
        /// Impact position (top-left of the resolving projectile)
        at: FixedVec2,
    },

    /// The objective was destroyed
    ObjectiveDestroyed,

    /// The player was hit by a hostile projectile
    PlayerDamaged {
        /// Lives remaining after the hit
        lives_left: u32,
    },

    /// The player re-entered at the spawn point
    PlayerRespawned {
        /// Respawn position (top-left)
        at: FixedVec2,
    },

    /// The session reached a terminal state
    SessionEnded {
        /// True for a win, false for a loss
        victory: bool,
        /// Session duration in milliseconds
        duration_ms: u64,
    },
}

/// A simulation event with its timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Timestamp (ms) of the step that produced the event
    pub at_ms: u64,

    /// Event data
    pub data: SimEventData,
}

impl SimEvent {
    /// Create a new event.
    pub fn new(at_ms: u64, data: SimEventData) -> Self {
        Self { at_ms, data }
    }
}
