//! Session State Definitions
//!
//! Complete state for one simulation session. Entity vectors keep spawn
//! order, so iteration order is deterministic by construction.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::arena::{Arena, PLAYER_SPAWN};
use crate::game::unit::{Unit, UnitId};
use crate::game::projectile::Projectile;
use crate::game::events::{SimEvent, SimEventData};

// =============================================================================
// SESSION STATE
// =============================================================================

/// Complete state of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// RNG seed (kept for reset and verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    #[serde(skip)]
    pub rng: DeterministicRng,

    /// Timestamp (ms) of session construction or last reset
    pub started_at: u64,

    /// Timestamp (ms) of the most recent simulated step
    pub last_step_at: u64,

    /// Number of steps simulated so far
    pub step_count: u32,

    /// Terrain grid and objective
    pub arena: Arena,

    /// The player unit
    pub player: Unit,

    /// Hostile units in spawn order (dead ones are retained)
    pub hostiles: Vec<Unit>,

    /// Live projectiles in fire order
    pub projectiles: Vec<Projectile>,

    /// Next unit id (monotonic counter, never reused)
    pub next_unit_id: u32,

    /// Hostiles spawned so far
    pub spawned_count: u32,

    /// Hostiles destroyed so far
    pub destroyed_count: u32,

    /// Next spawn attempt not before this timestamp (ms)
    pub next_spawn_at: u64,

    /// Player lives remaining
    pub lives: u32,

    /// Lives the session started with (restored on reset)
    pub starting_lives: u32,

    /// Initial player protection window, re-granted on reset (ms)
    pub starting_protect_ms: u64,

    /// Session reached a terminal state
    pub over: bool,

    /// Terminal state was a win
    pub victory: bool,

    /// Events generated this step (drained each step)
    #[serde(skip)]
    pub pending_events: Vec<SimEvent>,
}

impl SessionState {
    /// Create a new session.
    ///
    /// The player takes the first unit id; hostiles take the rest as
    /// they spawn. The first spawn attempt is due immediately, and the
    /// player starts protected for `protect_ms`.
    pub fn new(rng_seed: u64, now: u64, lives: u32, protect_ms: u64) -> Self {
        let mut state = Self {
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            started_at: now,
            last_step_at: now,
            step_count: 0,
            arena: Arena::new(),
            player: Unit::player(UnitId::new(0), PLAYER_SPAWN),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            next_unit_id: 0,
            spawned_count: 0,
            destroyed_count: 0,
            next_spawn_at: 0,
            lives,
            starting_lives: lives,
            starting_protect_ms: protect_ms,
            over: false,
            victory: false,
            pending_events: Vec::new(),
        };
        let player_id = state.take_unit_id();
        state.player.id = player_id;
        state.player.protected_until = now + protect_ms;
        state
    }

    /// Allocate the next unit id.
    pub fn take_unit_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    /// Rebuild the session from its seed.
    ///
    /// Everything restarts: fresh RNG from the stored seed, unit ids from
    /// zero, full terrain, schedules re-anchored to `now`.
    pub fn reset(&mut self, now: u64) {
        *self = Self::new(self.rng_seed, now, self.starting_lives, self.starting_protect_ms);
    }

    /// True when a unit owns a live projectile.
    pub fn owner_has_live_projectile(&self, owner: UnitId) -> bool {
        self.projectiles.iter().any(|p| p.owner == owner)
    }

    /// Number of hostiles currently alive.
    pub fn live_hostile_count(&self) -> u32 {
        self.hostiles.iter().filter(|h| h.alive).count() as u32
    }

    /// Apply one hit to the player.
    ///
    /// Decrements lives; a surviving player respawns protected at the
    /// fixed spawn point, a player at zero lives dies in place.
    pub fn damage_player(&mut self, now: u64, protect_ms: u64) {
        self.lives = self.lives.saturating_sub(1);
        self.push_event(SimEvent::new(
            now,
            SimEventData::PlayerDamaged {
                lives_left: self.lives,
            },
        ));

        if self.lives == 0 {
            self.player.alive = false;
        } else {
            self.player.respawn(PLAYER_SPAWN, now, protect_ms);
            self.push_event(SimEvent::new(
                now,
                SimEventData::PlayerRespawned { at: PLAYER_SPAWN },
            ));
        }
    }

    /// Compute hash of current state for verification.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.step_count, self.rng_seed, |hasher| {
            hasher.update_u64(self.started_at);
            hasher.update_u64(self.last_step_at);

            self.player.hash_into(hasher);

            hasher.update_u32(self.hostiles.len() as u32);
            for hostile in &self.hostiles {
                hostile.hash_into(hasher);
            }

            hasher.update_u32(self.projectiles.len() as u32);
            for projectile in &self.projectiles {
                projectile.hash_into(hasher);
            }

            // Layout is fixed per session, so the alive flags carry all
            // mutable terrain state
            hasher.update_u32(self.arena.tiles.len() as u32);
            for tile in &self.arena.tiles {
                hasher.update_bool(tile.alive);
            }
            hasher.update_bool(self.arena.objective.alive);

            hasher.update_u32(self.next_unit_id);
            hasher.update_u32(self.spawned_count);
            hasher.update_u32(self.destroyed_count);
            hasher.update_u64(self.next_spawn_at);
            hasher.update_u32(self.lives);
            hasher.update_bool(self.over);
            hasher.update_bool(self.victory);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a simulation event.
    pub fn push_event(&mut self, event: SimEvent) {
        self.pending_events.push(event);
    }

    /// Presentation snapshot of the session.
    pub fn hud_snapshot(&self, wave_total: u32) -> HudSnapshot {
        HudSnapshot {
            lives: self.lives,
            destroyed: self.destroyed_count,
            remaining: wave_total.saturating_sub(self.destroyed_count),
            over: self.over,
            victory: self.victory,
        }
    }
}

/// Read-only HUD view of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Player lives remaining
    pub lives: u32,
    /// Hostiles destroyed so far
    pub destroyed: u32,
    /// Hostiles left to destroy for the win
    pub remaining: u32,
    /// Session is over
    pub over: bool,
    /// Session ended in a win
    pub victory: bool,
}

// =============================================================================
// TESTS
// =============================================================================
