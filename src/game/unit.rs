//! Unit Model
//!
//! Shared model for the player unit and hostiles: identity, facing,
//! all-or-nothing movement, and projectile firing. Hostile-only decision
//! timers live on the same struct and stay zero for the player.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed, UNIT_SIZE, PROJECTILE_SIZE, PLAYER_SPEED, HOSTILE_SPEED, MUZZLE_OFFSET,
};
use crate::core::rect::{FixedRect, FixedVec2};
use crate::core::hash::StateHasher;
use crate::game::arena::Arena;
use crate::game::projectile::Projectile;

// =============================================================================
// IDENTITY
// =============================================================================

/// Unique unit identifier.
///
/// Session-local monotonic counter; ids are never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create from a raw counter value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// Allegiance of a unit or projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Faction {
    /// The defending player
    Player = 0,
    /// Attacking hostiles
    Hostile = 1,
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Axis-aligned facing and movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward -y
    #[default]
    Up = 0,
    /// Toward +y
    Down = 1,
    /// Toward -x
    Left = 2,
    /// Toward +x
    Right = 3,
}

impl Direction {
    /// All directions, in random-turn roll order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Step offset along this direction scaled by `magnitude`.
    #[inline]
    pub fn offset(self, magnitude: Fixed) -> FixedVec2 {
        match self {
            Direction::Up => FixedVec2::new(0, -magnitude),
            Direction::Down => FixedVec2::new(0, magnitude),
            Direction::Left => FixedVec2::new(-magnitude, 0),
            Direction::Right => FixedVec2::new(magnitude, 0),
        }
    }
}

// =============================================================================
// UNIT
// =============================================================================

/// One combat unit: the player or a hostile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// Unique unit ID
    pub id: UnitId,

    /// Allegiance
    pub faction: Faction,

    /// Top-left corner of the bounding box
    pub pos: FixedVec2,

    /// Movement per step
    pub speed: Fixed,

    /// Current facing; also the firing direction
    pub facing: Direction,

    /// Is this unit still alive?
    pub alive: bool,

    /// Timestamp (ms) of the last shot; gates the player fire cooldown
    pub last_fired_at: u64,

    /// Incoming hits are ignored before this timestamp (ms)
    pub protected_until: u64,

    /// Hostile only: next scheduled random turn (ms)
    pub next_turn_at: u64,

    /// Hostile only: next scheduled shot (ms)
    pub next_fire_at: u64,
}

impl Unit {
    /// Create the player unit at a spawn position.
    pub fn player(id: UnitId, pos: FixedVec2) -> Self {
        Self {
            id,
            faction: Faction::Player,
            pos,
            speed: PLAYER_SPEED,
            facing: Direction::Up,
            alive: true,
            last_fired_at: 0,
            protected_until: 0,
            next_turn_at: 0,
            next_fire_at: 0,
        }
    }

    /// Create a hostile unit at a spawn position.
    ///
    /// Decision timers start at zero, so a fresh hostile turns and
    /// schedules its first shot on its very first step.
    pub fn hostile(id: UnitId, pos: FixedVec2) -> Self {
        Self {
            id,
            faction: Faction::Hostile,
            pos,
            speed: HOSTILE_SPEED,
            facing: Direction::Down,
            alive: true,
            last_fired_at: 0,
            protected_until: 0,
            next_turn_at: 0,
            next_fire_at: 0,
        }
    }

    /// Pixel-space bounding box.
    #[inline]
    pub fn rect(&self) -> FixedRect {
        FixedRect::square(self.pos, UNIT_SIZE)
    }

    /// True when the unit ignores incoming hits at `now`.
    #[inline]
    pub fn invulnerable(&self, now: u64) -> bool {
        now < self.protected_until
    }

    /// Turn toward `direction` and advance one step if nothing blocks.
    ///
    /// A dead unit is a no-op. For a living unit the facing updates even
    /// when the move is blocked. The move itself is all-or-nothing: the
    /// candidate box must stay fully in bounds and clear of solid terrain
    /// and every box in `obstacles`.
    pub fn attempt_move(
        &mut self,
        direction: Direction,
        arena: &Arena,
        obstacles: &[FixedRect],
    ) -> bool {
        if !self.alive {
            return false;
        }
        self.facing = direction;

        let delta = direction.offset(self.speed);
        let candidate = self.rect().offset(delta);

        if !arena.in_bounds(candidate) {
            return false;
        }
        if arena.is_blocked(candidate) {
            return false;
        }
        if obstacles.iter().any(|r| candidate.intersects(*r)) {
            return false;
        }

        self.pos = self.pos.add(delta);
        true
    }

    /// Fire a projectile from the muzzle.
    ///
    /// The player is gated by `cooldown_ms` since the last shot; hostiles
    /// pace their shots through `next_fire_at` schedules and pass through
    /// here ungated.
    pub fn fire(&mut self, now: u64, cooldown_ms: u64) -> Option<Projectile> {
        if self.faction == Faction::Player
            && now.saturating_sub(self.last_fired_at) < cooldown_ms
        {
            return None;
        }
        self.last_fired_at = now;

        let muzzle = self.rect().center().add(self.facing.offset(MUZZLE_OFFSET));
        let half = PROJECTILE_SIZE >> 1;
        let pos = FixedVec2::new(muzzle.x - half, muzzle.y - half);

        Some(Projectile::new(pos, self.facing, self.faction, self.id))
    }

    /// Reposition at `at` facing up, protected until `now + protect_ms`.
    pub fn respawn(&mut self, at: FixedVec2, now: u64, protect_ms: u64) {
        self.pos = at;
        self.facing = Direction::Up;
        self.protected_until = now + protect_ms;
    }

    /// Hash this unit's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_u8(self.faction as u8);
        hasher.update_vec2(self.pos);
        hasher.update_fixed(self.speed);
        hasher.update_u8(self.facing as u8);
        hasher.update_bool(self.alive);
        hasher.update_u64(self.last_fired_at);
        hasher.update_u64(self.protected_until);
        hasher.update_u64(self.next_turn_at);
        hasher.update_u64(self.next_fire_at);
    }
}

// =============================================================================
// TESTS
// =============================================================================
