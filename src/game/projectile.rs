//! Projectile Model and Resolution
//!
//! Projectiles advance and resolve one at a time in fire order. Each
//! projectile settles the first matching outcome and is done for the
//! step; a projectile removed by an earlier one no longer advances or
//! resolves.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{PROJECTILE_SIZE, PROJECTILE_SPEED};
use crate::core::rect::{FixedRect, FixedVec2};
use crate::core::hash::StateHasher;
use crate::game::state::SessionState;
use crate::game::unit::{Direction, Faction, UnitId};
use crate::game::events::{SimEvent, SimEventData};
use crate::game::tick::SimConfig;

/// One projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Top-left corner of the bounding box
    pub pos: FixedVec2,

    /// Travel direction (fixed at fire time)
    pub dir: Direction,

    /// Allegiance of the shooter
    pub faction: Faction,

    /// Unit that fired this projectile
    pub owner: UnitId,
}

impl Projectile {
    /// Create a projectile at a muzzle position.
    pub const fn new(pos: FixedVec2, dir: Direction, faction: Faction, owner: UnitId) -> Self {
        Self {
            pos,
            dir,
            faction,
            owner,
        }
    }

    /// Pixel-space bounding box.
    #[inline]
    pub fn rect(&self) -> FixedRect {
        FixedRect::square(self.pos, PROJECTILE_SIZE)
    }

    /// Advance one step along the travel direction.
    #[inline]
    pub fn advance(&mut self) {
        self.pos = self.pos.add(self.dir.offset(PROJECTILE_SPEED));
    }

    /// Hash this projectile's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.pos);
        hasher.update_u8(self.dir as u8);
        hasher.update_u8(self.faction as u8);
        hasher.update_u32(self.owner.0);
    }
}

/// Advance and resolve every live projectile.
///
/// Outcome priority per projectile, first match wins:
///
/// 1. leaves the arena: removed
/// 2. overlaps another live projectile: both removed
/// 3. overlaps the first live solid tile: removed, bricks are destroyed
/// 4. overlaps the live objective: removed, objective destroyed
///    (the shooter's allegiance does not matter)
/// 5. player-owned, overlaps the first live unprotected hostile:
///    removed, hostile destroyed
/// 6. hostile-owned, overlaps the live unprotected player: removed,
///    player takes damage
///
/// Anything else - grass, protected units, own-faction units - is passed
/// through.
pub fn resolve_projectiles(state: &mut SessionState, now: u64, config: &SimConfig) {
    let count = state.projectiles.len();
    let mut removed = vec![false; count];

    for i in 0..count {
        if removed[i] {
            continue;
        }

        state.projectiles[i].advance();
        let rect = state.projectiles[i].rect();

        // 1. Leaves the arena
        if !state.arena.in_bounds(rect) {
            removed[i] = true;
            continue;
        }

        // 2. Mutual projectile annihilation
        let other = (0..count).find(|&j| {
            j != i && !removed[j] && state.projectiles[j].rect().intersects(rect)
        });
        if let Some(j) = other {
            removed[i] = true;
            removed[j] = true;
            let at = state.projectiles[i].pos;
            state.push_event(SimEvent::new(
                now,
                SimEventData::ProjectilesCollided { at },
            ));
            continue;
        }

        // 3. Solid terrain
        if let Some(idx) = state.arena.first_solid_hit(rect) {
            let (col, row) = (state.arena.tiles[idx].col, state.arena.tiles[idx].row);
            if state.arena.damage(idx) {
                state.push_event(SimEvent::new(
                    now,
                    SimEventData::BrickDestroyed { col, row },
                ));
            }
            removed[i] = true;
            continue;
        }

        // 4. The objective, friendly fire included
        if state.arena.objective.alive && rect.intersects(state.arena.objective.rect) {
            state.arena.objective.alive = false;
            removed[i] = true;
            state.push_event(SimEvent::new(now, SimEventData::ObjectiveDestroyed));
            continue;
        }

        // 5. / 6. Cross-faction unit hits
        match state.projectiles[i].faction {
            Faction::Player => {
                let hit = state
                    .hostiles
                    .iter_mut()
                    .find(|h| h.alive && !h.invulnerable(now) && h.rect().intersects(rect));
                if let Some(hostile) = hit {
                    hostile.alive = false;
                    let id = hostile.id;
                    state.destroyed_count += 1;
                    removed[i] = true;
                    let destroyed_total = state.destroyed_count;
                    state.push_event(SimEvent::new(
                        now,
                        SimEventData::HostileDestroyed { id, destroyed_total },
                    ));
                }
            }
            Faction::Hostile => {
                if state.player.alive
                    && !state.player.invulnerable(now)
                    && state.player.rect().intersects(rect)
                {
                    removed[i] = true;
                    state.damage_player(now, config.respawn_protect_ms);
                }
            }
        }
    }

    let mut idx = 0;
    state.projectiles.retain(|_| {
        let keep = !removed[idx];
        idx += 1;
        keep
    });
}

// =============================================================================
// TESTS
// =============================================================================
