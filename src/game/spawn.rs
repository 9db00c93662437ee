//! Hostile Spawn Controller
//!
//! Rate- and capacity-limited introduction of hostiles at the three entry
//! points along the top edge. At most one hostile enters per step.

use crate::core::fixed::UNIT_SIZE;
use crate::core::rect::FixedRect;
use crate::game::arena::SPAWN_POINTS;
use crate::game::state::SessionState;
use crate::game::unit::Unit;
use crate::game::events::{SimEvent, SimEventData};
use crate::game::tick::SimConfig;

/// Attempt to introduce one hostile.
///
/// Gates, in order: the wave cap (total ever spawned), the concurrency cap
/// (currently alive), and the spawn schedule. Past the gates, the three
/// entry points are tried in a shuffled order; a point is usable when a
/// unit box there clears solid terrain, the live player, and every living
/// hostile. Success schedules the next spawn a full interval out; total
/// contention schedules a short retry instead, so a crowded top row never
/// stalls the wave for a whole interval.
pub fn try_spawn(state: &mut SessionState, now: u64, config: &SimConfig) {
    if state.spawned_count >= config.wave_total {
        return;
    }
    if state.live_hostile_count() >= config.max_live_hostiles {
        return;
    }
    if now < state.next_spawn_at {
        return;
    }

    let mut order = [0usize, 1, 2];
    state.rng.shuffle(&mut order);

    for &slot in &order {
        let at = SPAWN_POINTS[slot];
        let candidate = FixedRect::square(at, UNIT_SIZE);

        if state.arena.is_blocked(candidate) {
            continue;
        }
        if state.player.alive && state.player.rect().intersects(candidate) {
            continue;
        }
        if state
            .hostiles
            .iter()
            .any(|h| h.alive && h.rect().intersects(candidate))
        {
            continue;
        }

        let id = state.take_unit_id();
        let mut unit = Unit::hostile(id, at);
        unit.protected_until = now + config.spawn_protect_ms;
        state.hostiles.push(unit);
        state.spawned_count += 1;
        state.next_spawn_at = now + config.spawn_interval_ms;
        state.push_event(SimEvent::new(now, SimEventData::HostileSpawned { id, at }));
        return;
    }

    // Every entry point blocked: retry soon instead of a full interval
    state.next_spawn_at = now + config.retry_delay_ms;
}

// =============================================================================
// TESTS
// =============================================================================
