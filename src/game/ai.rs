//! Hostile Decision Policy
//!
//! Reactive per-step heuristics, no pathfinding. Each living hostile rolls
//! a timed random turn, then a chance to snap its facing toward the player,
//! then moves along its facing, then checks its fire schedule. A hostile
//! that already owns a live projectile skips the decisions entirely and
//! only keeps moving along its current facing.

use crate::core::fixed::fixed_abs;
use crate::core::rect::{FixedRect, FixedVec2};
use crate::game::projectile::Projectile;
use crate::game::state::SessionState;
use crate::game::unit::Direction;
use crate::game::tick::SimConfig;

/// Run the decision policy for every living hostile, in spawn order.
///
/// Obstacle boxes are re-collected per mover, so a hostile that moved
/// earlier in the pass blocks later movers at its new position.
pub fn drive_hostiles(state: &mut SessionState, now: u64, config: &SimConfig) {
    let mut fired: Vec<Projectile> = Vec::new();

    for i in 0..state.hostiles.len() {
        if !state.hostiles[i].alive {
            continue;
        }

        let id = state.hostiles[i].id;
        let suppressed =
            config.single_projectile_per_owner && state.owner_has_live_projectile(id);

        if !suppressed {
            // Timed random turn
            if now >= state.hostiles[i].next_turn_at {
                let dir = Direction::ALL[state.rng.next_int(4) as usize];
                let (lo, hi) = config.hostile_turn_delay_ms;
                let delay = state.rng.next_range_u64(lo, hi);
                let hostile = &mut state.hostiles[i];
                hostile.facing = dir;
                hostile.next_turn_at = now + delay;
            }

            // Aim roll, after the turn so a same-step aim wins
            if state.player.alive && state.rng.next_bool(config.aim_chance) {
                let target = state.player.rect().center();
                let from = state.hostiles[i].rect().center();
                state.hostiles[i].facing = aim_toward(from, target);
            }
        }

        // Move along the current facing
        let mut obstacles: Vec<FixedRect> = Vec::with_capacity(state.hostiles.len());
        for (j, other) in state.hostiles.iter().enumerate() {
            if j != i && other.alive {
                obstacles.push(other.rect());
            }
        }
        if state.player.alive {
            obstacles.push(state.player.rect());
        }

        let facing = state.hostiles[i].facing;
        let (arena, hostiles) = (&state.arena, &mut state.hostiles);
        hostiles[i].attempt_move(facing, arena, &obstacles);

        // Fire schedule
        if !suppressed && now >= state.hostiles[i].next_fire_at {
            let (lo, hi) = config.hostile_fire_delay_ms;
            let delay = state.rng.next_range_u64(lo, hi);
            let hostile = &mut state.hostiles[i];
            hostile.next_fire_at = now + delay;
            if let Some(projectile) = hostile.fire(now, 0) {
                fired.push(projectile);
            }
        }
    }

    state.projectiles.extend(fired);
}

/// Facing along the axis of largest displacement toward `to`.
///
/// Ties go vertical.
fn aim_toward(from: FixedVec2, to: FixedVec2) -> Direction {
    let dx = to.x.wrapping_sub(from.x);
    let dy = to.y.wrapping_sub(from.y);

    if fixed_abs(dx) > fixed_abs(dy) {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{to_fixed, HOSTILE_SPEED};
    use crate::game::unit::Unit;

    fn test_state() -> (SessionState, SimConfig) {
        (SessionState::new(42, 1000, 3, 0), SimConfig::default())
    }

    fn push_hostile(state: &mut SessionState, x: f64, y: f64) -> usize {
        let id = state.take_unit_id();
        state
            .hostiles
            .push(Unit::hostile(id, FixedVec2::new(to_fixed(x), to_fixed(y))));
        state.hostiles.len() - 1
    }

    #[test]
    fn test_aim_toward_axes() {
        let from = FixedVec2::from_ints(100, 100);

        assert_eq!(aim_toward(from, FixedVec2::from_ints(200, 120)), Direction::Right);
        assert_eq!(aim_toward(from, FixedVec2::from_ints(10, 120)), Direction::Left);
        assert_eq!(aim_toward(from, FixedVec2::from_ints(120, 300)), Direction::Down);
        assert_eq!(aim_toward(from, FixedVec2::from_ints(120, 10)), Direction::Up);

        // Equal displacement resolves vertically
        assert_eq!(aim_toward(from, FixedVec2::from_ints(150, 150)), Direction::Down);
        assert_eq!(aim_toward(from, from), Direction::Up);
    }

    #[test]
    fn test_first_step_schedules_timers() {
        let (mut state, config) = test_state();
        let i = push_hostile(&mut state, 100.0, 100.0);

        drive_hostiles(&mut state, 2000, &config);

        let (turn_lo, turn_hi) = config.hostile_turn_delay_ms;
        let (fire_lo, fire_hi) = config.hostile_fire_delay_ms;
        let hostile = &state.hostiles[i];
        assert!((2000 + turn_lo..=2000 + turn_hi).contains(&hostile.next_turn_at));
        assert!((2000 + fire_lo..=2000 + fire_hi).contains(&hostile.next_fire_at));
        // The first fire check also shoots
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].owner, hostile.id);
    }

    #[test]
    fn test_turn_not_redecided_before_timer() {
        let (mut state, config) = test_state();
        let i = push_hostile(&mut state, 100.0, 100.0);

        drive_hostiles(&mut state, 2000, &config);
        let facing = state.hostiles[i].facing;
        let next_turn = state.hostiles[i].next_turn_at;

        // Clear the projectile so the policy is not suppressed, then step
        // again before the timer elapses with the aim roll disabled
        state.projectiles.clear();
        let mut quiet = config.clone();
        quiet.aim_chance = 0;
        drive_hostiles(&mut state, next_turn - 1, &quiet);

        assert_eq!(state.hostiles[i].facing, facing);
        assert_eq!(state.hostiles[i].next_turn_at, next_turn);
    }

    #[test]
    fn test_suppressed_hostile_keeps_moving_only() {
        let (mut state, mut config) = test_state();
        config.aim_chance = 0;
        let i = push_hostile(&mut state, 100.0, 100.0);
        state.hostiles[i].facing = Direction::Right;
        state.hostiles[i].next_turn_at = 0;
        state.hostiles[i].next_fire_at = 0;

        // A live projectile of its own suppresses decisions
        let projectile = state.hostiles[i].fire(1500, 0).unwrap();
        state.projectiles.push(projectile);
        let before = state.hostiles[i].pos;

        drive_hostiles(&mut state, 2000, &config);

        let hostile = &state.hostiles[i];
        assert_eq!(hostile.facing, Direction::Right);
        assert_eq!(hostile.pos.x, before.x + HOSTILE_SPEED);
        assert_eq!(hostile.next_turn_at, 0);
        assert_eq!(hostile.next_fire_at, 0);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_hostiles_block_each_other() {
        let (mut state, mut config) = test_state();
        config.aim_chance = 0;
        let i = push_hostile(&mut state, 100.0, 100.0);
        let j = push_hostile(&mut state, 128.0, 100.0);

        // Freeze both into a head-on deadlock
        for &k in &[i, j] {
            state.hostiles[k].next_turn_at = u64::MAX;
            state.hostiles[k].next_fire_at = u64::MAX;
        }
        state.hostiles[i].facing = Direction::Right;
        state.hostiles[j].facing = Direction::Left;

        drive_hostiles(&mut state, 2000, &config);

        // Flush boxes, neither can advance
        assert_eq!(state.hostiles[i].pos, FixedVec2::new(to_fixed(100.0), to_fixed(100.0)));
        assert_eq!(state.hostiles[j].pos, FixedVec2::new(to_fixed(128.0), to_fixed(100.0)));
    }

    #[test]
    fn test_dead_hostile_is_skipped() {
        let (mut state, config) = test_state();
        let i = push_hostile(&mut state, 100.0, 100.0);
        state.hostiles[i].alive = false;
        let before = state.hostiles[i].clone();

        drive_hostiles(&mut state, 2000, &config);

        assert_eq!(state.hostiles[i].pos, before.pos);
        assert_eq!(state.hostiles[i].next_turn_at, before.next_turn_at);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_drive_determinism() {
        let config = SimConfig::default();
        let mut state1 = SessionState::new(7, 0, 3, 0);
        let mut state2 = SessionState::new(7, 0, 3, 0);
        for state in [&mut state1, &mut state2] {
            push_hostile(state, 100.0, 100.0);
            push_hostile(state, 400.0, 100.0);
            push_hostile(state, 700.0, 100.0);
        }

        for t in 1..=100u64 {
            drive_hostiles(&mut state1, t * 16, &config);
            drive_hostiles(&mut state2, t * 16, &config);
        }

        for (a, b) in state1.hostiles.iter().zip(&state2.hostiles) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.facing, b.facing);
            assert_eq!(a.next_turn_at, b.next_turn_at);
        }
        assert_eq!(state1.projectiles, state2.projectiles);
    }
}
