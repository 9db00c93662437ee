//! Per-Step Simulation Orchestration
//!
//! The authoritative update loop. One call simulates one discrete step and
//! is the sole mutator of session state; presentation layers read the state
//! afterward and never write it.
//!
//! Phase order within a step is fixed:
//!
//! 1. session-level intents (quit, reset) and terminal short-circuit
//! 2. player fire intent
//! 3. spawn control
//! 4. player movement intent
//! 5. hostile decisions and movement
//! 6. projectile advancement and resolution
//! 7. outcome evaluation

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{Fixed, FIXED_ONE, to_fixed};
use crate::core::rect::FixedRect;
use crate::game::ai::drive_hostiles;
use crate::game::events::{SimEvent, SimEventData};
use crate::game::input::{IntentFrame, IntentRecording};
use crate::game::projectile::resolve_projectiles;
use crate::game::spawn::try_spawn;
use crate::game::state::SessionState;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Invalid simulation configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The wave cap is zero, so no session could ever be won
    #[error("wave total must be at least 1")]
    ZeroWaveTotal,

    /// The concurrency cap is zero, so no hostile could ever spawn
    #[error("concurrency cap must be at least 1")]
    ZeroConcurrencyCap,

    /// The player starts with no lives
    #[error("player lives must be at least 1")]
    ZeroLives,

    /// A millisecond range has its bounds inverted
    #[error("inverted {name} range: {lo}..={hi}")]
    InvertedRange {
        /// Which range is inverted
        name: &'static str,
        /// Lower bound as configured
        lo: u64,
        /// Upper bound as configured
        hi: u64,
    },

    /// The aim probability is not in [0, 1]
    #[error("aim chance must be within [0, 1], got fixed value {value}")]
    AimChanceOutOfRange {
        /// Raw fixed-point value as configured
        value: Fixed,
    },
}

/// Tunable timing and policy constants for one session.
///
/// Geometry and speed constants are compile-time (`core::fixed`); everything
/// millisecond-valued or policy-shaped lives here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Minimum delay between player shots (ms)
    pub player_fire_cooldown_ms: u64,

    /// Hostile shot scheduling range (ms, inclusive both ends)
    pub hostile_fire_delay_ms: (u64, u64),

    /// Hostile random-turn scheduling range (ms, inclusive both ends)
    pub hostile_turn_delay_ms: (u64, u64),

    /// Per-step chance a hostile snaps toward the player ([0, FIXED_ONE])
    pub aim_chance: Fixed,

    /// Delay after a successful spawn (ms)
    pub spawn_interval_ms: u64,

    /// Delay after a fully contended spawn attempt (ms)
    pub retry_delay_ms: u64,

    /// Invulnerability granted to a freshly spawned hostile (ms)
    pub spawn_protect_ms: u64,

    /// Invulnerability granted to the respawning player (ms)
    pub respawn_protect_ms: u64,

    /// Total hostiles ever introduced; destroying this many wins
    pub wave_total: u32,

    /// Maximum hostiles alive at once
    pub max_live_hostiles: u32,

    /// Player lives; 1 gives the single-hit instant-loss variant
    pub player_lives: u32,

    /// Cap every owner to one live projectile; also suppresses hostile
    /// decisions while their projectile is in flight
    pub single_projectile_per_owner: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_fire_cooldown_ms: 340,
            hostile_fire_delay_ms: (900, 1700),
            hostile_turn_delay_ms: (360, 860),
            aim_chance: to_fixed(0.09),
            spawn_interval_ms: 1800,
            retry_delay_ms: 300,
            spawn_protect_ms: 900,
            respawn_protect_ms: 1300,
            wave_total: 20,
            max_live_hostiles: 6,
            player_lives: 3,
            single_projectile_per_owner: true,
        }
    }
}

impl SimConfig {
    /// Reject configurations the simulation cannot meaningfully run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wave_total == 0 {
            return Err(ConfigError::ZeroWaveTotal);
        }
        if self.max_live_hostiles == 0 {
            return Err(ConfigError::ZeroConcurrencyCap);
        }
        if self.player_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        let ranges = [
            ("hostile fire delay", self.hostile_fire_delay_ms),
            ("hostile turn delay", self.hostile_turn_delay_ms),
        ];
        for (name, (lo, hi)) in ranges {
            if lo > hi {
                return Err(ConfigError::InvertedRange { name, lo, hi });
            }
        }
        if self.aim_chance < 0 || self.aim_chance > FIXED_ONE {
            return Err(ConfigError::AimChanceOutOfRange {
                value: self.aim_chance,
            });
        }
        Ok(())
    }
}

// =============================================================================
// STEP
// =============================================================================

/// Result of one step.
#[derive(Debug, Default)]
pub struct StepResult {
    /// Events generated this step
    pub events: Vec<SimEvent>,
    /// Session is in a terminal state
    pub over: bool,
    /// Terminal state is a win
    pub victory: bool,
    /// The host loop was asked to quit
    pub quit: bool,
}

/// Run one simulation step.
///
/// `now` is a monotonic millisecond timestamp supplied by the host. The
/// function is 100% deterministic: given the same seed and the same
/// `(intents, now)` sequence, two sessions stay bit-identical.
///
/// A step against a terminal session only honors reset and quit. A step
/// whose timestamp has not advanced past the previous one and whose
/// intents are all idle leaves the state untouched.
pub fn step(
    state: &mut SessionState,
    intents: IntentFrame,
    now: u64,
    config: &SimConfig,
) -> StepResult {
    let mut result = StepResult::default();

    if intents.quit_requested() {
        result.quit = true;
        result.over = state.over;
        result.victory = state.victory;
        return result;
    }

    if intents.reset_requested() {
        state.reset(now);
        return result;
    }

    if state.over {
        result.over = true;
        result.victory = state.victory;
        return result;
    }

    if now <= state.last_step_at && intents.is_idle() {
        return result;
    }

    state.step_count += 1;
    state.last_step_at = now;

    apply_fire_intent(state, intents, now, config);
    try_spawn(state, now, config);
    apply_move_intent(state, intents);
    drive_hostiles(state, now, config);
    resolve_projectiles(state, now, config);
    evaluate_outcome(state, now, config);

    result.events = state.take_events();
    result.over = state.over;
    result.victory = state.victory;
    result
}

/// Fire on request, gated by the cooldown and the one-live-projectile cap.
fn apply_fire_intent(
    state: &mut SessionState,
    intents: IntentFrame,
    now: u64,
    config: &SimConfig,
) {
    if !intents.fire_pressed() || !state.player.alive {
        return;
    }
    if config.single_projectile_per_owner && state.owner_has_live_projectile(state.player.id) {
        return;
    }
    if let Some(projectile) = state.player.fire(now, config.player_fire_cooldown_ms) {
        state.projectiles.push(projectile);
    }
}

/// Move the player along the one direction the intent frame resolves to.
fn apply_move_intent(state: &mut SessionState, intents: IntentFrame) {
    let Some(direction) = intents.move_direction() else {
        return;
    };
    if !state.player.alive {
        return;
    }

    let obstacles: Vec<FixedRect> = state
        .hostiles
        .iter()
        .filter(|h| h.alive)
        .map(|h| h.rect())
        .collect();

    let (arena, player) = (&state.arena, &mut state.player);
    player.attempt_move(direction, arena, &obstacles);
}

/// Check the terminal transitions, loss before win.
///
/// The win requires the destroyed count to reach the wave cap; hostiles
/// that merely have not spawned yet never count.
fn evaluate_outcome(state: &mut SessionState, now: u64, config: &SimConfig) {
    if state.over {
        return;
    }

    let victory = if !state.arena.objective.alive || !state.player.alive {
        false
    } else if state.destroyed_count >= config.wave_total {
        true
    } else {
        return;
    };

    state.over = true;
    state.victory = victory;
    state.push_event(SimEvent::new(
        now,
        SimEventData::SessionEnded {
            victory,
            duration_ms: now.saturating_sub(state.started_at),
        },
    ));
}

// =============================================================================
// REPLAY
// =============================================================================

/// Re-run a recorded session from its seed and intent timeline.
///
/// Returns the final state and every event generated along the way. The
/// final state hash matching the live session's is the determinism check.
pub fn replay(recording: &IntentRecording, config: &SimConfig) -> (SessionState, Vec<SimEvent>) {
    let mut state = SessionState::new(
        recording.rng_seed,
        recording.start_ms,
        config.player_lives,
        config.respawn_protect_ms,
    );
    let mut all_events = Vec::new();

    for (now, frame) in recording.replay_iter() {
        let result = step(&mut state, frame, now, config);
        all_events.extend(result.events);
        if result.quit {
            break;
        }
    }

    (state, all_events)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::core::fixed::to_fixed;
    use crate::core::rect::FixedVec2;
    use crate::game::arena::PLAYER_SPAWN;
    use crate::game::projectile::Projectile;
    use crate::game::unit::{Direction, Faction, Unit, UnitId};

    const STEP_MS: u64 = 16;

    fn new_session(config: &SimConfig) -> SessionState {
        SessionState::new(42, 1000, config.player_lives, config.respawn_protect_ms)
    }

    fn run_steps(state: &mut SessionState, frame: IntentFrame, config: &SimConfig, count: u64) {
        let base = state.last_step_at;
        for t in 1..=count {
            step(state, frame, base + t * STEP_MS, config);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SimConfig::default().validate().is_ok());

        let mut config = SimConfig::default();
        config.wave_total = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroWaveTotal));

        let mut config = SimConfig::default();
        config.max_live_hostiles = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrencyCap));

        let mut config = SimConfig::default();
        config.player_lives = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLives));

        let mut config = SimConfig::default();
        config.hostile_turn_delay_ms = (900, 300);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));

        let mut config = SimConfig::default();
        config.aim_chance = to_fixed(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AimChanceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_idle_duplicate_timestamp_is_noop() {
        let config = SimConfig::default();
        let mut state = new_session(&config);
        run_steps(&mut state, IntentFrame::new(), &config, 50);
        let hash = state.state_hash();

        let at = state.last_step_at;
        let result = step(&mut state, IntentFrame::new(), at, &config);

        assert!(result.events.is_empty());
        assert_eq!(state.state_hash(), hash);
    }

    #[test]
    fn test_held_move_intent_moves_player() {
        let config = SimConfig::default();
        let mut state = new_session(&config);
        let before = state.player.pos;

        let frame = IntentFrame::with_move(Direction::Left);
        step(&mut state, frame, 1016, &config);

        assert!(state.player.pos.x < before.x);
        assert_eq!(state.player.facing, Direction::Left);
    }

    #[test]
    fn test_live_projectile_caps_player_fire() {
        let config = SimConfig::default();
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;

        let mut frame = IntentFrame::new();
        frame.set_fire(true);
        step(&mut state, frame, 2000, &config);
        assert_eq!(state.projectiles.len(), 1);

        // Held fire does nothing while the first shot is in flight, even
        // past the cooldown
        step(&mut state, frame, 2000 + config.player_fire_cooldown_ms, &config);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_fire_once_per_cooldown_window() {
        let mut config = SimConfig::default();
        config.single_projectile_per_owner = false;
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;

        let mut frame = IntentFrame::new();
        frame.set_fire(true);

        step(&mut state, frame, 2000, &config);
        step(&mut state, frame, 2016, &config);
        assert_eq!(state.projectiles.len(), 1);

        step(&mut state, frame, 2000 + config.player_fire_cooldown_ms, &config);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_spawning_ramps_up_to_concurrency_cap() {
        let config = SimConfig::default();
        let mut state = new_session(&config);

        // 60 seconds of idle stepping
        run_steps(&mut state, IntentFrame::new(), &config, 3750);

        assert!(state.spawned_count > 0);
        assert!(state.live_hostile_count() <= config.max_live_hostiles);
        assert!(state.spawned_count <= config.wave_total);
    }

    #[test]
    fn test_win_requires_destroyed_count_not_absence() {
        let mut config = SimConfig::default();
        config.wave_total = 3;
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;

        // No hostiles alive, none destroyed: not a win
        let result = step(&mut state, IntentFrame::new(), 1016, &config);
        assert!(!result.over);

        state.destroyed_count = 3;
        let result = step(&mut state, IntentFrame::new(), 1032, &config);
        assert!(result.over);
        assert!(result.victory);
        assert!(state.arena.objective.alive);
    }

    #[test]
    fn test_objective_loss_beats_win_check() {
        let mut config = SimConfig::default();
        config.wave_total = 1;
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;
        state.destroyed_count = 1;
        state.arena.objective.alive = false;

        let result = step(&mut state, IntentFrame::new(), 1016, &config);

        assert!(result.over);
        assert!(!result.victory);
    }

    #[test]
    fn test_player_out_of_lives_loses() {
        let config = SimConfig::default();
        let mut state = SessionState::new(42, 1000, 1, 0);
        state.next_spawn_at = u64::MAX;

        let player_rect = state.player.rect();
        state.projectiles.push(Projectile::new(
            FixedVec2::new(player_rect.x, player_rect.y - to_fixed(10.0)),
            Direction::Down,
            Faction::Hostile,
            UnitId::new(9),
        ));

        let result = step(&mut state, IntentFrame::new(), 1016, &config);

        assert!(result.over);
        assert!(!result.victory);
        assert!(!state.player.alive);
        assert_eq!(state.lives, 0);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, SimEventData::SessionEnded { victory: false, .. })));
    }

    #[test]
    fn test_player_protected_at_session_start() {
        let config = SimConfig::default();
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;

        let player_rect = state.player.rect();
        state.projectiles.push(Projectile::new(
            FixedVec2::new(player_rect.x, player_rect.y - to_fixed(10.0)),
            Direction::Down,
            Faction::Hostile,
            UnitId::new(9),
        ));

        let result = step(&mut state, IntentFrame::new(), 1016, &config);

        // The starting protection window swallows the hit
        assert!(!result.over);
        assert!(state.player.alive);
        assert_eq!(state.lives, config.player_lives);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_end_to_end_single_hostile_win() {
        let mut config = SimConfig::default();
        config.wave_total = 1;
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;

        // One hostile in the line of fire, frozen so only the projectile acts
        let id = state.take_unit_id();
        let mut hostile = Unit::hostile(id, FixedVec2::new(to_fixed(100.0), to_fixed(100.0)));
        hostile.next_turn_at = u64::MAX;
        hostile.next_fire_at = u64::MAX;
        state.hostiles.push(hostile);
        state.spawned_count = 1;

        state.projectiles.push(Projectile::new(
            FixedVec2::new(to_fixed(90.0), to_fixed(110.0)),
            Direction::Right,
            Faction::Player,
            state.player.id,
        ));

        let result = step(&mut state, IntentFrame::new(), 1016, &config);

        assert!(!state.hostiles[0].alive);
        assert_eq!(state.destroyed_count, 1);
        assert!(result.over);
        assert!(result.victory);
    }

    #[test]
    fn test_terminal_state_only_honors_reset_and_quit() {
        let mut config = SimConfig::default();
        config.wave_total = 1;
        let mut state = new_session(&config);
        state.next_spawn_at = u64::MAX;
        state.destroyed_count = 1;
        step(&mut state, IntentFrame::new(), 1016, &config);
        assert!(state.over);
        let hash = state.state_hash();

        // Movement and fire are dead intents now
        let mut frame = IntentFrame::with_move(Direction::Left);
        frame.set_fire(true);
        let result = step(&mut state, frame, 2000, &config);
        assert!(result.over);
        assert!(result.victory);
        assert_eq!(state.state_hash(), hash);

        // Reset revives the session
        let mut reset = IntentFrame::new();
        reset.set_reset(true);
        step(&mut state, reset, 3000, &config);
        assert!(!state.over);
        assert_eq!(state.started_at, 3000);
        assert_eq!(state.player.pos, PLAYER_SPAWN);
    }

    #[test]
    fn test_quit_leaves_state_untouched() {
        let config = SimConfig::default();
        let mut state = new_session(&config);
        run_steps(&mut state, IntentFrame::new(), &config, 10);
        let hash = state.state_hash();

        let mut frame = IntentFrame::with_move(Direction::Down);
        frame.set_quit(true);
        let at = state.last_step_at + STEP_MS;
        let result = step(&mut state, frame, at, &config);

        assert!(result.quit);
        assert_eq!(state.state_hash(), hash);
    }

    #[test]
    fn test_twin_session_determinism() {
        let config = SimConfig::default();
        let mut state1 = new_session(&config);
        let mut state2 = new_session(&config);

        let mut frame = IntentFrame::with_move(Direction::Left);
        frame.set_fire(true);

        for t in 1..=600u64 {
            step(&mut state1, frame, 1000 + t * STEP_MS, &config);
            step(&mut state2, frame, 1000 + t * STEP_MS, &config);
        }

        assert_eq!(state1.state_hash(), state2.state_hash());
    }

    #[test]
    fn test_record_replay_hash_equality() {
        let config = SimConfig::default();
        let mut state = SessionState::new(77, 0, config.player_lives, config.respawn_protect_ms);
        let mut recording = IntentRecording::new(77, 0, STEP_MS);

        for t in 1..=600u64 {
            let now = t * STEP_MS;
            let mut frame = IntentFrame::new();
            // A scripted zig-zag with bursts of fire
            match (t / 60) % 4 {
                0 => frame.set_move(Direction::Left, true),
                1 => frame.set_move(Direction::Up, true),
                2 => frame.set_move(Direction::Right, true),
                _ => frame.set_move(Direction::Down, true),
            }
            if t % 20 < 10 {
                frame.set_fire(true);
            }
            recording.record(now, frame);
            step(&mut state, frame, now, &config);
        }

        let (replayed, _) = replay(&recording, &config);
        assert_eq!(state.state_hash(), replayed.state_hash());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_living_units_never_escape_bounds(
            seed in any::<u64>(),
            intents in proptest::collection::vec(0u8..6, 1..250),
        ) {
            let config = SimConfig::default();
            let mut state = SessionState::new(seed, 0, config.player_lives, config.respawn_protect_ms);

            for (t, &code) in intents.iter().enumerate() {
                let mut frame = IntentFrame::new();
                match code {
                    0 => frame.set_move(Direction::Up, true),
                    1 => frame.set_move(Direction::Down, true),
                    2 => frame.set_move(Direction::Left, true),
                    3 => frame.set_move(Direction::Right, true),
                    4 => frame.set_fire(true),
                    _ => {}
                }
                step(&mut state, frame, (t as u64 + 1) * STEP_MS, &config);

                if state.player.alive {
                    prop_assert!(state.arena.in_bounds(state.player.rect()));
                }
                for hostile in state.hostiles.iter().filter(|h| h.alive) {
                    prop_assert!(state.arena.in_bounds(hostile.rect()));
                }
            }
        }
    }
}
