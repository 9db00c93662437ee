//! Redoubt Headless Demo
//!
//! Drives a scripted session through the simulation core, prints a JSON
//! snapshot of the outcome, and verifies determinism by replaying the
//! recorded intents and comparing state hashes.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use redoubt::{
    STEP_INTERVAL_MS, VERSION,
    game::{
        events::SimEventData,
        input::{IntentFrame, IntentRecording},
        state::SessionState,
        tick::{replay, step, SimConfig},
        unit::Direction,
    },
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Redoubt Simulation Core v{}", VERSION);
    info!("Step cadence: {} ms", STEP_INTERVAL_MS);

    demo_session()
}

/// Intent script for one step: sweep left and right along the bottom lane
/// while holding fire.
fn scripted_frame(t: u64) -> IntentFrame {
    let mut frame = IntentFrame::new();
    match (t / 120) % 4 {
        0 => frame.set_move(Direction::Left, true),
        1 => frame.set_move(Direction::Up, true),
        2 => frame.set_move(Direction::Right, true),
        _ => frame.set_move(Direction::Down, true),
    }
    if t % 3 != 0 {
        frame.set_fire(true);
    }
    frame
}

/// Run a scripted session and verify it replays to the same hash.
fn demo_session() -> anyhow::Result<()> {
    let config = SimConfig::default();
    config.validate().context("invalid simulation config")?;

    let rng_seed = 12345u64;
    let total_steps = 7500u64; // two minutes at 16 ms
    info!("=== Starting Demo Session ===");
    info!("RNG Seed: {}", rng_seed);

    let mut state = SessionState::new(rng_seed, 0, config.player_lives, config.respawn_protect_ms);
    let mut recording = IntentRecording::new(rng_seed, 0, STEP_INTERVAL_MS);
    let mut total_events = 0usize;

    for t in 1..=total_steps {
        let now = t * STEP_INTERVAL_MS;
        let frame = scripted_frame(t);
        recording.record(now, frame);

        let result = step(&mut state, frame, now, &config);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                SimEventData::HostileSpawned { id, .. } => {
                    info!("hostile {:?} entered at {} ms", id, event.at_ms);
                }
                SimEventData::HostileDestroyed { destroyed_total, .. } => {
                    info!("hostile destroyed ({} total)", destroyed_total);
                }
                SimEventData::PlayerDamaged { lives_left } => {
                    warn!("player hit, {} lives left", lives_left);
                }
                SimEventData::ObjectiveDestroyed => {
                    warn!("objective destroyed");
                }
                SimEventData::SessionEnded { victory, duration_ms } => {
                    info!("session ended: victory={} after {} ms", victory, duration_ms);
                }
                _ => {}
            }
        }

        if result.over {
            break;
        }
    }

    info!("=== Session Results ===");
    let hud = state.hud_snapshot(config.wave_total);
    println!(
        "{}",
        serde_json::to_string(&hud).context("failed to serialize HUD snapshot")?
    );

    let live_hash = state.state_hash();
    info!("Steps simulated: {}", state.step_count);
    info!("Total events: {}", total_events);
    info!("Final state hash: {}", hex::encode(live_hash));

    // Verify determinism by replaying the recorded intents
    info!("=== Verifying Determinism ===");
    info!("Recording: {} delta entries", recording.delta_count());
    let (replayed, _) = replay(&recording, &config);
    let replay_hash = replayed.state_hash();
    info!("Replay state hash: {}", hex::encode(replay_hash));

    if live_hash != replay_hash {
        bail!("determinism failure: replay hash differs from live hash");
    }
    info!("determinism verified: hashes match");
    Ok(())
}
