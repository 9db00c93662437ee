//! Intent Capture and Recording
//!
//! Player intents with deterministic normalization. Held movement keys
//! collapse to at most one direction per step through a fixed priority
//! order, so any combination of pressed keys is unambiguous.

use serde::{Serialize, Deserialize};
use crate::game::unit::Direction;

// =============================================================================
// INTENT TYPES
// =============================================================================

/// Player intent state for a single step.
///
/// This is the minimal input that affects session state.
/// NO timestamp field - timestamps are stored separately for compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct IntentFrame {
    /// Packed intent bits, see the FLAG_* constants.
    pub flags: u8,
}

impl IntentFrame {
    /// Size in bytes
    pub const SIZE: usize = 1;

    /// Move-up held
    pub const FLAG_MOVE_UP: u8 = 0x01;

    /// Move-down held
    pub const FLAG_MOVE_DOWN: u8 = 0x02;

    /// Move-left held
    pub const FLAG_MOVE_LEFT: u8 = 0x04;

    /// Move-right held
    pub const FLAG_MOVE_RIGHT: u8 = 0x08;

    /// Fire requested this step
    pub const FLAG_FIRE: u8 = 0x10;

    /// Session reset requested this step
    pub const FLAG_RESET: u8 = 0x20;

    /// Session quit requested this step
    pub const FLAG_QUIT: u8 = 0x40;

    /// Create a new empty intent frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame holding one movement direction.
    pub const fn with_move(direction: Direction) -> Self {
        Self {
            flags: match direction {
                Direction::Up => Self::FLAG_MOVE_UP,
                Direction::Down => Self::FLAG_MOVE_DOWN,
                Direction::Left => Self::FLAG_MOVE_LEFT,
                Direction::Right => Self::FLAG_MOVE_RIGHT,
            },
        }
    }

    /// Resolve held movement bits to at most one direction.
    ///
    /// Priority order: up, down, left, right. The highest-priority held
    /// bit wins; all others are ignored for the step.
    #[inline]
    pub fn move_direction(&self) -> Option<Direction> {
        if self.flags & Self::FLAG_MOVE_UP != 0 {
            Some(Direction::Up)
        } else if self.flags & Self::FLAG_MOVE_DOWN != 0 {
            Some(Direction::Down)
        } else if self.flags & Self::FLAG_MOVE_LEFT != 0 {
            Some(Direction::Left)
        } else if self.flags & Self::FLAG_MOVE_RIGHT != 0 {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Check if fire was requested this step.
    #[inline]
    pub fn fire_pressed(&self) -> bool {
        self.flags & Self::FLAG_FIRE != 0
    }

    /// Check if a session reset was requested this step.
    #[inline]
    pub fn reset_requested(&self) -> bool {
        self.flags & Self::FLAG_RESET != 0
    }

    /// Check if a session quit was requested this step.
    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.flags & Self::FLAG_QUIT != 0
    }

    /// Check if this is an idle frame (no intent).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Set or clear one held movement direction.
    #[inline]
    pub fn set_move(&mut self, direction: Direction, held: bool) {
        let bit = Self::with_move(direction).flags;
        if held {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }

    /// Set fire flag.
    #[inline]
    pub fn set_fire(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_FIRE;
        } else {
            self.flags &= !Self::FLAG_FIRE;
        }
    }

    /// Set reset flag.
    #[inline]
    pub fn set_reset(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_RESET;
        } else {
            self.flags &= !Self::FLAG_RESET;
        }
    }

    /// Set quit flag.
    #[inline]
    pub fn set_quit(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_QUIT;
        } else {
            self.flags &= !Self::FLAG_QUIT;
        }
    }
}

/// Delta-compressed intent entry.
///
/// Only stored when the intent frame CHANGES (not every step).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct IntentDelta {
    /// Timestamp (ms) when this intent state began
    pub at_ms: u64,
    /// The new intent state
    pub frame: IntentFrame,
}

impl IntentDelta {
    /// Create new delta entry.
    pub fn new(at_ms: u64, frame: IntentFrame) -> Self {
        Self { at_ms, frame }
    }
}

// =============================================================================
// INTENT RECORDING
// =============================================================================

/// Complete intent recording for one session.
///
/// Used for:
/// - Replay playback
/// - Determinism verification
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentRecording {
    /// RNG seed used for this session
    pub rng_seed: u64,

    /// Timestamp of the first step (ms)
    pub start_ms: u64,

    /// Timestamp of the last step (ms)
    pub end_ms: u64,

    /// Interval between recorded steps (ms)
    pub step_ms: u64,

    /// Delta-compressed intent data.
    /// Only stores timestamps where the frame CHANGED.
    deltas: Vec<IntentDelta>,

    /// Last recorded frame (for delta comparison)
    #[serde(skip)]
    last_frame: IntentFrame,
}

impl IntentRecording {
    /// Create a new recording for a session stepped every `step_ms`.
    pub fn new(rng_seed: u64, start_ms: u64, step_ms: u64) -> Self {
        Self {
            rng_seed,
            start_ms,
            end_ms: start_ms,
            step_ms,
            deltas: Vec::with_capacity(256),
            last_frame: IntentFrame::new(),
        }
    }

    /// Record the intent frame passed to a step.
    ///
    /// Only stores if the frame changed from the previous step.
    pub fn record(&mut self, now_ms: u64, frame: IntentFrame) {
        self.end_ms = now_ms;

        if frame != self.last_frame {
            self.deltas.push(IntentDelta::new(now_ms, frame));
            self.last_frame = frame;
        }
    }

    /// Get the intent frame in effect at a specific timestamp.
    ///
    /// Uses binary search for efficiency.
    pub fn frame_at(&self, now_ms: u64) -> IntentFrame {
        if self.deltas.is_empty() {
            return IntentFrame::new();
        }

        let idx = self.deltas.partition_point(|d| d.at_ms <= now_ms);

        if idx == 0 {
            // Before first delta - idle
            IntentFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Get all deltas (for serialization).
    pub fn deltas(&self) -> &[IntentDelta] {
        &self.deltas
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Create iterator over the step timeline for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_ms: self.start_ms,
            delta_idx: 0,
            current_frame: IntentFrame::new(),
            done: false,
        }
    }
}

/// Iterator replaying `(timestamp, frame)` pairs step-by-step.
pub struct ReplayIterator<'a> {
    recording: &'a IntentRecording,
    current_ms: u64,
    delta_idx: usize,
    current_frame: IntentFrame,
    done: bool,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u64, IntentFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current_ms > self.recording.end_ms {
            return None;
        }

        // Apply any deltas that started at or before this step
        while self.delta_idx < self.recording.deltas.len() {
            let delta = &self.recording.deltas[self.delta_idx];
            if delta.at_ms <= self.current_ms {
                self.current_frame = delta.frame;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let result = (self.current_ms, self.current_frame);
        match self.current_ms.checked_add(self.recording.step_ms.max(1)) {
            Some(next) => self.current_ms = next,
            None => self.done = true,
        }
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
