//! Q16.16 Fixed-Point Arithmetic
//!
//! This module provides deterministic fixed-point math for the simulation.
//! All operations use integer arithmetic only - no floats in gameplay logic.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 units                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Q16.16?
//!
//! - 32k unit range easily covers an 832x640 pixel arena
//! - Sub-pixel precision for fractional per-step speeds (2.2, 1.45)
//! - Fast integer ops on all platforms
//! - Identical results on x86, ARM, WASM

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

// =============================================================================
// ARENA CONSTANTS (All as integer literals - NO float conversion!)
// =============================================================================

/// Terrain grid width in cells
pub const GRID_COLS: i32 = 26;

/// Terrain grid height in cells
pub const GRID_ROWS: i32 = 20;

/// Cell edge length: 32.0 = 32 * 65536
pub const TILE_SIZE: Fixed = 2097152;

/// Arena width: 832.0 = 26 cells * 32
pub const ARENA_WIDTH: Fixed = 54525952;

/// Arena height: 640.0 = 20 cells * 32
pub const ARENA_HEIGHT: Fixed = 41943040;

/// Unit bounding box edge: 28.0 = 28 * 65536
pub const UNIT_SIZE: Fixed = 1835008;

/// Projectile bounding box edge: 8.0 = 8 * 65536
pub const PROJECTILE_SIZE: Fixed = 524288;

/// Player movement per step: 2.2 * 65536 (floor)
pub const PLAYER_SPEED: Fixed = 144179;

/// Hostile movement per step: 1.45 * 65536 (floor)
pub const HOSTILE_SPEED: Fixed = 95027;

/// Projectile movement per step: 6.0 = 6 * 65536
pub const PROJECTILE_SPEED: Fixed = 393216;

/// Muzzle distance from unit center along facing: 14.0 = 14 * 65536
pub const MUZZLE_OFFSET: Fixed = 917504;

// =============================================================================
// CORE OPERATIONS (All deterministic, wrapping semantics)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in the step loop.
///
/// # Example
/// ```
/// use redoubt::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in simulation logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Absolute value of a fixed-point number.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

// =============================================================================
// TESTS
// =============================================================================
