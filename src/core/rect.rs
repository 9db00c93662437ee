//! Fixed-Point Rectangle Geometry
//!
//! Deterministic 2D points and axis-aligned boxes for unit, projectile,
//! and tile collision. All operations use fixed-point arithmetic.

use std::fmt;
use serde::{Serialize, Deserialize};

use super::fixed::{Fixed, FIXED_SCALE, to_float};

/// 2D point or offset with fixed-point components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point)
    pub y: Fixed,
}

impl FixedVec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer components.
    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            y: y << FIXED_SCALE,
        }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
        }
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", to_float(self.x), to_float(self.y))
    }
}

/// Axis-aligned box with fixed-point position and extent.
///
/// Origin is the top-left corner; +x grows right, +y grows down.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedRect {
    /// Left edge (Q16.16 fixed-point)
    pub x: Fixed,
    /// Top edge (Q16.16 fixed-point)
    pub y: Fixed,
    /// Width (Q16.16 fixed-point)
    pub w: Fixed,
    /// Height (Q16.16 fixed-point)
    pub h: Fixed,
}

impl FixedRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed, w: Fixed, h: Fixed) -> Self {
        Self { x, y, w, h }
    }

    /// Create a square box with its top-left corner at `pos`.
    #[inline]
    pub const fn square(pos: FixedVec2, size: Fixed) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            w: size,
            h: size,
        }
    }

    /// Right edge coordinate.
    #[inline]
    pub fn right(self) -> Fixed {
        self.x.wrapping_add(self.w)
    }

    /// Bottom edge coordinate.
    #[inline]
    pub fn bottom(self) -> Fixed {
        self.y.wrapping_add(self.h)
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> FixedVec2 {
        FixedVec2::new(
            self.x.wrapping_add(self.w >> 1),
            self.y.wrapping_add(self.h >> 1),
        )
    }

    /// Translate by an offset.
    #[inline]
    pub fn offset(self, delta: FixedVec2) -> Self {
        Self {
            x: self.x.wrapping_add(delta.x),
            y: self.y.wrapping_add(delta.y),
            w: self.w,
            h: self.h,
        }
    }

    /// True when the two boxes overlap.
    ///
    /// Edges that merely touch do not count as overlap.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True when `other` lies entirely inside this box.
    ///
    /// Flush edges count as inside.
    #[inline]
    pub fn contains_rect(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Debug for FixedRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) {:.0}x{:.0}",
            to_float(self.x),
            to_float(self.y),
            to_float(self.w),
            to_float(self.h)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
