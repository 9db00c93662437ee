//! Arena Terrain Layout
//!
//! Fixed tile layout: steel perimeter, brick lanes, a water channel, grass
//! cover, and the walled objective pocket at the bottom of the arena.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{
    Fixed, TILE_SIZE, ARENA_WIDTH, ARENA_HEIGHT, GRID_COLS, GRID_ROWS, to_fixed,
};
use crate::core::rect::{FixedRect, FixedVec2};

/// Full-arena bounding box.
pub const ARENA_BOUNDS: FixedRect = FixedRect::new(0, 0, ARENA_WIDTH, ARENA_HEIGHT);

/// Hostile entry points along the top edge.
pub const SPAWN_POINTS: [FixedVec2; 3] = [
    FixedVec2::new(to_fixed(64.0), to_fixed(64.0)),
    FixedVec2::new(to_fixed(402.0), to_fixed(64.0)),
    FixedVec2::new(to_fixed(736.0), to_fixed(64.0)),
];

/// Player entry point, centered above the objective pocket.
pub const PLAYER_SPAWN: FixedVec2 = FixedVec2::new(to_fixed(402.0), to_fixed(512.0));

/// Objective box (one tile, not grid-aligned on x).
const OBJECTIVE_RECT: FixedRect =
    FixedRect::new(to_fixed(400.0), to_fixed(576.0), TILE_SIZE, TILE_SIZE);

/// Brick ring cells around the objective, as offsets from its cell.
/// The cell above stays open as the single approach gap.
const OBJECTIVE_RING: [(i32, i32); 5] = [(-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

const BRICK_ROWS: [i32; 4] = [5, 7, 9, 11];
const WATER_COLS: [i32; 4] = [10, 11, 14, 15];
const WATER_ROW: i32 = 10;
const GRASS_COLS: [i32; 4] = [6, 7, 18, 19];
const GRASS_ROWS: [i32; 2] = [8, 12];

/// Terrain material of one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Indestructible wall
    Steel,
    /// Destructible wall
    Brick,
    /// Impassable liquid, indestructible
    Water,
    /// Cover, blocks nothing
    Grass,
}

impl TileKind {
    /// True when this material blocks movement and projectiles while alive.
    #[inline]
    pub fn solid(self) -> bool {
        !matches!(self, TileKind::Grass)
    }

    /// True when projectiles can destroy this material.
    #[inline]
    pub fn destructible(self) -> bool {
        matches!(self, TileKind::Brick)
    }
}

/// One terrain cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Grid column
    pub col: i32,
    /// Grid row
    pub row: i32,
    /// Material
    pub kind: TileKind,
    /// Cleared when a destructible tile is destroyed
    pub alive: bool,
}

impl Tile {
    /// Create a live tile at a grid cell.
    pub const fn new(col: i32, row: i32, kind: TileKind) -> Self {
        Self {
            col,
            row,
            kind,
            alive: true,
        }
    }

    /// Pixel-space bounding box of the cell.
    #[inline]
    pub fn rect(&self) -> FixedRect {
        FixedRect::new(
            self.col.wrapping_mul(TILE_SIZE),
            self.row.wrapping_mul(TILE_SIZE),
            TILE_SIZE,
            TILE_SIZE,
        )
    }
}

/// The defended objective. Its destruction loses the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// Pixel-space bounding box
    pub rect: FixedRect,
    /// Cleared when destroyed
    pub alive: bool,
}

/// Terrain grid and objective for one session.
///
/// Tiles are stored in construction order; projectile resolution uses the
/// first intersecting tile in that order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Arena {
    /// All terrain tiles
    pub tiles: Vec<Tile>,
    /// The defended objective
    pub objective: Objective,
}

impl Arena {
    /// Build the standard arena layout.
    pub fn new() -> Self {
        let objective = Objective {
            rect: OBJECTIVE_RECT,
            alive: true,
        };

        let mut tiles = Vec::with_capacity(160);

        // Steel perimeter
        for col in 0..GRID_COLS {
            tiles.push(Tile::new(col, 0, TileKind::Steel));
            tiles.push(Tile::new(col, GRID_ROWS - 1, TileKind::Steel));
        }
        for row in 1..GRID_ROWS - 1 {
            tiles.push(Tile::new(0, row, TileKind::Steel));
            tiles.push(Tile::new(GRID_COLS - 1, row, TileKind::Steel));
        }

        // Brick lanes: even columns only, leaving odd columns as corridors
        for &row in &BRICK_ROWS {
            for col in 3..GRID_COLS - 3 {
                if col % 2 == 0 {
                    tiles.push(Tile::new(col, row, TileKind::Brick));
                }
            }
        }

        // Water channel
        for &col in &WATER_COLS {
            tiles.push(Tile::new(col, WATER_ROW, TileKind::Water));
        }

        // Grass cover
        for &col in &GRASS_COLS {
            for &row in &GRASS_ROWS {
                tiles.push(Tile::new(col, row, TileKind::Grass));
            }
        }

        // Brick ring shielding the objective
        let obj_col = cell_of(objective.rect.x);
        let obj_row = cell_of(objective.rect.y);
        for &(dc, dr) in &OBJECTIVE_RING {
            tiles.push(Tile::new(obj_col + dc, obj_row + dr, TileKind::Brick));
        }

        Self { tiles, objective }
    }

    /// First live tile at a grid cell, if any.
    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        self.tiles
            .iter()
            .find(|t| t.alive && t.col == col && t.row == row)
    }

    /// True when `rect` lies fully inside the arena.
    #[inline]
    pub fn in_bounds(&self, rect: FixedRect) -> bool {
        ARENA_BOUNDS.contains_rect(rect)
    }

    /// True when `rect` overlaps a live solid tile.
    ///
    /// This is the movement obstacle query. The objective is not a
    /// movement obstacle; units may overlap it freely. Projectiles meet
    /// it in their own resolution slot instead.
    pub fn is_blocked(&self, rect: FixedRect) -> bool {
        self.tiles
            .iter()
            .any(|t| t.alive && t.kind.solid() && t.rect().intersects(rect))
    }

    /// Index of the first live solid tile overlapping `rect`, in
    /// construction order.
    pub fn first_solid_hit(&self, rect: FixedRect) -> Option<usize> {
        self.tiles
            .iter()
            .position(|t| t.alive && t.kind.solid() && t.rect().intersects(rect))
    }

    /// Destroy the tile at `idx` if it is a live destructible brick.
    ///
    /// Returns true when the tile died to this call; steel, water, grass,
    /// and already-dead bricks are left untouched.
    pub fn damage(&mut self, idx: usize) -> bool {
        let tile = &mut self.tiles[idx];
        if tile.alive && tile.kind.destructible() {
            tile.alive = false;
            true
        } else {
            false
        }
    }

    /// Number of live tiles of one material.
    pub fn live_count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.alive && t.kind == kind).count()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a pixel coordinate to its grid cell index.
#[inline]
pub fn cell_of(coord: Fixed) -> i32 {
    coord / TILE_SIZE
}

// =============================================================================
// TESTS
// =============================================================================
