//! Level assembly: validated construction and ASCII map parsing.
//!
//! [`LevelBuilder`] checks placements against each other before any
//! cell is created, so a finished [`Level`] always satisfies the
//! engine's assumptions (player on a passable cell, at most one enemy
//! per square, nobody off the grid). [`Level::parse`] reads the compact
//! text format used by the level files and tests.

use rustc_hash::FxHashSet;

use crate::core::{Coordinate, EnemyKind, EnemyManager, Player};
use crate::engine::TurnEngine;
use crate::grid::{Cell, Grid, TileKind};

/// Why a level failed validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("two tiles share {0}")]
    DuplicateTile(Coordinate),
    #[error("player placed off the grid at {0}")]
    PlayerOffGrid(Coordinate),
    #[error("player placed on an impassable cell at {0}")]
    PlayerBlocked(Coordinate),
    #[error("enemy placed off the grid at {0}")]
    EnemyOffGrid(Coordinate),
    #[error("two enemies share {0}")]
    EnemyCollision(Coordinate),
    #[error("enemy placed on the player's square at {0}")]
    EnemyOnPlayer(Coordinate),
    #[error("no player placement")]
    MissingPlayer,
    #[error("unknown glyph {glyph:?} at {at}")]
    UnknownGlyph { glyph: char, at: Coordinate },
}

/// Accumulates placements, then validates them as a whole.
///
/// Tiles keep their placement order; the grid's sweep order is the
/// order tiles were added (for [`Level::parse`], row-major).
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    tiles: Vec<(Coordinate, TileKind)>,
    player: Option<Coordinate>,
    enemies: Vec<(EnemyKind, Coordinate)>,
}

impl LevelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile.
    #[must_use]
    pub fn with_tile(mut self, at: Coordinate, kind: TileKind) -> Self {
        self.tiles.push((at, kind));
        self
    }

    /// Place the player. A later placement replaces an earlier one.
    #[must_use]
    pub fn with_player(mut self, at: Coordinate) -> Self {
        self.player = Some(at);
        self
    }

    /// Add an enemy.
    #[must_use]
    pub fn with_enemy(mut self, kind: EnemyKind, at: Coordinate) -> Self {
        self.enemies.push((kind, at));
        self
    }

    /// Validate every placement and assemble the level.
    pub fn build(self) -> Result<Level, LevelError> {
        let mut grid = Grid::new();
        let mut seen = FxHashSet::default();
        for (at, kind) in self.tiles {
            if !seen.insert(at) {
                return Err(LevelError::DuplicateTile(at));
            }
            grid.insert(at, Cell::new(kind));
        }

        let player_at = self.player.ok_or(LevelError::MissingPlayer)?;
        match grid.get(player_at) {
            None => return Err(LevelError::PlayerOffGrid(player_at)),
            Some(cell) if !cell.is_passable() => {
                return Err(LevelError::PlayerBlocked(player_at));
            }
            Some(_) => {}
        }

        let mut enemies = EnemyManager::new();
        let mut occupied = FxHashSet::default();
        for (kind, at) in self.enemies {
            if !grid.contains(at) {
                return Err(LevelError::EnemyOffGrid(at));
            }
            if at == player_at {
                return Err(LevelError::EnemyOnPlayer(at));
            }
            if !occupied.insert(at) {
                return Err(LevelError::EnemyCollision(at));
            }
            enemies.spawn(kind, at);
        }

        Ok(Level {
            grid,
            player: Player::new(player_at),
            enemies,
        })
    }
}

/// A validated level, ready to hand to the engine.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub player: Player,
    pub enemies: EnemyManager,
}

impl Level {
    /// Parse the compact text format.
    ///
    /// One line per row; the top line is `y = 0` and `y` grows
    /// downward, the leftmost column is `x = 0`. Glyphs:
    ///
    /// | Glyph | Meaning |
    /// |-------|---------|
    /// | `.` | floor |
    /// | `#` | wall |
    /// | `=` | conductor |
    /// | `*` | source |
    /// | `o` | plate |
    /// | `^` | trap |
    /// | `@` | player on floor |
    /// | `k` | knight on floor |
    /// | `K` | king on floor |
    /// | space or `_` | hole (no cell) |
    ///
    /// ```
    /// use voltgrid::level::Level;
    ///
    /// let level = Level::parse(
    ///     "#===*\n\
    ///      .....\n\
    ///      ..@_k",
    /// )
    /// .unwrap();
    /// assert_eq!(level.grid.len(), 14);
    /// assert_eq!(level.enemies.len(), 1);
    /// ```
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut builder = LevelBuilder::new();
        for (y, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            for (x, glyph) in line.chars().enumerate() {
                let at = Coordinate::new(x as i32, y as i32);
                builder = match glyph {
                    ' ' | '_' => builder,
                    '.' => builder.with_tile(at, TileKind::Floor),
                    '#' => builder.with_tile(at, TileKind::Wall),
                    '=' => builder.with_tile(at, TileKind::Conductor),
                    '*' => builder.with_tile(at, TileKind::Source),
                    'o' => builder.with_tile(at, TileKind::Plate),
                    '^' => builder.with_tile(at, TileKind::Trap),
                    '@' => builder.with_tile(at, TileKind::Floor).with_player(at),
                    'k' => builder
                        .with_tile(at, TileKind::Floor)
                        .with_enemy(EnemyKind::Knight, at),
                    'K' => builder
                        .with_tile(at, TileKind::Floor)
                        .with_enemy(EnemyKind::King, at),
                    _ => return Err(LevelError::UnknownGlyph { glyph, at }),
                };
            }
        }
        builder.build()
    }

    /// Hand everything to a fresh engine.
    #[must_use]
    pub fn into_engine(self) -> TurnEngine {
        TurnEngine::new(self.grid, self.player, self.enemies)
    }
}
