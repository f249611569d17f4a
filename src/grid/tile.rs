//! Tile classification.
//!
//! A [`TileKind`] is the immutable half of a cell: what the tile *is*,
//! as opposed to the runtime state it is currently in. The catalog is
//! closed; cell hooks dispatch on it by `match`, so adding a kind means
//! visiting every hook that cares.

use serde::{Deserialize, Serialize};

/// What a tile is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Plain walkable ground.
    Floor,
    /// Impassable. Passability writes are refused.
    Wall,
    /// Walkable wire. Carries charge; lethal to stand on while charged.
    Conductor,
    /// Always-charged generator. Impassable.
    Source,
    /// Walkable pressure plate. Emits charge while anything stands on it.
    Plate,
    /// Walkable spike trap. Kills the enemy that steps on it.
    Trap,
}

impl TileKind {
    /// Whether this kind participates in charge conduction.
    #[must_use]
    pub const fn is_conductor(self) -> bool {
        matches!(self, TileKind::Conductor | TileKind::Source | TileKind::Plate)
    }

    /// The passability a fresh cell of this kind starts with.
    #[must_use]
    pub const fn default_passable(self) -> bool {
        !matches!(self, TileKind::Wall | TileKind::Source)
    }

    /// The graphics variant a fresh cell of this kind starts with.
    ///
    /// Variants are renderer-facing texture indices. Every kind starts at
    /// its base variant; renderers reassign per cell for visual variety.
    #[must_use]
    pub const fn default_graphics_variant(self) -> u8 {
        0
    }

    /// Human-readable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileKind::Floor => "floor",
            TileKind::Wall => "wall",
            TileKind::Conductor => "conductor",
            TileKind::Source => "source",
            TileKind::Plate => "plate",
            TileKind::Trap => "trap",
        }
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
