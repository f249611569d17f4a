//! The grid: tile classification, per-cell runtime state, cell storage.

pub mod cell;
pub mod map;
pub mod tile;

pub use cell::{Cell, HookContext, PassabilityWrite};
pub use map::Grid;
pub use tile::TileKind;
