//! Core value types: coordinates, the player piece, enemy units.
//!
//! Everything here is plain data. Rules about when these values may
//! change live in the `engine` module.

pub mod coord;
pub mod enemy;
pub mod player;

pub use coord::{Coordinate, KNIGHT_MOVES};
pub use enemy::{Enemy, EnemyId, EnemyKind, EnemyManager};
pub use player::Player;
