//! Grid coordinates and the knight-move offset table.
//!
//! Coordinates are signed: levels may extend in any direction and do not
//! need to start at the origin. The engine never assumes a bounding box;
//! a coordinate either has a cell in the grid or it does not.
//!
//! ## Usage
//!
//! ```
//! use voltgrid::core::{Coordinate, KNIGHT_MOVES};
//!
//! let from = Coordinate::new(2, 2);
//! let to = Coordinate::new(3, 4);
//!
//! assert_eq!(to - from, Coordinate::new(1, 2));
//! assert!(to.is_knight_move_from(from));
//! assert_eq!(KNIGHT_MOVES.len(), 8);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A position on the grid.
///
/// Pure value type. Whether a coordinate actually holds a cell is the
/// grid's business, not the coordinate's.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// The eight fixed offsets a knight move can take.
///
/// The table is closed under reflection in both axes: negating x, y, or
/// both always lands on another entry.
pub const KNIGHT_MOVES: [Coordinate; 8] = [
    Coordinate::new(1, 2),
    Coordinate::new(2, 1),
    Coordinate::new(1, -2),
    Coordinate::new(2, -1),
    Coordinate::new(-1, 2),
    Coordinate::new(-2, 1),
    Coordinate::new(-1, -2),
    Coordinate::new(-2, -1),
];

impl Coordinate {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether `self` is exactly one knight move away from `origin`.
    ///
    /// ```
    /// use voltgrid::core::Coordinate;
    ///
    /// let origin = Coordinate::new(0, 0);
    /// assert!(Coordinate::new(2, -1).is_knight_move_from(origin));
    /// assert!(!Coordinate::new(1, 1).is_knight_move_from(origin));
    /// assert!(!origin.is_knight_move_from(origin));
    /// ```
    #[must_use]
    pub fn is_knight_move_from(self, origin: Coordinate) -> bool {
        KNIGHT_MOVES.contains(&(self - origin))
    }

    /// The four orthogonally adjacent coordinates.
    ///
    /// This is the adjacency used by charge conduction. Diagonals do not
    /// conduct.
    #[must_use]
    pub const fn orthogonal_neighbors(self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.x + 1, self.y),
            Coordinate::new(self.x - 1, self.y),
            Coordinate::new(self.x, self.y + 1),
            Coordinate::new(self.x, self.y - 1),
        ]
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
