//! Cell storage.
//!
//! The grid owns every cell exclusively, keyed by coordinate. Coordinates
//! with no entry are holes: levels are not required to be rectangles, or
//! even connected.
//!
//! Iteration order is the insertion order of the cells and never changes
//! afterwards, so every whole-grid pass the engine makes is deterministic
//! across runs. Scans are O(number of cells); grids are small.

use rustc_hash::FxHashMap;

use crate::core::Coordinate;

use super::cell::Cell;

/// Owns the cells of one level.
///
/// ## Usage
///
/// ```
/// use voltgrid::core::Coordinate;
/// use voltgrid::grid::{Cell, Grid, TileKind};
///
/// let mut grid = Grid::new();
/// grid.insert(Coordinate::new(0, 0), Cell::new(TileKind::Floor));
/// grid.insert(Coordinate::new(1, 0), Cell::new(TileKind::Wall));
///
/// assert_eq!(grid.len(), 2);
/// assert!(grid.get(Coordinate::new(0, 0)).unwrap().is_passable());
/// assert!(grid.get(Coordinate::new(5, 5)).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    cells: FxHashMap<Coordinate, Cell>,
    order: Vec<Coordinate>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell.
    ///
    /// Panics if the coordinate already holds a cell; the level builder
    /// is the validated construction path and checks first.
    pub fn insert(&mut self, at: Coordinate, cell: Cell) {
        if self.cells.insert(at, cell).is_some() {
            panic!("coordinate {at} already holds a cell");
        }
        self.order.push(at);
    }

    /// Look up the cell at a coordinate.
    #[must_use]
    pub fn get(&self, at: Coordinate) -> Option<&Cell> {
        self.cells.get(&at)
    }

    /// Mutable lookup.
    #[must_use]
    pub fn get_mut(&mut self, at: Coordinate) -> Option<&mut Cell> {
        self.cells.get_mut(&at)
    }

    /// Whether a cell exists at this coordinate.
    #[must_use]
    pub fn contains(&self, at: Coordinate) -> bool {
        self.cells.contains_key(&at)
    }

    /// Iterate cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        self.order.iter().map(|&at| (at, &self.cells[&at]))
    }

    /// Iterate cells mutably. Order is unspecified; use this for writes
    /// that are independent per cell, like the highlight sweeps.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Coordinate, &mut Cell)> {
        self.cells.iter_mut().map(|(&at, cell)| (at, cell))
    }

    /// Iterate coordinates in insertion order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.order.iter().copied()
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
