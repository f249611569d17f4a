//! Enemy units and the ordered collection that tracks them.
//!
//! Enemies are owned by the [`EnemyManager`]. Everything else refers to
//! them by [`EnemyId`]; in particular, cells store an `Option<EnemyId>`
//! back-reference rather than any kind of pointer, so a stale reference
//! is always detectable and never dangling.
//!
//! Enemy *behavior* (deciding where to move, whether to capture) lives
//! outside this crate. The manager only records the resulting positions
//! and keeps each enemy's derived capture squares current.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::coord::{Coordinate, KNIGHT_MOVES};

/// The squares a king-like enemy threatens, relative to its position.
const KING_MOVES: [Coordinate; 8] = [
    Coordinate::new(1, 0),
    Coordinate::new(1, 1),
    Coordinate::new(0, 1),
    Coordinate::new(-1, 1),
    Coordinate::new(-1, 0),
    Coordinate::new(-1, -1),
    Coordinate::new(0, -1),
    Coordinate::new(1, -1),
];

/// Unique identifier for an enemy within one session.
///
/// Allocated sequentially by [`EnemyManager::spawn`] and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

impl EnemyId {
    /// Create an enemy ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy({})", self.0)
    }
}

/// What kind of enemy a unit is.
///
/// The kind fixes the unit's threat pattern: the set of offsets, relative
/// to its position, on which it could capture the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Threatens the eight knight-move squares.
    Knight,
    /// Threatens the eight surrounding squares.
    King,
}

impl EnemyKind {
    /// The threat offsets for this kind.
    #[must_use]
    pub fn threat_offsets(self) -> &'static [Coordinate] {
        match self {
            EnemyKind::Knight => &KNIGHT_MOVES,
            EnemyKind::King => &KING_MOVES,
        }
    }

    /// Human-readable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EnemyKind::Knight => "knight",
            EnemyKind::King => "king",
        }
    }
}

impl std::fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One enemy unit.
///
/// `capture_squares` is derived from kind and position. It is cached and
/// refreshed whenever the position or alive flag changes; a dead enemy
/// threatens nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Coordinate,
    alive: bool,
    capture_squares: SmallVec<[Coordinate; 8]>,
}

impl Enemy {
    fn new(id: EnemyId, kind: EnemyKind, position: Coordinate) -> Self {
        let mut enemy = Self {
            id,
            kind,
            position,
            alive: true,
            capture_squares: SmallVec::new(),
        };
        enemy.refresh_capture_squares();
        enemy
    }

    /// This enemy's identifier.
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// This enemy's kind.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Where the enemy currently stands.
    #[must_use]
    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Whether the enemy is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// The squares this enemy currently threatens.
    ///
    /// Empty for dead enemies. The squares are absolute coordinates and
    /// are not filtered against any grid; callers that need on-grid
    /// squares intersect with the grid themselves.
    #[must_use]
    pub fn capture_squares(&self) -> &[Coordinate] {
        &self.capture_squares
    }

    fn refresh_capture_squares(&mut self) {
        self.capture_squares.clear();
        if self.alive {
            self.capture_squares
                .extend(self.kind.threat_offsets().iter().map(|&m| self.position + m));
        }
    }
}

/// Ordered collection of enemies.
///
/// Insertion order is preserved and is the order the engine processes
/// enemies in, so results are deterministic across runs.
///
/// ## Usage
///
/// ```
/// use voltgrid::core::{Coordinate, EnemyKind, EnemyManager};
///
/// let mut enemies = EnemyManager::new();
/// let id = enemies.spawn(EnemyKind::Knight, Coordinate::new(0, 0));
///
/// enemies.set_position(id, Coordinate::new(2, 1));
/// let enemy = enemies.get(id).unwrap();
///
/// assert_eq!(enemy.position(), Coordinate::new(2, 1));
/// assert_eq!(enemy.capture_squares().len(), 8);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyManager {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enemy and return its id.
    ///
    /// Ids are sequential and never reused within a session.
    pub fn spawn(&mut self, kind: EnemyKind, position: Coordinate) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, kind, position));
        id
    }

    /// Look up an enemy by id.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Check whether an id is known to this manager.
    #[must_use]
    pub fn contains(&self, id: EnemyId) -> bool {
        self.get(id).is_some()
    }

    /// Move an enemy to a new position, refreshing its capture squares.
    ///
    /// Returns the old position, or `None` if the id is unknown. Note
    /// that this records the move only; cell occupant back-references are
    /// reconciled by the engine's leave sweep.
    pub fn set_position(&mut self, id: EnemyId, to: Coordinate) -> Option<Coordinate> {
        let enemy = self.enemies.iter_mut().find(|e| e.id == id)?;
        let old = enemy.position;
        enemy.position = to;
        enemy.refresh_capture_squares();
        Some(old)
    }

    /// Mark an enemy dead, clearing its capture squares.
    ///
    /// Returns `true` if the enemy existed and was alive.
    pub fn kill(&mut self, id: EnemyId) -> bool {
        match self.enemies.iter_mut().find(|e| e.id == id) {
            Some(enemy) if enemy.alive => {
                enemy.alive = false;
                enemy.refresh_capture_squares();
                true
            }
            _ => false,
        }
    }

    /// Iterate all enemies, dead or alive, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Iterate the living enemies in insertion order.
    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// The union of every living enemy's capture squares.
    #[must_use]
    pub fn threatened_squares(&self) -> FxHashSet<Coordinate> {
        let mut squares = FxHashSet::default();
        for enemy in self.alive() {
            squares.extend(enemy.capture_squares().iter().copied());
        }
        squares
    }

    /// Total number of enemies ever spawned, dead included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Check whether the manager holds no enemies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}
