//! Lifecycle events, the session journal, and cell effects.
//!
//! ## Events
//!
//! The engine fires a fixed set of lifecycle events at cells as the turn
//! cycle advances, and appends an [`EventRecord`] to its journal for each
//! firing. Targeted events (a specific cell is involved) record the
//! coordinate; stage-wide events (every cell receives the hook) record
//! one entry with no coordinate rather than one per cell.
//!
//! ## Effects
//!
//! Cell hooks never reach into the rest of the grid directly. A hook that
//! wants to change anything beyond its own cell pushes a [`CellEffect`]
//! into the [`EffectQueue`] it was handed; the engine drains the queue
//! after each dispatch and applies the effects itself. This keeps hook
//! dispatch free of aliasing and puts every cross-cell mutation in one
//! auditable place.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::{Coordinate, EnemyId};

/// The lifecycle events a cell can receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellEvent {
    /// One-time wiring when the level is initialised.
    LevelStart,
    /// The player is about to leave this cell.
    PlayerLeave,
    /// The player committed a move somewhere on the grid.
    PlayerMove,
    /// The player's move animation finished on this cell.
    PlayerLand,
    /// An enemy stands on this cell this turn (identity-free).
    EnemyLand,
    /// An enemy stands on this cell this turn (identity-aware).
    EnemyLandedFor,
    /// The enemy referenced by this cell is no longer standing here.
    EnemyLeave,
    /// The shared enemy-and-level turn is being resolved.
    LevelTurn,
    /// A new player turn is starting.
    PlayerTurnStart,
}

impl CellEvent {
    /// Human-readable event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CellEvent::LevelStart => "level_start",
            CellEvent::PlayerLeave => "player_leave",
            CellEvent::PlayerMove => "player_move",
            CellEvent::PlayerLand => "player_land",
            CellEvent::EnemyLand => "enemy_land",
            CellEvent::EnemyLandedFor => "enemy_landed_for",
            CellEvent::EnemyLeave => "enemy_leave",
            CellEvent::LevelTurn => "level_turn",
            CellEvent::PlayerTurnStart => "player_turn_start",
        }
    }
}

impl std::fmt::Display for CellEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One journal entry: an event firing during a specific turn.
///
/// `at` is `None` for stage-wide events that touched every cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The turn counter value when the event fired.
    pub turn: u32,

    /// Which event fired.
    pub event: CellEvent,

    /// The cell involved, for targeted events.
    pub at: Option<Coordinate>,

    /// The enemy involved, if any.
    pub enemy: Option<EnemyId>,
}

impl EventRecord {
    /// Create a stage-wide record with no specific cell.
    #[must_use]
    pub fn stage(turn: u32, event: CellEvent) -> Self {
        Self {
            turn,
            event,
            at: None,
            enemy: None,
        }
    }

    /// Create a record targeted at one cell.
    #[must_use]
    pub fn at(turn: u32, event: CellEvent, at: Coordinate) -> Self {
        Self {
            turn,
            event,
            at: Some(at),
            enemy: None,
        }
    }

    /// Attach the enemy involved (builder pattern).
    #[must_use]
    pub fn with_enemy(mut self, enemy: EnemyId) -> Self {
        self.enemy = Some(enemy);
        self
    }
}

/// A mutation requested by a cell hook, applied by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellEffect {
    /// Set the charge flag of the cell at `at`.
    SetCharge { at: Coordinate, charged: bool },
    /// Kill the player.
    KillPlayer,
    /// Kill a specific enemy.
    KillEnemy { enemy: EnemyId },
}

/// FIFO queue of pending cell effects.
///
/// Hooks push, the engine pops. Applying an effect may fire further hooks
/// that push again, so the engine keeps draining until the queue is empty
/// before a dispatch stage is considered done.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EffectQueue {
    pending: VecDeque<CellEffect>,
}

impl EffectQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary effect.
    pub fn push(&mut self, effect: CellEffect) {
        self.pending.push_back(effect);
    }

    /// Queue a charge write to another cell.
    pub fn set_charge(&mut self, at: Coordinate, charged: bool) {
        self.push(CellEffect::SetCharge { at, charged });
    }

    /// Queue the player's death.
    pub fn kill_player(&mut self) {
        self.push(CellEffect::KillPlayer);
    }

    /// Queue an enemy's death.
    pub fn kill_enemy(&mut self, enemy: EnemyId) {
        self.push(CellEffect::KillEnemy { enemy });
    }

    /// Take the oldest pending effect.
    pub fn pop(&mut self) -> Option<CellEffect> {
        self.pending.pop_front()
    }

    /// Number of effects waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all pending effects.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EffectQueue::new();

        queue.kill_player();
        queue.set_charge(Coordinate::new(1, 0), true);
        queue.kill_enemy(EnemyId::new(2));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(CellEffect::KillPlayer));
        assert_eq!(
            queue.pop(),
            Some(CellEffect::SetCharge {
                at: Coordinate::new(1, 0),
                charged: true
            })
        );
        assert_eq!(
            queue.pop(),
            Some(CellEffect::KillEnemy {
                enemy: EnemyId::new(2)
            })
        );
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = EffectQueue::new();
        queue.kill_player();
        queue.kill_player();

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_record_builders() {
        let stage = EventRecord::stage(3, CellEvent::LevelTurn);
        assert_eq!(stage.turn, 3);
        assert_eq!(stage.at, None);
        assert_eq!(stage.enemy, None);

        let targeted = EventRecord::at(1, CellEvent::EnemyLandedFor, Coordinate::new(2, 2))
            .with_enemy(EnemyId::new(0));
        assert_eq!(targeted.at, Some(Coordinate::new(2, 2)));
        assert_eq!(targeted.enemy, Some(EnemyId::new(0)));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(CellEvent::PlayerLand.name(), "player_land");
        assert_eq!(format!("{}", CellEvent::EnemyLeave), "enemy_leave");
    }

    #[test]
    fn test_serialization() {
        let record = EventRecord::at(2, CellEvent::PlayerLeave, Coordinate::new(0, 1));
        let json = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
