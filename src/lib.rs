//! # voltgrid
//!
//! A turn-based rules engine for a knight-move grid puzzle with charge
//! conduction.
//!
//! ## Design Principles
//!
//! 1. **Engine, Not Game**: No rendering, animation, or input handling.
//!    Hosts drive the turn cycle and observe state; the engine owns the
//!    rules.
//!
//! 2. **Effects Over Mutation**: Cells react to lifecycle hooks by
//!    queueing [`events::CellEffect`]s; only the engine applies them.
//!    No cell ever reaches into another cell or an actor.
//!
//! 3. **Deterministic Sweeps**: The grid iterates in insertion order,
//!    so hook dispatch and charge propagation are reproducible for any
//!    given level.
//!
//! ## Architecture
//!
//! - **Shared Turn Cycle**: One player move, then one combined
//!   enemy-and-level resolution, sequenced by [`engine::TurnEngine`].
//!
//! - **Deferred Landing**: A committed move parks a single-use
//!   [`engine::PendingLand`] token with the session; landing reactions
//!   wait until the host hands the token back.
//!
//! - **Monotone Charge Flood**: [`charge::ChargePropagator`] clears all
//!   charge and re-floods from sources and pressed plates each time,
//!   sweeping until a pass changes nothing.
//!
//! ## Modules
//!
//! - `core`: Coordinates, knight-move table, the player, enemies
//! - `grid`: Tile catalog, cells and their lifecycle hooks, the grid map
//! - `events`: Lifecycle events, the journal, queued effects
//! - `charge`: Conduction flood over the grid's conductor cells
//! - `engine`: Turn sequencing, move legality, session plumbing
//! - `level`: Validated level construction and ASCII map parsing

pub mod charge;
pub mod core;
pub mod engine;
pub mod events;
pub mod grid;
pub mod level;

// Re-export commonly used types
pub use crate::core::{Coordinate, Enemy, EnemyId, EnemyKind, EnemyManager, Player, KNIGHT_MOVES};

pub use crate::grid::{Cell, Grid, HookContext, PassabilityWrite, TileKind};

pub use crate::events::{CellEffect, CellEvent, EffectQueue, EventRecord};

pub use crate::charge::{ChargePropagator, PropagationReport};

pub use crate::engine::{
    BufferedSession, EngineSnapshot, MoveOutcome, MoveRejection, PendingLand, SessionHooks,
    TurnEngine, TurnPhase,
};

pub use crate::level::{Level, LevelBuilder, LevelError};
