//! Runtime cell state and the lifecycle hook surface.
//!
//! A [`Cell`] pairs an immutable [`TileKind`] with the state that changes
//! during play: passability, the enemy occupant back-reference, charge,
//! and the two highlight flags. The engine drives cells exclusively
//! through the lifecycle hooks below; tile behavior is a `match` on the
//! kind inside each hook.
//!
//! ## Hook contract
//!
//! Hooks may mutate their own cell freely. Anything beyond the cell
//! boundary (killing an actor, charging a neighbor) is requested through
//! the [`EffectQueue`] and applied by the engine after the dispatch, so
//! a hook never holds a second grid borrow.
//!
//! ## Passability writes
//!
//! Walls are permanently impassable. A passability write to a wall is
//! not an error: the write is ignored, a warning is logged, and the
//! caller gets [`PassabilityWrite::Coerced`] back.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Coordinate, Enemy, EnemyId};
use crate::events::EffectQueue;

use super::tile::TileKind;

/// Outcome of a passability write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassabilityWrite {
    /// The write took effect.
    Applied,
    /// The cell refused the write and kept its value.
    Coerced,
}

/// Read-only view handed to hooks.
///
/// Built by the engine per dispatch. The charge inputs are only
/// populated for the two charge hooks; every other hook sees them empty.
#[derive(Clone, Copy, Debug)]
pub struct HookContext<'a> {
    /// The coordinate of the cell being dispatched.
    pub at: Coordinate,
    /// Whether the living player stands on this cell.
    pub player_here: bool,
    /// Whether any orthogonally adjacent conductor is currently charged.
    pub powered_neighbor: bool,
    /// The orthogonally adjacent coordinates that hold conductor cells.
    pub conductor_neighbors: &'a [Coordinate],
}

impl<'a> HookContext<'a> {
    /// Context with no charge inputs.
    #[must_use]
    pub fn new(at: Coordinate) -> Self {
        Self {
            at,
            player_here: false,
            powered_neighbor: false,
            conductor_neighbors: &[],
        }
    }

    /// Record whether the player stands here (builder pattern).
    #[must_use]
    pub fn with_player_here(mut self, player_here: bool) -> Self {
        self.player_here = player_here;
        self
    }

    /// Attach charge inputs (builder pattern).
    #[must_use]
    pub fn with_charge_inputs(
        mut self,
        powered_neighbor: bool,
        conductor_neighbors: &'a [Coordinate],
    ) -> Self {
        self.powered_neighbor = powered_neighbor;
        self.conductor_neighbors = conductor_neighbors;
        self
    }
}

/// One tile's runtime state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    kind: TileKind,
    passable: bool,
    occupant: Option<EnemyId>,
    charged: bool,
    highlighted: bool,
    capture_threatened: bool,
    graphics_variant: u8,
}

impl Cell {
    /// Create a cell with the kind's default state.
    #[must_use]
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            passable: kind.default_passable(),
            occupant: None,
            charged: false,
            highlighted: false,
            capture_threatened: false,
            graphics_variant: kind.default_graphics_variant(),
        }
    }

    // === Accessors ===

    /// What this tile is.
    #[must_use]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether the player may land here.
    #[must_use]
    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// The enemy recorded as standing here, if any.
    ///
    /// This is a back-reference maintained by the engine's land hooks and
    /// leave sweep. Between the external movement step and the sweep it
    /// may be stale; after the sweep it is accurate.
    #[must_use]
    pub fn occupant(&self) -> Option<EnemyId> {
        self.occupant
    }

    /// Whether the cell currently carries charge.
    #[must_use]
    pub fn is_charged(&self) -> bool {
        self.charged
    }

    /// Whether the cell is highlighted as a legal move target.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Whether the cell is marked as threatened by an enemy.
    #[must_use]
    pub fn is_capture_threatened(&self) -> bool {
        self.capture_threatened
    }

    /// Renderer-facing texture variant.
    #[must_use]
    pub fn graphics_variant(&self) -> u8 {
        self.graphics_variant
    }

    // === Writes ===

    /// Try to change passability.
    ///
    /// Walls refuse the write: the value is kept, a warning is logged and
    /// `Coerced` is returned. Every other kind applies it.
    #[must_use]
    pub fn set_passable(&mut self, passable: bool) -> PassabilityWrite {
        if self.kind == TileKind::Wall {
            warn!(requested = passable, "ignoring passability write to a wall cell");
            return PassabilityWrite::Coerced;
        }
        self.passable = passable;
        PassabilityWrite::Applied
    }

    /// Reassign the renderer-facing texture variant.
    pub fn set_graphics_variant(&mut self, variant: u8) {
        self.graphics_variant = variant;
    }

    pub(crate) fn set_charged(&mut self, charged: bool) {
        self.charged = charged;
    }

    pub(crate) fn set_occupant(&mut self, enemy: EnemyId) {
        self.occupant = Some(enemy);
    }

    // === Lifecycle hooks ===

    /// One-time wiring when the level is initialised.
    pub fn on_level_start(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {}

    /// The player is about to leave this cell.
    pub fn on_player_leave(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {}

    /// The player committed a move somewhere on the grid.
    pub fn on_player_move(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {}

    /// The player's move finished on this cell.
    ///
    /// A charged conductor is lethal to land on. Plates and sources are
    /// insulated and never harm the player.
    pub fn on_player_land(&mut self, _ctx: &HookContext<'_>, effects: &mut EffectQueue) {
        if self.kind == TileKind::Conductor && self.charged {
            effects.kill_player();
        }
    }

    /// An enemy stands on this cell this turn. Identity-free form.
    pub fn on_enemy_land(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {}

    /// An enemy stands on this cell this turn. Identity-aware form.
    ///
    /// Records the occupant back-reference for every kind. Traps kill the
    /// enemy that stepped on them.
    pub fn on_enemy_landed(
        &mut self,
        enemy: &Enemy,
        _ctx: &HookContext<'_>,
        effects: &mut EffectQueue,
    ) {
        self.occupant = Some(enemy.id());
        if self.kind == TileKind::Trap && enemy.is_alive() {
            effects.kill_enemy(enemy.id());
        }
    }

    /// The enemy referenced by this cell is no longer standing here.
    ///
    /// Clears the back-reference for every kind.
    pub fn on_enemy_leave(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {
        self.occupant = None;
    }

    /// The shared enemy-and-level turn is being resolved.
    ///
    /// A charged conductor electrocutes whatever enemy stands on it.
    pub fn on_level_turn(&mut self, _ctx: &HookContext<'_>, effects: &mut EffectQueue) {
        if self.kind == TileKind::Conductor && self.charged {
            if let Some(occupant) = self.occupant {
                effects.kill_enemy(occupant);
            }
        }
    }

    /// A new player turn is starting.
    pub fn on_player_turn_start(&mut self, _ctx: &HookContext<'_>, _effects: &mut EffectQueue) {}

    /// Recompute this cell's charge from its inputs.
    ///
    /// Sources are always charged. Plates are charged while pressed (the
    /// player or an enemy stands on them) or while fed by a neighbor.
    /// Plain conductors carry whatever their neighbors feed them.
    pub fn on_charge_changed(&mut self, ctx: &HookContext<'_>) {
        match self.kind {
            TileKind::Source => self.charged = true,
            TileKind::Plate => {
                let pressed = ctx.player_here || self.occupant.is_some();
                self.charged = pressed || ctx.powered_neighbor;
            }
            TileKind::Conductor => self.charged = ctx.powered_neighbor,
            TileKind::Floor | TileKind::Wall | TileKind::Trap => {}
        }
    }

    /// Push this cell's charge to its conductor neighbors.
    pub fn update_outgoing_charge(&self, ctx: &HookContext<'_>, effects: &mut EffectQueue) {
        if self.kind.is_conductor() && self.charged {
            for &neighbor in ctx.conductor_neighbors {
                effects.set_charge(neighbor, true);
            }
        }
    }

    /// Show or clear the legal-move highlight.
    pub fn indicate_move_validity(&mut self, valid: bool) {
        self.highlighted = valid;
    }

    /// Show or clear the enemy-capture warning.
    pub fn indicate_enemy_capture(&mut self, threatened: bool) {
        self.capture_threatened = threatened;
    }
}
