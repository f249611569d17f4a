//! The turn engine: phase sequencing, move legality, hook dispatch.
//!
//! ## Turn cycle
//!
//! One full cycle, driven by the host:
//!
//! 1. [`TurnEngine::start_player_turn`] highlights legal moves and
//!    threatened squares, and raises the restart prompt if the player
//!    is stuck.
//! 2. [`TurnEngine::request_player_move`] validates and commits a move,
//!    then parks a [`PendingLand`] continuation with the session.
//! 3. [`TurnEngine::finish_player_move`] takes the token back from the
//!    host after the move animation; the landing cell reacts.
//! 4. The host's enemy logic updates positions via
//!    [`TurnEngine::enemies_mut`].
//! 5. [`TurnEngine::run_enemy_leave_sweep`] reconciles stale occupant
//!    back-references left behind by enemy movement.
//! 6. [`TurnEngine::run_enemy_and_level_turn`] lands every enemy on its
//!    cell, then every cell takes its level-turn reaction.
//! 7. Back to 1.
//!
//! ## Effects and charge
//!
//! Cells never mutate anything beyond themselves; they queue
//! [`CellEffect`]s which the engine applies after each dispatch. Charge
//! is repropagated at the end of every stage that can move or kill an
//! actor, so state observed between stages is always settled.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::charge::ChargePropagator;
use crate::core::{Coordinate, Enemy, EnemyId, EnemyManager, Player};
use crate::events::{CellEffect, CellEvent, EffectQueue, EventRecord};
use crate::grid::{Cell, Grid, HookContext};

use super::session::{PendingLand, SessionHooks};

/// Whose half of the shared cycle is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the player to pick a move.
    Player,
    /// The player has moved; enemies and the level are resolving.
    EnemyAndLevel,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Player => f.write_str("player"),
            TurnPhase::EnemyAndLevel => f.write_str("enemy_and_level"),
        }
    }
}

/// Why a move request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The enemy-and-level half of the cycle is still resolving.
    NotPlayersTurn,
    /// Dead players do not move.
    PlayerDead,
    /// The session reports input as locked.
    InputLocked,
    /// The target is not in the current legal-move set.
    IllegalTarget,
}

impl MoveRejection {
    /// Human-readable reason.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            MoveRejection::NotPlayersTurn => "not the player's turn",
            MoveRejection::PlayerDead => "player is dead",
            MoveRejection::InputLocked => "input is locked",
            MoveRejection::IllegalTarget => "illegal target",
        }
    }
}

impl std::fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a move request.
///
/// A rejected request is a complete no-op: no hooks fire, no state
/// changes, nothing is journaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The move was accepted and committed.
    Committed,
    /// The move was refused.
    Rejected(MoveRejection),
}

impl MoveOutcome {
    /// Whether the move was accepted.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, MoveOutcome::Committed)
    }

    /// The rejection reason, if refused.
    #[must_use]
    pub fn rejection(&self) -> Option<MoveRejection> {
        match self {
            MoveOutcome::Committed => None,
            MoveOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Deep, comparable capture of everything the engine owns.
///
/// Cells are listed in grid order, enemies in manager order, so two
/// snapshots of equal state compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Every cell with its coordinate, in grid order.
    pub cells: Vec<(Coordinate, Cell)>,
    /// The player piece.
    pub player: Player,
    /// Every enemy, in manager order.
    pub enemies: Vec<Enemy>,
    /// The active phase.
    pub phase: TurnPhase,
    /// The turn counter.
    pub turn: u32,
}

/// Hook signature shared by the stage dispatches.
type CellHook = fn(&mut Cell, &HookContext<'_>, &mut EffectQueue);

/// Sole authority over the turn cycle.
///
/// Owns the grid, the player, and the enemy collection. Everything that
/// changes during play changes through this type.
///
/// ## Usage
///
/// ```
/// use voltgrid::engine::{BufferedSession, TurnPhase};
/// use voltgrid::core::Coordinate;
/// use voltgrid::level::Level;
///
/// let level = Level::parse(
///     ".....\n\
///      .....\n\
///      ..@..\n\
///      .....\n\
///      .....",
/// )
/// .unwrap();
///
/// let mut engine = level.into_engine();
/// let mut session = BufferedSession::new();
///
/// engine.start_player_turn(&mut session);
/// assert_eq!(engine.valid_moves().len(), 8);
///
/// // Commit a move, then resolve the landing once the "animation" ends.
/// let outcome = engine.request_player_move(Coordinate::new(3, 4), &mut session);
/// assert!(outcome.is_committed());
/// assert_eq!(engine.phase(), TurnPhase::EnemyAndLevel);
///
/// let pending = session.next_action().unwrap();
/// assert!(engine.finish_player_move(pending));
///
/// // No enemies in this level; drive the rest of the cycle anyway.
/// engine.run_enemy_leave_sweep();
/// engine.run_enemy_and_level_turn();
/// engine.start_player_turn(&mut session);
/// assert_eq!(engine.phase(), TurnPhase::Player);
/// ```
#[derive(Clone, Debug)]
pub struct TurnEngine {
    grid: Grid,
    player: Player,
    enemies: EnemyManager,
    phase: TurnPhase,
    turn: u32,
    next_seq: u64,
    outstanding_land: Option<u64>,
    journal: Vec<EventRecord>,
    effects: EffectQueue,
    propagator: ChargePropagator,
}

impl TurnEngine {
    /// Wire up a level: record enemy occupants, fire the level-start
    /// hooks, and settle the initial charge.
    ///
    /// The engine starts in [`TurnPhase::Player`] with the turn counter
    /// at zero; the host calls [`Self::start_player_turn`] to begin.
    #[must_use]
    pub fn new(grid: Grid, player: Player, enemies: EnemyManager) -> Self {
        let mut engine = Self {
            grid,
            player,
            enemies,
            phase: TurnPhase::Player,
            turn: 0,
            next_seq: 0,
            outstanding_land: None,
            journal: Vec::new(),
            effects: EffectQueue::new(),
            propagator: ChargePropagator::new(),
        };
        engine.wire_level();
        engine
    }

    // === Queries ===

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The player piece.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The enemy collection.
    #[must_use]
    pub fn enemies(&self) -> &EnemyManager {
        &self.enemies
    }

    /// Mutable enemy access for the host's movement logic.
    ///
    /// Move enemies between [`Self::finish_player_move`] and
    /// [`Self::run_enemy_leave_sweep`]; the sweep and the land hooks
    /// keep the cells' occupant references consistent afterwards.
    pub fn enemies_mut(&mut self) -> &mut EnemyManager {
        &mut self.enemies
    }

    /// The active phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The turn counter. Zero until the first player turn starts.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The lifecycle event journal, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[EventRecord] {
        &self.journal
    }

    /// Take the journal, leaving it empty.
    pub fn take_journal(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.journal)
    }

    /// Capture a comparable snapshot of all owned state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            cells: self.grid.iter().map(|(at, cell)| (at, cell.clone())).collect(),
            player: self.player.clone(),
            enemies: self.enemies.iter().cloned().collect(),
            phase: self.phase,
            turn: self.turn,
        }
    }

    /// Every legal destination for the player right now.
    ///
    /// Scans the whole grid: a coordinate is legal when it holds a
    /// passable cell exactly one knight move from the player. Empty when
    /// the player is dead.
    #[must_use]
    pub fn valid_moves(&self) -> FxHashSet<Coordinate> {
        let mut moves = FxHashSet::default();
        if !self.player.is_alive() {
            return moves;
        }
        let from = self.player.position();
        for (at, cell) in self.grid.iter() {
            if cell.is_passable() && at.is_knight_move_from(from) {
                moves.insert(at);
            }
        }
        moves
    }

    // === Player move protocol ===

    /// Validate and commit a player move.
    ///
    /// On success the departure cell reacts, the piece moves, the phase
    /// flips to [`TurnPhase::EnemyAndLevel`], every cell sees the
    /// player-move stage, and a [`PendingLand`] continuation is parked
    /// with the session. The landing cell does not react until the host
    /// returns the token through [`Self::finish_player_move`].
    #[must_use]
    pub fn request_player_move(
        &mut self,
        target: Coordinate,
        session: &mut dyn SessionHooks,
    ) -> MoveOutcome {
        if self.phase != TurnPhase::Player {
            debug!(%target, "move rejected: not the player's turn");
            return MoveOutcome::Rejected(MoveRejection::NotPlayersTurn);
        }
        if !self.player.is_alive() {
            debug!(%target, "move rejected: player is dead");
            return MoveOutcome::Rejected(MoveRejection::PlayerDead);
        }
        if session.input_locked() {
            debug!(%target, "move rejected: input is locked");
            return MoveOutcome::Rejected(MoveRejection::InputLocked);
        }
        if !self.valid_moves().contains(&target) {
            debug!(%target, "move rejected: illegal target");
            return MoveOutcome::Rejected(MoveRejection::IllegalTarget);
        }

        let from = self.player.position();

        // The departure cell reacts while the player is still on it.
        self.journal
            .push(EventRecord::at(self.turn, CellEvent::PlayerLeave, from));
        self.dispatch_at(from, Cell::on_player_leave);
        self.apply_effects();

        // The piece moves now; the visual transition is the host's.
        self.player.set_position(target);

        self.clear_highlights();
        self.phase = TurnPhase::EnemyAndLevel;
        self.journal
            .push(EventRecord::stage(self.turn, CellEvent::PlayerMove));
        self.dispatch_all(Cell::on_player_move);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.outstanding_land = Some(seq);
        session.queue_action(PendingLand::new(seq, target));

        self.propagate();
        MoveOutcome::Committed
    }

    /// Resolve the landing of a committed move.
    ///
    /// Consumes the continuation. Returns `false` and changes nothing if
    /// the token is not the one outstanding; the sequence check means a
    /// token can be honored at most once.
    ///
    /// Landing on a cell occupied by a living enemy captures it.
    pub fn finish_player_move(&mut self, pending: PendingLand) -> bool {
        if self.outstanding_land != Some(pending.seq()) {
            warn!(seq = pending.seq(), "dropping stale landing token");
            return false;
        }
        self.outstanding_land = None;

        let at = self.player.position();
        self.journal
            .push(EventRecord::at(self.turn, CellEvent::PlayerLand, at));
        self.dispatch_at(at, Cell::on_player_land);
        self.apply_effects();

        if self.player.is_alive() {
            if let Some(id) = self.grid.get(at).and_then(Cell::occupant) {
                let capturable = self
                    .enemies
                    .get(id)
                    .map_or(false, |e| e.is_alive() && e.position() == at);
                if capturable {
                    self.kill_enemy(id);
                    self.apply_effects();
                }
            }
        }

        self.propagate();
        true
    }

    // === Enemy and level stages ===

    /// Reconcile stale occupant back-references.
    ///
    /// For every cell whose recorded occupant has moved away, died, or
    /// is unknown, fire the enemy-leave hook (which clears the
    /// reference). Run this after the host's enemy movement and before
    /// [`Self::run_enemy_and_level_turn`].
    pub fn run_enemy_leave_sweep(&mut self) {
        let coords: Vec<Coordinate> = self.grid.coordinates().collect();
        for at in coords {
            let Some(occupant) = self.grid.get(at).and_then(Cell::occupant) else {
                continue;
            };
            let stale = match self.enemies.get(occupant) {
                Some(enemy) => !enemy.is_alive() || enemy.position() != at,
                None => true,
            };
            if stale {
                self.fire_enemy_leave(at, occupant);
                self.apply_effects();
            }
        }
        self.propagate();
    }

    /// Resolve the shared enemy-and-level turn.
    ///
    /// The living enemies are snapshotted first, then each one lands on
    /// its cell: the identity-free hook fires, then the identity-aware
    /// one. Cells may kill enemies during the pass; later entries of the
    /// snapshot still get their landing. Once every enemy has landed,
    /// charge settles and every cell takes its level-turn reaction.
    pub fn run_enemy_and_level_turn(&mut self) {
        let landings: Vec<(EnemyId, Coordinate)> = self
            .enemies
            .alive()
            .map(|e| (e.id(), e.position()))
            .collect();

        for (id, at) in landings {
            if !self.grid.contains(at) {
                debug!(enemy = id.raw(), %at, "enemy stands on a hole; nothing to land on");
                continue;
            }
            self.journal
                .push(EventRecord::at(self.turn, CellEvent::EnemyLand, at).with_enemy(id));
            self.dispatch_at(at, Cell::on_enemy_land);
            self.apply_effects();

            self.journal
                .push(EventRecord::at(self.turn, CellEvent::EnemyLandedFor, at).with_enemy(id));
            self.dispatch_enemy_landed(at, id);
            self.apply_effects();
        }

        // Landings may have pressed plates; settle charge before the
        // level reactions read it.
        self.propagate();

        self.journal
            .push(EventRecord::stage(self.turn, CellEvent::LevelTurn));
        self.dispatch_all(Cell::on_level_turn);

        self.propagate();
    }

    /// Start a new player turn.
    ///
    /// Flips the phase back, advances the turn counter, fires the
    /// turn-start hooks, then recomputes and pushes both highlight
    /// layers. If no legal move exists the session is told to show the
    /// restart prompt; a stuck session is a terminal outcome, not an
    /// error. Highlighting is idempotent: re-running without an
    /// intervening move pushes the identical sets.
    pub fn start_player_turn(&mut self, session: &mut dyn SessionHooks) {
        self.phase = TurnPhase::Player;
        self.turn += 1;

        self.journal
            .push(EventRecord::stage(self.turn, CellEvent::PlayerTurnStart));
        self.dispatch_all(Cell::on_player_turn_start);

        let moves = self.valid_moves();
        self.highlight_moves(&moves);
        let threats = self.enemies.threatened_squares();
        self.highlight_enemy_threats(&threats);

        if moves.is_empty() {
            info!(turn = self.turn, "no legal moves remain; prompting for restart");
            session.set_restart_prompt(true);
        }

        self.propagate();
    }

    // === Highlight push API ===

    /// Mark exactly the given cells as legal move targets.
    ///
    /// Every cell receives its membership, so previous highlights are
    /// overwritten wholesale.
    pub fn highlight_moves(&mut self, targets: &FxHashSet<Coordinate>) {
        for (at, cell) in self.grid.iter_mut() {
            cell.indicate_move_validity(targets.contains(&at));
        }
    }

    /// Mark exactly the given cells as threatened by enemies.
    pub fn highlight_enemy_threats(&mut self, targets: &FxHashSet<Coordinate>) {
        for (at, cell) in self.grid.iter_mut() {
            cell.indicate_enemy_capture(targets.contains(&at));
        }
    }

    // === Deaths ===

    /// Kill the player.
    ///
    /// Entry point for the host's enemy behavior when the player is
    /// captured. Idempotent.
    pub fn kill_player(&mut self) {
        if self.player.is_alive() {
            self.player.kill();
            info!("player killed");
        }
    }

    // === Internals ===

    fn wire_level(&mut self) {
        let placements: Vec<(EnemyId, Coordinate)> = self
            .enemies
            .alive()
            .map(|e| (e.id(), e.position()))
            .collect();
        for (id, at) in placements {
            if let Some(cell) = self.grid.get_mut(at) {
                cell.set_occupant(id);
            }
        }

        self.journal
            .push(EventRecord::stage(self.turn, CellEvent::LevelStart));
        self.dispatch_all(Cell::on_level_start);

        self.propagate();
    }

    fn hook_context(&self, at: Coordinate) -> HookContext<'static> {
        let player_here = self.player.is_alive() && self.player.position() == at;
        HookContext::new(at).with_player_here(player_here)
    }

    /// Fire a hook on one cell.
    fn dispatch_at(&mut self, at: Coordinate, hook: CellHook) {
        let ctx = self.hook_context(at);
        if let Some(cell) = self.grid.get_mut(at) {
            hook(cell, &ctx, &mut self.effects);
        }
    }

    /// Fire a hook on every cell in grid order, applying effects after
    /// each cell so mid-pass deaths are visible to later cells.
    fn dispatch_all(&mut self, hook: CellHook) {
        let coords: Vec<Coordinate> = self.grid.coordinates().collect();
        for at in coords {
            self.dispatch_at(at, hook);
            self.apply_effects();
        }
    }

    fn dispatch_enemy_landed(&mut self, at: Coordinate, id: EnemyId) {
        let ctx = self.hook_context(at);
        let Some(enemy) = self.enemies.get(id) else {
            return;
        };
        if let Some(cell) = self.grid.get_mut(at) {
            cell.on_enemy_landed(enemy, &ctx, &mut self.effects);
        }
    }

    fn fire_enemy_leave(&mut self, at: Coordinate, enemy: EnemyId) {
        self.journal
            .push(EventRecord::at(self.turn, CellEvent::EnemyLeave, at).with_enemy(enemy));
        let ctx = self.hook_context(at);
        if let Some(cell) = self.grid.get_mut(at) {
            cell.on_enemy_leave(&ctx, &mut self.effects);
        }
    }

    /// Drain the effect queue. Applying an effect may fire hooks that
    /// push more effects; those are drained in the same call.
    fn apply_effects(&mut self) {
        while let Some(effect) = self.effects.pop() {
            match effect {
                CellEffect::SetCharge { at, charged } => {
                    if let Some(cell) = self.grid.get_mut(at) {
                        cell.set_charged(charged);
                    }
                }
                CellEffect::KillPlayer => self.kill_player(),
                CellEffect::KillEnemy { enemy } => self.kill_enemy(enemy),
            }
        }
    }

    fn kill_enemy(&mut self, id: EnemyId) {
        let Some(position) = self
            .enemies
            .get(id)
            .filter(|e| e.is_alive())
            .map(Enemy::position)
        else {
            return;
        };
        self.enemies.kill(id);
        info!(enemy = id.raw(), %position, "enemy killed");

        // The corpse leaves its cell immediately.
        let holds_reference = self
            .grid
            .get(position)
            .map_or(false, |cell| cell.occupant() == Some(id));
        if holds_reference {
            self.fire_enemy_leave(position, id);
        }
    }

    fn clear_highlights(&mut self) {
        for (_, cell) in self.grid.iter_mut() {
            cell.indicate_move_validity(false);
            cell.indicate_enemy_capture(false);
        }
    }

    fn propagate(&mut self) {
        self.propagator.propagate(&mut self.grid, &self.player);
    }
}
