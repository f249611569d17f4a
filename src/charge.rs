//! Charge propagation over the conductor subgraph.
//!
//! Charge is derived state: it is a pure function of the sources (source
//! tiles, pressed plates) and the conductor topology, and is rebuilt from
//! scratch on every run rather than patched incrementally. The engine
//! reruns propagation after every stage that can move an actor or kill
//! one, so observers between turns never see stale charge.
//!
//! ## Algorithm
//!
//! 1. Clear the charge flag of every conductor cell.
//! 2. Sweep the conductors in grid order. Each cell first recomputes its
//!    own charge from its inputs ([`Cell::on_charge_changed`]), then
//!    pushes its result to its orthogonal conductor neighbors
//!    ([`Cell::update_outgoing_charge`]).
//! 3. Repeat the sweep until a full pass changes nothing.
//!
//! Charge only switches on during a run, so the loop is monotone: it
//! reaches the fixed point in at most one pass per conductor, and the
//! pass limit below is a hard stop, not a tuning knob. Running again
//! without mutating the grid reproduces the identical assignment.

use smallvec::SmallVec;

use crate::core::{Coordinate, Player};
use crate::events::{CellEffect, EffectQueue};
use crate::grid::{Cell, Grid, HookContext};

/// What one propagation run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagationReport {
    /// Number of sweeps over the conductor list, including the final
    /// sweep that observed no change.
    pub passes: u32,
    /// Number of conductor cells left charged.
    pub charged: usize,
}

/// Rebuilds conductor charge. Owns reusable scratch space, so keep one
/// around instead of constructing per run.
#[derive(Clone, Debug, Default)]
pub struct ChargePropagator {
    conductors: Vec<Coordinate>,
    effects: EffectQueue,
}

impl ChargePropagator {
    /// Create a propagator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the charge assignment of every conductor cell in `grid`.
    ///
    /// `player` feeds plate pressure; enemy pressure comes from the
    /// occupant back-references on the cells themselves, which is why
    /// the engine only propagates while those are reconciled.
    pub fn propagate(&mut self, grid: &mut Grid, player: &Player) -> PropagationReport {
        self.conductors.clear();
        self.conductors.extend(
            grid.iter()
                .filter(|(_, cell)| cell.kind().is_conductor())
                .map(|(at, _)| at),
        );

        for &at in &self.conductors {
            if let Some(cell) = grid.get_mut(at) {
                cell.set_charged(false);
            }
        }

        let limit = self.conductors.len() as u32 + 1;
        let mut passes = 0;

        loop {
            passes += 1;
            let mut changed = false;

            for &at in &self.conductors {
                let mut neighbors: SmallVec<[Coordinate; 4]> = SmallVec::new();
                let mut powered = false;
                for n in at.orthogonal_neighbors() {
                    if let Some(cell) = grid.get(n) {
                        if cell.kind().is_conductor() {
                            neighbors.push(n);
                            powered |= cell.is_charged();
                        }
                    }
                }

                let player_here = player.is_alive() && player.position() == at;
                let ctx = HookContext::new(at)
                    .with_player_here(player_here)
                    .with_charge_inputs(powered, &neighbors);

                let Some(cell) = grid.get_mut(at) else { continue };
                let before = cell.is_charged();
                cell.on_charge_changed(&ctx);
                changed |= cell.is_charged() != before;

                if let Some(cell) = grid.get(at) {
                    cell.update_outgoing_charge(&ctx, &mut self.effects);
                }

                while let Some(effect) = self.effects.pop() {
                    if let CellEffect::SetCharge { at: target, charged } = effect {
                        if !charged {
                            continue;
                        }
                        if let Some(cell) = grid.get_mut(target) {
                            if !cell.is_charged() {
                                cell.set_charged(true);
                                changed = true;
                            }
                        }
                    }
                }
            }

            if !changed || passes >= limit {
                break;
            }
        }

        let charged = self
            .conductors
            .iter()
            .filter(|&&at| grid.get(at).map_or(false, Cell::is_charged))
            .count();

        PropagationReport { passes, charged }
    }
}
