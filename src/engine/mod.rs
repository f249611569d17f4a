//! Turn sequencing and session plumbing.
//!
//! [`TurnEngine`] owns all mutable play state and drives the shared
//! turn cycle; [`SessionHooks`] is the narrow seam through which it
//! talks back to the host (input lock, deferred landings, the restart
//! prompt). [`BufferedSession`] is the queue-backed implementation used
//! by headless hosts and tests.

mod session;
mod turn;

pub use session::{BufferedSession, PendingLand, SessionHooks};
pub use turn::{EngineSnapshot, MoveOutcome, MoveRejection, TurnEngine, TurnPhase};
