//! The session seam between the engine and its host.
//!
//! The engine is synchronous except for one point: a committed player
//! move hands the host a [`PendingLand`] continuation, the host plays
//! whatever animation it wants, and hands the token back through
//! [`TurnEngine::finish_player_move`](super::TurnEngine::finish_player_move)
//! when the piece visually arrives. The token is single-shot by move
//! semantics: it cannot be cloned, and consuming it is the only way to
//! resolve the landing.
//!
//! [`SessionHooks`] is everything the engine needs from the host. A
//! headless host (tests, solvers) can use the provided
//! [`BufferedSession`] and drain the queue immediately.

use std::collections::VecDeque;

use crate::core::Coordinate;

/// Continuation for a committed move whose landing has not resolved yet.
///
/// Deliberately not `Clone`: one committed move, one landing. Tokens are
/// also engine-specific; a host that restarts a level must drop any
/// queued tokens along with the old engine.
#[derive(Debug)]
pub struct PendingLand {
    seq: u64,
    target: Coordinate,
}

impl PendingLand {
    pub(crate) fn new(seq: u64, target: Coordinate) -> Self {
        Self { seq, target }
    }

    /// The cell the move committed to.
    #[must_use]
    pub fn target(&self) -> Coordinate {
        self.target
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

/// What the engine asks of its host.
///
/// The host side owns input capture, animation, and UI; the engine only
/// ever talks to it through these three calls.
pub trait SessionHooks {
    /// Whether input is currently locked (an animation or cutscene is
    /// playing). Move requests are rejected while locked.
    fn input_locked(&self) -> bool {
        false
    }

    /// Take custody of a landing continuation.
    ///
    /// The host must hand the token back exactly once, after the move
    /// animation completes and before the enemy turn is driven.
    fn queue_action(&mut self, pending: PendingLand);

    /// Show or hide the restart prompt.
    ///
    /// Raised when a player turn starts with no legal moves: the session
    /// is stuck, which is a terminal outcome rather than an error.
    fn set_restart_prompt(&mut self, visible: bool) {
        let _ = visible;
    }
}

/// Queue-backed [`SessionHooks`] implementation.
///
/// Suitable for headless hosts: store the continuation, drain it with
/// [`BufferedSession::next_action`], inspect the restart flag directly.
///
/// ## Usage
///
/// ```
/// use voltgrid::engine::{BufferedSession, SessionHooks};
///
/// let mut session = BufferedSession::new();
/// assert!(!session.input_locked());
/// assert!(session.next_action().is_none());
/// assert!(!session.restart_prompt());
/// ```
#[derive(Debug, Default)]
pub struct BufferedSession {
    queue: VecDeque<PendingLand>,
    locked: bool,
    restart_prompt: bool,
}

impl BufferedSession {
    /// Create an unlocked session with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock or unlock input.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Whether the restart prompt is currently shown.
    #[must_use]
    pub fn restart_prompt(&self) -> bool {
        self.restart_prompt
    }

    /// Take the oldest queued continuation.
    pub fn next_action(&mut self) -> Option<PendingLand> {
        self.queue.pop_front()
    }

    /// Number of continuations waiting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued continuation.
    ///
    /// Call this when abandoning an engine (level restart), so a stale
    /// token can never reach the replacement engine.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl SessionHooks for BufferedSession {
    fn input_locked(&self) -> bool {
        self.locked
    }

    fn queue_action(&mut self, pending: PendingLand) {
        self.queue.push_back(pending);
    }

    fn set_restart_prompt(&mut self, visible: bool) {
        self.restart_prompt = visible;
    }
}
