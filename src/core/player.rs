//! The player piece.
//!
//! There is exactly one player per session. The piece itself is dumb
//! state: position plus an alive flag. All movement and death decisions
//! go through the turn engine, which is why the mutators are
//! crate-internal.

use serde::{Deserialize, Serialize};

use super::coord::Coordinate;

/// The player piece.
///
/// ```
/// use voltgrid::core::{Coordinate, Player};
///
/// let player = Player::new(Coordinate::new(2, 2));
/// assert_eq!(player.position(), Coordinate::new(2, 2));
/// assert!(player.is_alive());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    position: Coordinate,
    alive: bool,
}

impl Player {
    /// Create a live player at a starting position.
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            alive: true,
        }
    }

    /// Where the player currently stands.
    #[must_use]
    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Whether the player is still alive.
    ///
    /// A dead player has no legal moves and ignores move requests.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn set_position(&mut self, to: Coordinate) {
        self.position = to;
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_alive() {
        let player = Player::new(Coordinate::new(0, 0));
        assert!(player.is_alive());
        assert_eq!(player.position(), Coordinate::new(0, 0));
    }

    #[test]
    fn test_kill_is_permanent() {
        let mut player = Player::new(Coordinate::new(1, 1));
        player.kill();
        assert!(!player.is_alive());
    }

    #[test]
    fn test_set_position() {
        let mut player = Player::new(Coordinate::new(0, 0));
        player.set_position(Coordinate::new(2, 1));
        assert_eq!(player.position(), Coordinate::new(2, 1));
    }

    #[test]
    fn test_serialization() {
        let player = Player::new(Coordinate::new(3, 4));
        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
