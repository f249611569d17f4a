//! Turn cycle integration tests.
//!
//! These tests drive the engine through the host-facing protocol and
//! verify stage ordering via the journal, the landing-token handshake,
//! and the terminal stuck/dead outcomes.

use voltgrid::core::{Coordinate, Enemy};
use voltgrid::engine::{BufferedSession, MoveRejection, TurnPhase};
use voltgrid::events::CellEvent;
use voltgrid::level::Level;

fn open_5x5() -> Level {
    Level::parse(
        ".....\n\
         .....\n\
         ..@..\n\
         .....\n\
         .....",
    )
    .unwrap()
}

/// Test that one full cycle journals its stages in protocol order.
#[test]
fn test_full_cycle_journal_order() {
    let level = Level::parse(
        "K....\n\
         .....\n\
         ..@..\n\
         .....\n\
         .....",
    )
    .unwrap();
    let mut engine = level.into_engine();
    let mut session = BufferedSession::new();
    let king = engine.enemies().iter().next().unwrap().id();

    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(3, 4), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));
    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();
    engine.start_player_turn(&mut session);

    let journal: Vec<(CellEvent, Option<Coordinate>, Option<_>, u32)> = engine
        .journal()
        .iter()
        .map(|r| (r.event, r.at, r.enemy, r.turn))
        .collect();

    assert_eq!(
        journal,
        vec![
            (CellEvent::LevelStart, None, None, 0),
            (CellEvent::PlayerTurnStart, None, None, 1),
            (CellEvent::PlayerLeave, Some(Coordinate::new(2, 2)), None, 1),
            (CellEvent::PlayerMove, None, None, 1),
            (CellEvent::PlayerLand, Some(Coordinate::new(3, 4)), None, 1),
            (CellEvent::EnemyLand, Some(Coordinate::new(0, 0)), Some(king), 1),
            (CellEvent::EnemyLandedFor, Some(Coordinate::new(0, 0)), Some(king), 1),
            (CellEvent::LevelTurn, None, None, 1),
            (CellEvent::PlayerTurnStart, None, None, 2),
        ]
    );
}

/// Test that an abandoned landing token is refused once a newer move
/// commits, while the newer token still resolves.
#[test]
fn test_abandoned_token_goes_stale() {
    let mut engine = open_5x5().into_engine();
    let mut session = BufferedSession::new();

    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(3, 4), &mut session)
        .is_committed());

    // The host abandons the cycle without resolving the landing.
    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(1, 3), &mut session)
        .is_committed());

    let first = session.next_action().unwrap();
    let second = session.next_action().unwrap();
    assert_eq!(first.target(), Coordinate::new(3, 4));

    let before = engine.snapshot();
    let journaled = engine.journal().len();
    assert!(!engine.finish_player_move(first), "stale token must be refused");
    assert_eq!(engine.snapshot(), before, "stale token must change nothing");
    assert_eq!(engine.journal().len(), journaled);

    assert!(engine.finish_player_move(second));
}

/// Test that a rejected request leaves no trace anywhere.
#[test]
fn test_rejected_move_is_a_complete_noop() {
    let mut engine = open_5x5().into_engine();
    let mut session = BufferedSession::new();
    engine.start_player_turn(&mut session);

    let before = engine.snapshot();
    let journaled = engine.journal().len();

    let outcome = engine.request_player_move(Coordinate::new(2, 3), &mut session);

    assert_eq!(outcome.rejection(), Some(MoveRejection::IllegalTarget));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.journal().len(), journaled);
    assert_eq!(session.pending_count(), 0);
    assert_eq!(engine.phase(), TurnPhase::Player);
}

/// Test that a board too small for any knight move prompts a restart.
#[test]
fn test_restart_prompt_when_stuck() {
    let mut engine = Level::parse(
        "...\n\
         .@.\n\
         ...",
    )
    .unwrap()
    .into_engine();
    let mut session = BufferedSession::new();

    engine.start_player_turn(&mut session);

    assert!(engine.valid_moves().is_empty());
    assert!(session.restart_prompt());
}

/// Test that an open board does not prompt.
#[test]
fn test_no_restart_prompt_with_moves_available() {
    let mut engine = open_5x5().into_engine();
    let mut session = BufferedSession::new();

    engine.start_player_turn(&mut session);

    assert!(!session.restart_prompt());
}

/// Test that a dead player locks the cycle into the stuck outcome.
#[test]
fn test_dead_player_cycles_to_restart_prompt() {
    let mut engine = open_5x5().into_engine();
    let mut session = BufferedSession::new();
    engine.start_player_turn(&mut session);

    // Host-side death, e.g. an enemy behavior capturing the player.
    engine.kill_player();

    let outcome = engine.request_player_move(Coordinate::new(3, 4), &mut session);
    assert_eq!(outcome.rejection(), Some(MoveRejection::PlayerDead));

    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();
    engine.start_player_turn(&mut session);

    assert!(session.restart_prompt());
}

/// Test that landing on an occupied square captures the enemy.
#[test]
fn test_landing_on_enemy_captures_it() {
    let level = Level::parse(
        ".....\n\
         .....\n\
         ..@..\n\
         .....\n\
         ...k.",
    )
    .unwrap();
    let mut engine = level.into_engine();
    let mut session = BufferedSession::new();
    let knight = engine.enemies().iter().next().unwrap().id();

    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(3, 4), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));

    assert!(engine.player().is_alive());
    assert!(!engine.enemies().get(knight).unwrap().is_alive());
    assert_eq!(
        engine.grid().get(Coordinate::new(3, 4)).unwrap().occupant(),
        None,
        "capture must clear the occupant reference"
    );

    // The departure fired on the corpse's cell.
    assert!(engine
        .journal()
        .iter()
        .any(|r| r.event == CellEvent::EnemyLeave && r.enemy == Some(knight)));

    // The corpse takes no further part in the cycle.
    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();
    assert!(!engine
        .journal()
        .iter()
        .any(|r| r.event == CellEvent::EnemyLand));
}

/// Test that an enemy standing on a hole is skipped by the landing pass.
#[test]
fn test_enemy_on_hole_skips_landing() {
    let level = Level::parse(
        "k....\n\
         .....\n\
         .._..\n\
         ..@..\n\
         .....",
    )
    .unwrap();
    let mut engine = level.into_engine();
    let mut session = BufferedSession::new();
    let knight = engine.enemies().iter().next().unwrap().id();

    engine.start_player_turn(&mut session);

    // Host movement walks the enemy off the map.
    engine.enemies_mut().set_position(knight, Coordinate::new(2, 2));
    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();

    let enemy: &Enemy = engine.enemies().get(knight).unwrap();
    assert!(enemy.is_alive());
    assert_eq!(
        engine.grid().get(Coordinate::new(0, 0)).unwrap().occupant(),
        None,
        "sweep must clear the vacated cell"
    );
    assert!(!engine
        .journal()
        .iter()
        .any(|r| r.event == CellEvent::EnemyLand));
}
