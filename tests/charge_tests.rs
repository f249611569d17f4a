//! Charge conduction integration tests.
//!
//! These tests verify conduction as the engine drives it: sources and
//! pressed plates feeding wire runs, orthogonal-only adjacency, and the
//! lethal interactions on conductor tiles.

use voltgrid::core::{Coordinate, EnemyKind};
use voltgrid::engine::{BufferedSession, TurnEngine};
use voltgrid::grid::TileKind;
use voltgrid::level::{Level, LevelBuilder};

fn charged(engine: &TurnEngine, x: i32, y: i32) -> bool {
    engine.grid().get(Coordinate::new(x, y)).unwrap().is_charged()
}

/// Fill a rectangle with floor tiles.
fn with_floor_rect(mut builder: LevelBuilder, x1: i32, y0: i32, y1: i32) -> LevelBuilder {
    for y in y0..=y1 {
        for x in 0..=x1 {
            builder = builder.with_tile(Coordinate::new(x, y), TileKind::Floor);
        }
    }
    builder
}

/// Test that a source charges an entire wire run at level start.
#[test]
fn test_source_charges_wire_run() {
    let engine = Level::parse(
        "*====\n\
         .....\n\
         ..@..",
    )
    .unwrap()
    .into_engine();

    assert!(charged(&engine, 0, 0), "source reads as charged");
    for x in 1..=4 {
        assert!(charged(&engine, x, 0), "wire cell ({}, 0) must be charged", x);
    }
    assert!(!charged(&engine, 0, 1), "floor never carries charge");
}

/// Test that a non-conductor gap stops conduction.
#[test]
fn test_floor_gap_blocks_conduction() {
    let engine = Level::parse(
        "*=.==\n\
         .....\n\
         ..@..",
    )
    .unwrap()
    .into_engine();

    assert!(charged(&engine, 1, 0));
    assert!(!charged(&engine, 3, 0), "charge must not jump the floor gap");
    assert!(!charged(&engine, 4, 0));
}

/// Test that diagonal adjacency does not conduct.
#[test]
fn test_diagonal_does_not_conduct() {
    let engine = Level::parse(
        "*_...\n\
         _=...\n\
         ..@..",
    )
    .unwrap()
    .into_engine();

    assert!(!charged(&engine, 1, 1), "diagonal neighbor of a source stays dead");
}

/// Test that a plate powers its wire while pressed and releases it on
/// departure.
#[test]
fn test_plate_press_and_release() {
    let mut engine = Level::parse(
        "=o=..\n\
         .....\n\
         ..@..",
    )
    .unwrap()
    .into_engine();
    let mut session = BufferedSession::new();

    // Unpressed plate, no source: the wire is dead.
    assert!(!charged(&engine, 0, 0));
    assert!(!charged(&engine, 1, 0));
    assert!(!charged(&engine, 2, 0));

    // Land on the plate. Plates are insulated, so this is safe even
    // though the plate itself becomes charged.
    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(1, 0), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));

    assert!(engine.player().is_alive(), "plates never electrocute");
    assert!(charged(&engine, 0, 0));
    assert!(charged(&engine, 1, 0));
    assert!(charged(&engine, 2, 0));

    // Standing on the pressed plate through a level turn is also safe.
    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();
    assert!(engine.player().is_alive());

    // Step off; the wire dies with the plate.
    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(2, 2), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));

    assert!(!charged(&engine, 0, 0));
    assert!(!charged(&engine, 1, 0));
    assert!(!charged(&engine, 2, 0));
}

/// Test that an enemy standing on a plate keeps the wire powered.
#[test]
fn test_enemy_pressing_plate_powers_wire() {
    let builder = LevelBuilder::new()
        .with_tile(Coordinate::new(0, 0), TileKind::Conductor)
        .with_tile(Coordinate::new(1, 0), TileKind::Plate)
        .with_tile(Coordinate::new(2, 0), TileKind::Conductor)
        .with_player(Coordinate::new(2, 2))
        .with_enemy(EnemyKind::Knight, Coordinate::new(1, 0));
    let mut engine = with_floor_rect(builder, 4, 1, 2).build().unwrap().into_engine();

    assert!(charged(&engine, 0, 0), "occupant pressure powers the wire");
    assert!(charged(&engine, 2, 0));

    // The plate is insulated, so its occupant survives the level turn.
    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();
    let enemy = engine.enemies().iter().next().unwrap();
    assert!(enemy.is_alive());
    assert!(charged(&engine, 0, 0));
}

/// Test that the level turn electrocutes an enemy on a charged
/// conductor.
#[test]
fn test_enemy_zapped_on_charged_conductor() {
    let builder = LevelBuilder::new()
        .with_tile(Coordinate::new(0, 0), TileKind::Source)
        .with_tile(Coordinate::new(1, 0), TileKind::Conductor)
        .with_player(Coordinate::new(2, 2))
        .with_enemy(EnemyKind::Knight, Coordinate::new(1, 0));
    let mut engine = with_floor_rect(builder, 4, 1, 2).build().unwrap().into_engine();
    let knight = engine.enemies().iter().next().unwrap().id();

    assert!(charged(&engine, 1, 0));
    assert!(engine.enemies().get(knight).unwrap().is_alive());

    engine.run_enemy_leave_sweep();
    engine.run_enemy_and_level_turn();

    assert!(!engine.enemies().get(knight).unwrap().is_alive());
    assert_eq!(
        engine.grid().get(Coordinate::new(1, 0)).unwrap().occupant(),
        None,
        "electrocution must clear the occupant reference"
    );
    assert!(charged(&engine, 1, 0), "the wire stays powered by its source");
}

/// Test that landing on a charged conductor kills the player.
#[test]
fn test_player_dies_landing_on_charged_conductor() {
    let mut engine = Level::parse(
        "*=...\n\
         .....\n\
         ..@..",
    )
    .unwrap()
    .into_engine();
    let mut session = BufferedSession::new();

    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(1, 0), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));

    assert!(!engine.player().is_alive());
}

/// Test that landing on a dead conductor is safe.
#[test]
fn test_player_safe_on_dead_conductor() {
    let mut engine = Level::parse(
        ".=...\n\
         .....\n\
         ..@..",
    )
    .unwrap()
    .into_engine();
    let mut session = BufferedSession::new();

    engine.start_player_turn(&mut session);
    assert!(engine
        .request_player_move(Coordinate::new(1, 0), &mut session)
        .is_committed());
    let pending = session.next_action().unwrap();
    assert!(engine.finish_player_move(pending));

    assert!(engine.player().is_alive());
}
