//! End-to-end games on small hand-made dungeons.

use key_cave_core::{
    Controls, Direction, EnterEvent, Entity, Game, GameConfig, GameStatus, LevelTable, Position,
};

/// Start at the top-left, key bottom-right, door next to it and a move
/// bonus behind the wall column.
const CAVE: &str = "O#M\n.#.\n.DK";

fn cave(moves: i32) -> Game {
    Game::from_layout(CAVE, GameConfig::with_move_budget(moves)).unwrap()
}

#[test]
fn door_without_key_is_a_wasted_move() {
    let mut game = cave(10);

    let report = game.take_turn(Direction::Right);
    assert!(report.blocked);
    game.take_turn(Direction::Down);
    let report = game.take_turn(Direction::Down);
    assert_eq!(report.position, Position::new(2, 0));
    assert_eq!(
        game.entity_in_direction(Direction::Right),
        Some(&Entity::Door)
    );
    assert!(!game.won());

    let report = game.take_turn(Direction::Right);
    assert_eq!(report.position, Position::new(2, 1));
    assert_eq!(report.event, EnterEvent::DoorLocked);
    assert!(!report.won);
    assert_eq!(report.moves_remaining, 6);
    assert_eq!(report.status(), GameStatus::Playing);
}

#[test]
fn key_then_door_wins() {
    let mut game = cave(10);
    for direction in [
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
    ] {
        game.take_turn(direction);
    }
    assert_eq!(game.player().position(), Position::new(2, 2));
    assert_eq!(game.player().inventory(), &[Entity::Key]);
    assert!(game.entity(Position::new(2, 2)).is_none());
    assert!(!game.won());

    let report = game.take_turn(Direction::Left);
    assert_eq!(report.event, EnterEvent::Won);
    assert!(report.won);
    assert!(game.won());
    assert_eq!(game.status(), GameStatus::Won);
}

#[test]
fn single_blocked_move_loses() {
    let mut game = cave(1);

    let report = game.take_turn(Direction::Right);

    assert!(report.blocked);
    assert_eq!(report.position, Position::new(0, 0));
    assert_eq!(game.player().moves_remaining(), 0);
    assert!(game.check_game_over());
    assert!(!game.won());
    assert_eq!(game.status(), GameStatus::Lost);
}

#[test]
fn move_bonus_is_consumed_once() {
    let mut game = cave(10);
    for direction in [
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Up,
    ] {
        game.take_turn(direction);
    }
    assert_eq!(game.player().moves_remaining(), 5);

    let report = game.take_turn(Direction::Up);
    assert_eq!(report.position, Position::new(0, 2));
    assert_eq!(report.event, EnterEvent::MovesGained(5));
    // +5 for the bonus, -1 for the turn.
    assert_eq!(report.moves_remaining, 9);
    assert!(game.entity(Position::new(0, 2)).is_none());

    game.take_turn(Direction::Down);
    let report = game.take_turn(Direction::Up);
    assert_eq!(report.event, EnterEvent::Nothing);
    assert_eq!(report.moves_remaining, 7);
}

#[test]
fn key_is_collected_once() {
    let mut game = cave(20);
    for direction in [
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ] {
        game.take_turn(direction);
    }
    assert_eq!(game.player().position(), Position::new(2, 2));
    assert_eq!(game.player().inventory(), &[Entity::Key]);
}

#[test]
fn stock_level_budgets_drive_the_player() {
    let levels = LevelTable::default();
    let config = levels.config_for("game1.txt").unwrap();
    let game = Game::from_layout(CAVE, config).unwrap();
    assert_eq!(game.player().moves_remaining(), 7);
    assert_eq!(game.config().move_bonus, 5);
}

#[test]
fn keyboard_commands_play_a_whole_game() {
    let mut game = cave(10);
    let controls = Controls::default();
    let mut last = None;
    for command in "ssddw".chars().chain(['a']) {
        last = Some(game.command(command, &controls).unwrap());
    }
    // s, s, d (door, locked), d (key), w, a (wall: blocked).
    let report = last.unwrap();
    assert!(report.blocked);
    assert_eq!(report.position, Position::new(1, 2));
    assert_eq!(report.inventory, vec![Entity::Key]);
    assert!(game.command('?', &controls).is_err());
    assert_eq!(game.player().moves_remaining(), 4);
}
