use serde::{Deserialize, Serialize};

pub mod config;
pub mod dungeon;
pub mod entity;
pub mod game;
pub mod game_information;
pub mod map;
pub mod player;

pub use config::{Controls, GameConfig, LevelTable};
pub use dungeon::{Dungeon, LayoutError};
pub use entity::{EnterEvent, Entity};
pub use game::{Game, GameError, GameStatus, TurnReport};
pub use game_information::GameInformation;
pub use map::{Grid, GridError};
pub use player::Player;

/// Represents a cell coordinate as (row, col), row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// The neighbouring cell in `direction`.
    ///
    /// Stepping past row or column zero wraps to `usize::MAX`, which lies
    /// outside every grid.
    pub fn step(self, direction: Direction) -> Position {
        let (d_row, d_col) = direction.delta();
        Position {
            row: self.row.wrapping_add_signed(d_row),
            col: self.col.wrapping_add_signed(d_col),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four directions a turn can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the (row, col) delta for this direction.
    #[inline]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let cell = Position::new(1, 1);
        assert_eq!(cell.step(Direction::Up), Position::new(0, 1));
        assert_eq!(cell.step(Direction::Down), Position::new(2, 1));
        assert_eq!(cell.step(Direction::Left), Position::new(1, 0));
        assert_eq!(cell.step(Direction::Right), Position::new(1, 2));
        assert_eq!(Position::new(0, 0).step(Direction::Up).row, usize::MAX);
    }

    #[test]
    fn deltas_are_unit_steps() {
        for direction in Direction::ALL {
            let (d_row, d_col) = direction.delta();
            assert_eq!(d_row.abs() + d_col.abs(), 1);
            let (o_row, o_col) = direction.opposite().delta();
            assert_eq!((d_row + o_row, d_col + o_col), (0, 0));
        }
    }
}
