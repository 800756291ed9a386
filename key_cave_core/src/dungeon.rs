use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Position,
    entity::Entity,
    map::{Grid, GridError},
};

/// Errors raised while turning a character layout into a [`Dungeon`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Layout is empty.")]
    Empty,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Layout must be square, found {rows} rows of width {cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("No '{symbol}' found in layout.")]
    MissingSymbol { symbol: char },
    #[error("Symbol '{symbol}' must occur exactly once, found {count}")]
    DuplicateSymbol { symbol: char, count: usize },
}

/// The static layout of a level.
///
/// A square character matrix over `#` (wall), `K` (key), `M` (move bonus),
/// `D` (door), `O` (player start); any other character is an empty cell.
/// The player start, key and door each appear exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    cells: Grid<char>,
    player_start: Position,
    key: Position,
    door: Position,
}

impl Dungeon {
    pub const PLAYER_SYMBOL: char = 'O';
    pub const EMPTY_SYMBOL: char = '.';

    /// Parses a layout given as newline-separated rows.
    ///
    /// Surrounding whitespace is stripped from every row and blank rows are
    /// skipped.
    pub fn parse(layout: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_rows(&rows)
    }

    /// Builds a dungeon from its rows, validating shape and the unique
    /// symbols.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let matrix: Vec<Vec<char>> = rows
            .iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        let Some(first) = matrix.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.len();
        if width == 0 {
            return Err(LayoutError::Empty);
        }
        if let Some((row, found)) = matrix
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(LayoutError::InconsistentWidth {
                row,
                expected: width,
                found,
            });
        }
        if matrix.len() != width {
            return Err(LayoutError::NotSquare {
                rows: matrix.len(),
                cols: width,
            });
        }

        let cells = Grid::from_rows(matrix).ok_or(LayoutError::Empty)?;
        let exactly_one = |symbol: char| -> Result<Position, LayoutError> {
            let found = positions_in(&cells, symbol);
            match found.as_slice() {
                [] => Err(LayoutError::MissingSymbol { symbol }),
                [position] => Ok(*position),
                _ => Err(LayoutError::DuplicateSymbol {
                    symbol,
                    count: found.len(),
                }),
            }
        };
        let player_start = exactly_one(Self::PLAYER_SYMBOL)?;
        let key = exactly_one(Entity::KEY_SYMBOL)?;
        let door = exactly_one(Entity::DOOR_SYMBOL)?;

        debug!(size = width, %player_start, %key, %door, "parsed dungeon layout");

        Ok(Dungeon {
            cells,
            player_start,
            key,
            door,
        })
    }

    /// Number of rows (and columns) of the layout.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.rows()
    }

    /// Every occurrence of `symbol`, scanning row-major.
    pub fn positions_of(&self, symbol: char) -> Vec<Position> {
        positions_in(&self.cells, symbol)
    }

    /// The layout character at `position`, or `None` off-grid.
    pub fn symbol_at(&self, position: Position) -> Option<char> {
        self.cells.get(position).copied()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.is_valid(position)
    }

    /// Fails with [`GridError::OutOfBounds`] for positions off the layout.
    pub fn check(&self, position: Position) -> Result<(), GridError> {
        self.cells.check(position)
    }

    pub fn player_start(&self) -> Position {
        self.player_start
    }

    pub fn key_position(&self) -> Position {
        self.key
    }

    pub fn door_position(&self) -> Position {
        self.door
    }

    pub fn wall_positions(&self) -> Vec<Position> {
        self.positions_of(Entity::WALL_SYMBOL)
    }

    pub fn move_bonus_positions(&self) -> Vec<Position> {
        self.positions_of(Entity::MOVE_BONUS_SYMBOL)
    }
}

impl FromStr for Dungeon {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dungeon::parse(s)
    }
}

fn positions_in(cells: &Grid<char>, symbol: char) -> Vec<Position> {
    cells
        .enumerate()
        .filter_map(|(position, cell)| (*cell == symbol).then_some(position))
        .collect()
}
