use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Direction, entity::Entity, game::GameError};

/// Per-game parameters handed to the engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Moves the player starts with.
    pub move_budget: i32,
    /// Moves granted by each move bonus on the board.
    pub move_bonus: i32,
}

impl GameConfig {
    pub const DEFAULT_MOVE_BUDGET: i32 = 12;

    pub fn new() -> Self {
        Self {
            move_budget: Self::DEFAULT_MOVE_BUDGET,
            move_bonus: Entity::DEFAULT_MOVE_BONUS,
        }
    }

    pub fn with_move_budget(move_budget: i32) -> Self {
        Self {
            move_budget,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initial move allowance for each named level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: BTreeMap<String, i32>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) a level's move budget.
    pub fn insert(&mut self, level: impl Into<String>, move_budget: i32) -> Option<i32> {
        self.levels.insert(level.into(), move_budget)
    }

    pub fn move_budget(&self, level: &str) -> Option<i32> {
        self.levels.get(level).copied()
    }

    /// Builds the engine configuration for `level`, or `None` if the level
    /// is unknown.
    pub fn config_for(&self, level: &str) -> Option<GameConfig> {
        self.move_budget(level).map(GameConfig::with_move_budget)
    }

    pub fn levels(&self) -> impl Iterator<Item = (&str, i32)> {
        self.levels.iter().map(|(name, budget)| (name.as_str(), *budget))
    }
}

impl Default for LevelTable {
    /// The three stock levels.
    fn default() -> Self {
        let mut table = Self::new();
        table.insert("game1.txt", 7);
        table.insert("game2.txt", 12);
        table.insert("game3.txt", 19);
        table
    }
}

/// Maps single-character commands to directions.
///
/// Lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    bindings: HashMap<char, Direction>,
}

impl Controls {
    pub fn new(bindings: impl IntoIterator<Item = (char, Direction)>) -> Self {
        Self {
            bindings: bindings
                .into_iter()
                .map(|(command, direction)| (command.to_ascii_uppercase(), direction))
                .collect(),
        }
    }

    /// Resolves a command, failing with [`GameError::InvalidDirection`] for
    /// anything unbound.
    pub fn direction(&self, command: char) -> Result<Direction, GameError> {
        self.bindings
            .get(&command.to_ascii_uppercase())
            .copied()
            .ok_or(GameError::InvalidDirection(command))
    }
}

impl Default for Controls {
    /// W/A/S/D.
    fn default() -> Self {
        Self::new([
            ('W', Direction::Up),
            ('S', Direction::Down),
            ('A', Direction::Left),
            ('D', Direction::Right),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_levels() {
        let table = LevelTable::default();
        assert_eq!(table.move_budget("game1.txt"), Some(7));
        assert_eq!(table.move_budget("game2.txt"), Some(12));
        assert_eq!(table.move_budget("game3.txt"), Some(19));
        assert_eq!(table.move_budget("game4.txt"), None);
        assert_eq!(
            table.config_for("game3.txt"),
            Some(GameConfig {
                move_budget: 19,
                move_bonus: 5
            })
        );
        assert_eq!(table.levels().count(), 3);
    }

    #[test]
    fn custom_levels() {
        let mut table = LevelTable::new();
        assert_eq!(table.insert("tiny", 1), None);
        assert_eq!(table.insert("tiny", 2), Some(1));
        assert_eq!(table.move_budget("tiny"), Some(2));
    }

    #[test]
    fn wasd_bindings() {
        let controls = Controls::default();
        assert_eq!(controls.direction('w'), Ok(Direction::Up));
        assert_eq!(controls.direction('S'), Ok(Direction::Down));
        assert_eq!(controls.direction('a'), Ok(Direction::Left));
        assert_eq!(controls.direction('D'), Ok(Direction::Right));
        assert_eq!(
            controls.direction('x'),
            Err(GameError::InvalidDirection('x'))
        );
    }
}
