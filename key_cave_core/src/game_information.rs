use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Position, dungeon::Dungeon, entity::Entity};

/// What currently occupies each cell of the board.
///
/// Built once from a [`Dungeon`]; afterwards entries are only ever removed,
/// when a key or move bonus is consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInformation {
    entities: HashMap<Position, Entity>,
}

impl GameInformation {
    /// Places the dungeon's key, door, walls and move bonuses. Each move
    /// bonus carries `move_bonus` moves.
    pub fn from_dungeon(dungeon: &Dungeon, move_bonus: i32) -> Self {
        let mut entities = HashMap::new();
        entities.insert(dungeon.key_position(), Entity::Key);
        entities.insert(dungeon.door_position(), Entity::Door);
        for wall in dungeon.wall_positions() {
            entities.insert(wall, Entity::Wall);
        }
        for bonus in dungeon.move_bonus_positions() {
            entities.insert(bonus, Entity::MoveBonus { bonus: move_bonus });
        }
        GameInformation { entities }
    }

    /// Builds a board from explicit placements.
    pub fn from_entries(entries: impl IntoIterator<Item = (Position, Entity)>) -> Self {
        GameInformation {
            entities: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, position: Position) -> Option<&Entity> {
        self.entities.get(&position)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.entities.contains_key(&position)
    }

    /// Removes and returns the entity at `position`, if any.
    pub fn remove(&mut self, position: Position) -> Option<Entity> {
        self.entities.remove(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Entity)> {
        self.entities.iter().map(|(position, entity)| (*position, entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_the_dungeon() {
        let dungeon = Dungeon::parse("O#M\n.#.\n.DK").unwrap();
        let information = GameInformation::from_dungeon(&dungeon, 5);

        assert_eq!(information.len(), 5);
        assert_eq!(information.get(Position::new(0, 1)), Some(&Entity::Wall));
        assert_eq!(information.get(Position::new(1, 1)), Some(&Entity::Wall));
        assert_eq!(
            information.get(Position::new(0, 2)),
            Some(&Entity::MoveBonus { bonus: 5 })
        );
        assert_eq!(information.get(Position::new(2, 1)), Some(&Entity::Door));
        assert_eq!(information.get(Position::new(2, 2)), Some(&Entity::Key));
        // The start cell is not an entity.
        assert!(!information.contains(Position::new(0, 0)));
    }

    #[test]
    fn remove_is_one_shot() {
        let at = Position::new(0, 0);
        let mut information = GameInformation::from_entries([(at, Entity::Key)]);
        assert_eq!(information.remove(at), Some(Entity::Key));
        assert_eq!(information.remove(at), None);
        assert!(information.is_empty());
    }
}
