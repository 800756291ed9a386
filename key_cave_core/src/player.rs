use serde::{Deserialize, Serialize};

use crate::{Position, entity::Entity};

/// The player's mutable state.
///
/// No validation happens here; the engine checks bounds and legality
/// before calling into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    move_count: i32,
    inventory: Vec<Entity>,
}

impl Player {
    pub fn new(position: Position, move_count: i32) -> Self {
        Player {
            position,
            move_count,
            inventory: Vec::new(),
        }
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Adds `delta` to the remaining move count. The result may drop to zero
    /// or below.
    pub fn change_move_count(&mut self, delta: i32) {
        self.move_count = self.move_count.saturating_add(delta);
    }

    pub fn moves_remaining(&self) -> i32 {
        self.move_count
    }

    pub fn add_item(&mut self, item: Entity) {
        self.inventory.push(item);
    }

    /// Collected items in pickup order.
    pub fn inventory(&self) -> &[Entity] {
        &self.inventory
    }

    pub fn has_key(&self) -> bool {
        self.inventory.iter().any(Entity::is_key)
    }
}
