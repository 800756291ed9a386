use serde::{Deserialize, Serialize};

use crate::{Position, game_information::GameInformation, player::Player};

/// Something placed in the dungeon that the player can interact with.
///
/// The set of kinds is closed; each kind's reaction to the player stepping
/// onto it lives in [`Entity::on_enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Wall,
    Key,
    MoveBonus { bonus: i32 },
    Door,
}

/// What happened when the player entered an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnterEvent {
    Nothing,
    KeyCollected,
    MovesGained(i32),
    /// The door was reached without a key.
    DoorLocked,
    Won,
}

/// Mutable view of the game state handed to [`Entity::on_enter`].
#[derive(Debug)]
pub struct EnterContext<'a> {
    pub position: Position,
    pub player: &'a mut Player,
    pub information: &'a mut GameInformation,
    pub won: &'a mut bool,
}

impl Entity {
    pub const WALL_SYMBOL: char = '#';
    pub const KEY_SYMBOL: char = 'K';
    pub const MOVE_BONUS_SYMBOL: char = 'M';
    pub const DOOR_SYMBOL: char = 'D';

    /// Default number of moves granted by a move bonus.
    pub const DEFAULT_MOVE_BONUS: i32 = 5;

    /// Returns the layout character that identifies this kind.
    pub const fn symbol(&self) -> char {
        match self {
            Entity::Wall => Self::WALL_SYMBOL,
            Entity::Key => Self::KEY_SYMBOL,
            Entity::MoveBonus { .. } => Self::MOVE_BONUS_SYMBOL,
            Entity::Door => Self::DOOR_SYMBOL,
        }
    }

    /// Whether the player may move into a cell holding this entity.
    /// Only walls block.
    pub const fn is_passable(&self) -> bool {
        !matches!(self, Entity::Wall)
    }

    /// Alias of [`Entity::is_passable`]: a collidable entity is one the
    /// player can walk onto.
    #[inline]
    pub const fn collidable(&self) -> bool {
        self.is_passable()
    }

    pub const fn is_key(&self) -> bool {
        matches!(self, Entity::Key)
    }

    /// Applies this entity's effect after the player has moved onto it.
    ///
    /// Keys and move bonuses are consumed: they are removed from the game
    /// information so a later visit finds an empty cell. The door only sets
    /// the win flag when the inventory holds a key.
    pub fn on_enter(self, ctx: EnterContext<'_>) -> EnterEvent {
        match self {
            Entity::Wall => EnterEvent::Nothing,
            Entity::Key => {
                ctx.player.add_item(self);
                ctx.information.remove(ctx.position);
                EnterEvent::KeyCollected
            }
            Entity::MoveBonus { bonus } => {
                ctx.player.change_move_count(bonus);
                ctx.information.remove(ctx.position);
                EnterEvent::MovesGained(bonus)
            }
            Entity::Door => {
                if ctx.player.has_key() {
                    *ctx.won = true;
                    EnterEvent::Won
                } else {
                    EnterEvent::DoorLocked
                }
            }
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Wall => write!(f, "Wall"),
            Entity::Key => write!(f, "Key"),
            Entity::MoveBonus { bonus } => write!(f, "MoveBonus(+{bonus})"),
            Entity::Door => write!(f, "Door"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(
        entity: Entity,
        position: Position,
        player: &mut Player,
        information: &mut GameInformation,
        won: &mut bool,
    ) -> EnterEvent {
        entity.on_enter(EnterContext {
            position,
            player,
            information,
            won,
        })
    }

    #[test]
    fn only_walls_block() {
        assert!(!Entity::Wall.is_passable());
        assert!(Entity::Key.is_passable());
        assert!(Entity::Door.is_passable());
        assert!(Entity::MoveBonus { bonus: 5 }.collidable());
    }

    #[test]
    fn key_moves_into_inventory_and_leaves_the_board() {
        let at = Position::new(1, 1);
        let mut information = GameInformation::from_entries([(at, Entity::Key)]);
        let mut player = Player::new(at, 3);
        let mut won = false;

        let event = enter(Entity::Key, at, &mut player, &mut information, &mut won);

        assert_eq!(event, EnterEvent::KeyCollected);
        assert_eq!(player.inventory(), &[Entity::Key]);
        assert!(information.get(at).is_none());
        assert!(!won);
    }

    #[test]
    fn move_bonus_adds_moves() {
        let at = Position::new(0, 2);
        let bonus = Entity::MoveBonus { bonus: 5 };
        let mut information = GameInformation::from_entries([(at, bonus)]);
        let mut player = Player::new(at, 2);
        let mut won = false;

        let event = enter(bonus, at, &mut player, &mut information, &mut won);

        assert_eq!(event, EnterEvent::MovesGained(5));
        assert_eq!(player.moves_remaining(), 7);
        assert!(information.is_empty());
    }

    #[test]
    fn door_needs_a_key() {
        let at = Position::new(2, 1);
        let mut information = GameInformation::from_entries([(at, Entity::Door)]);
        let mut player = Player::new(at, 4);
        let mut won = false;

        let event = enter(Entity::Door, at, &mut player, &mut information, &mut won);
        assert_eq!(event, EnterEvent::DoorLocked);
        assert!(!won);

        player.add_item(Entity::Key);
        let event = enter(Entity::Door, at, &mut player, &mut information, &mut won);
        assert_eq!(event, EnterEvent::Won);
        assert!(won);
        // The door stays on the board.
        assert_eq!(information.get(at), Some(&Entity::Door));
    }
}
