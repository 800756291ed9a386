use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Direction, Position,
    config::{Controls, GameConfig},
    dungeon::{Dungeon, LayoutError},
    entity::{EnterContext, EnterEvent, Entity},
    game_information::GameInformation,
    map::GridError,
    player::Player,
};

/// Errors surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Unknown direction command '{0}'.")]
    InvalidDirection(char),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Overall outcome of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Everything a front end needs to redraw after one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub direction: Direction,
    pub position: Position,
    /// The move was refused: off the grid or into a wall.
    pub blocked: bool,
    pub event: EnterEvent,
    pub moves_remaining: i32,
    pub inventory: Vec<Entity>,
    pub won: bool,
    pub game_over: bool,
}

impl TurnReport {
    /// Win takes precedence over running out of moves.
    pub fn status(&self) -> GameStatus {
        classify(self.won, self.game_over)
    }
}

fn classify(won: bool, game_over: bool) -> GameStatus {
    if won {
        GameStatus::Won
    } else if game_over {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

/// The turn-based game engine.
///
/// Owns the dungeon, the board contents and the player. One call to
/// [`Game::take_turn`] resolves one directional command completely.
#[derive(Debug, Clone)]
pub struct Game {
    dungeon: Dungeon,
    config: GameConfig,
    information: GameInformation,
    player: Player,
    won: bool,
}

impl Game {
    /// Starts a game on `dungeon`, placing the player on the start cell with
    /// `config.move_budget` moves.
    pub fn new(dungeon: Dungeon, config: GameConfig) -> Self {
        let information = GameInformation::from_dungeon(&dungeon, config.move_bonus);
        let player = Player::new(dungeon.player_start(), config.move_budget);
        info!(
            size = dungeon.size(),
            moves = config.move_budget,
            "starting game"
        );
        Game {
            dungeon,
            config,
            information,
            player,
            won: false,
        }
    }

    /// Parses `layout` and starts a game on it.
    pub fn from_layout(layout: &str, config: GameConfig) -> Result<Self, GameError> {
        let dungeon = Dungeon::parse(layout)?;
        Ok(Self::new(dungeon, config))
    }

    /// Throws away all progress and starts over on the same dungeon and
    /// configuration.
    pub fn new_game(&mut self) {
        *self = Game::new(self.dungeon.clone(), self.config);
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn game_information(&self) -> &GameInformation {
        &self.information
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dungeon_size(&self) -> usize {
        self.dungeon.size()
    }

    pub fn entity(&self, position: Position) -> Option<&Entity> {
        self.information.get(position)
    }

    /// The on-grid cell next to the player in `direction`.
    pub fn target(&self, direction: Direction) -> Option<Position> {
        let target = self.player.position().step(direction);
        self.dungeon.contains(target).then_some(target)
    }

    pub fn entity_in_direction(&self, direction: Direction) -> Option<&Entity> {
        self.entity(self.target(direction)?)
    }

    /// Returns `true` when a move in `direction` is blocked, either by the
    /// grid edge or by an impassable entity.
    pub fn collision_check(&self, direction: Direction) -> bool {
        self.open_target(direction).is_none()
    }

    fn open_target(&self, direction: Direction) -> Option<Position> {
        self.target(direction).filter(|target| {
            self.entity(*target).is_none_or(Entity::is_passable)
        })
    }

    /// Moves the player one cell without any other turn processing.
    ///
    /// Fails with [`GridError::OutOfBounds`] rather than leaving the grid;
    /// callers are expected to run [`Game::collision_check`] first.
    pub fn move_player(&mut self, direction: Direction) -> Result<Position, GameError> {
        let target = self.player.position().step(direction);
        self.dungeon.check(target)?;
        self.player.set_position(target);
        Ok(target)
    }

    /// Resolves one turn.
    ///
    /// A blocked move leaves the player in place. Either way the turn costs
    /// one move, charged after the entered entity has had its effect.
    pub fn take_turn(&mut self, direction: Direction) -> TurnReport {
        let target = self.open_target(direction);
        let event = match target {
            Some(position) => {
                self.player.set_position(position);
                self.trigger(position)
            }
            None => EnterEvent::Nothing,
        };
        self.player.change_move_count(-1);

        let report = TurnReport {
            direction,
            position: self.player.position(),
            blocked: target.is_none(),
            event,
            moves_remaining: self.player.moves_remaining(),
            inventory: self.player.inventory().to_vec(),
            won: self.won,
            game_over: self.check_game_over(),
        };
        debug!(
            ?direction,
            position = %report.position,
            blocked = report.blocked,
            ?event,
            moves = report.moves_remaining,
            "turn resolved"
        );
        match report.status() {
            GameStatus::Won if event == EnterEvent::Won => {
                info!("door opened with the key, game won")
            }
            GameStatus::Lost => {
                info!(moves = report.moves_remaining, "out of moves, game lost")
            }
            _ => {}
        }
        report
    }

    /// Resolves a raw command through `controls`, then plays the turn.
    ///
    /// An unknown command fails before anything is mutated.
    pub fn command(
        &mut self,
        command: char,
        controls: &Controls,
    ) -> Result<TurnReport, GameError> {
        let direction = controls.direction(command)?;
        Ok(self.take_turn(direction))
    }

    fn trigger(&mut self, position: Position) -> EnterEvent {
        let Some(entity) = self.information.get(position).copied() else {
            return EnterEvent::Nothing;
        };
        entity.on_enter(EnterContext {
            position,
            player: &mut self.player,
            information: &mut self.information,
            won: &mut self.won,
        })
    }

    /// True once the player has no moves left.
    pub fn check_game_over(&self) -> bool {
        self.player.moves_remaining() <= 0
    }

    pub fn won(&self) -> bool {
        self.won
    }

    /// Sets the win flag. Once won, the flag stays set until
    /// [`Game::new_game`].
    pub fn set_win(&mut self, win: bool) {
        if self.won && !win {
            warn!("ignoring request to clear the win flag");
            return;
        }
        self.won = win;
    }

    pub fn status(&self) -> GameStatus {
        classify(self.won, self.check_game_over())
    }
}
