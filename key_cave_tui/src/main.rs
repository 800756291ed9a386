use anyhow::{Context, Result, anyhow};
use clap::Parser;
use key_cave_core::{
    Controls, Direction, Dungeon, EnterEvent, Entity, Game, GameConfig, GameError, GameStatus,
    LevelTable, Position,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout::Direction as LayoutDirection,
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Dungeon layout file to load
    #[arg(short, long, value_name = "MAP_FILE", default_value = "maps/game2.txt")]
    map: PathBuf,

    /// Starting moves, overriding the level table
    #[arg(long, value_name = "MOVES")]
    moves: Option<i32>,

    /// File that receives the log output
    #[arg(long, value_name = "LOG_FILE", default_value = "key_cave.log")]
    log: PathBuf,
}

struct App {
    /// The game engine.
    game: Game,
    /// Keyboard command table.
    controls: Controls,
    /// Level name shown in the status panel.
    level: String,
    /// When the current game started.
    started: Instant,
    /// Frozen play time once the game has ended.
    finished_in: Option<Duration>,
    /// Feedback for the last turn.
    message: String,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(game: Game, level: String) -> Self {
        App {
            game,
            controls: Controls::default(),
            level,
            started: Instant::now(),
            finished_in: None,
            message: String::new(),
            should_quit: false,
        }
    }

    fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Time spent on the current game, stopped once it is over.
    fn elapsed(&self) -> Duration {
        self.finished_in.unwrap_or_else(|| self.started.elapsed())
    }

    /// Routes one key press.
    fn handle_key(&mut self, code: KeyCode) {
        if self.status().is_over() {
            match code {
                KeyCode::Char('y' | 'Y') => self.new_game(),
                KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => self.quit(),
                _ => {}
            }
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Up => self.play(Direction::Up),
            KeyCode::Down => self.play(Direction::Down),
            KeyCode::Left => self.play(Direction::Left),
            KeyCode::Right => self.play(Direction::Right),
            KeyCode::Char(command) => match self.game.command(command, &self.controls) {
                Ok(report) => self.after_turn(report.blocked, report.event),
                Err(GameError::InvalidDirection(command)) => {
                    debug!(%command, "ignoring unbound key");
                }
                Err(err) => self.message = err.to_string(),
            },
            _ => {}
        }
    }

    fn play(&mut self, direction: Direction) {
        let report = self.game.take_turn(direction);
        self.after_turn(report.blocked, report.event);
    }

    fn after_turn(&mut self, blocked: bool, event: EnterEvent) {
        self.message = match event {
            EnterEvent::KeyCollected => "Picked up the key!".to_string(),
            EnterEvent::MovesGained(bonus) => format!("+{bonus} moves"),
            EnterEvent::DoorLocked => "You don't have the key!".to_string(),
            EnterEvent::Won => "The door opens.".to_string(),
            EnterEvent::Nothing if blocked => "Bump.".to_string(),
            EnterEvent::Nothing => String::new(),
        };
        if self.status().is_over() && self.finished_in.is_none() {
            self.finished_in = Some(self.started.elapsed());
        }
    }

    /// Starts the level over and resets the clock.
    fn new_game(&mut self) {
        info!(level = %self.level, "new game");
        self.game.new_game();
        self.started = Instant::now();
        self.finished_in = None;
        self.message.clear();
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    init_logging(&args.log)?;

    let (game, level) = load_game(&args.map, args.moves, &LevelTable::default())?;

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    let mut app = App::new(game, level);
    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal state even if the loop failed
    restore_terminal(&mut terminal)?;

    result
}

/// Sends `tracing` output to `path`, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Reads the layout at `map_file` and sizes the move budget from the level
/// table, keyed by file name, unless `moves` overrides it.
fn load_game(
    map_file: &Path,
    moves: Option<i32>,
    levels: &LevelTable,
) -> Result<(Game, String)> {
    // Ensure the map file exists
    if !map_file.exists() {
        return Err(anyhow!("Map file does not exist: {}", map_file.display()));
    }
    let level = map_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let layout = std::fs::read_to_string(map_file)
        .with_context(|| format!("Failed to read map file {}", map_file.display()))?;
    let dungeon = Dungeon::parse(&layout)
        .with_context(|| format!("Malformed dungeon in {}", map_file.display()))?;

    let move_budget = moves
        .or_else(|| levels.move_budget(&level))
        .ok_or_else(|| anyhow!("No move budget known for level '{level}', pass --moves"))?;
    let config = GameConfig::with_move_budget(move_budget);

    info!(%level, moves = config.move_budget, "loaded dungeon");
    Ok((Game::new(dungeon, config), level))
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Redraw at least once a second for the clock
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Formats a duration as the status bar shows it, e.g. `1m 5s`.
fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    render_map(frame, main_layout[0], &app.game);
    render_status(frame, main_layout[1], app);

    match app.status() {
        GameStatus::Playing => {}
        GameStatus::Won => render_prompt(
            frame,
            "You won!",
            format!(
                "You have finished the level with a score of {}.\nWould you like to play again? (y/n)",
                format_elapsed(app.elapsed())
            ),
        ),
        GameStatus::Lost => render_prompt(
            frame,
            "You lost!",
            "You have run out of moves.\nWould you like to play again? (y/n)".to_string(),
        ),
    }
}

/// Renders the dungeon with the player on top.
fn render_map(frame: &mut Frame, area: Rect, game: &Game) {
    let size = game.dungeon_size();
    let player = game.player().position();
    let mut lines: Vec<Line> = Vec::with_capacity(size);

    for row in 0..size {
        let mut spans: Vec<Span> = Vec::with_capacity(size);
        for col in 0..size {
            let position = Position::new(row, col);
            let span = if position == player {
                Span::styled("@", Style::default().fg(Color::Green).bold())
            } else {
                match game.entity(position) {
                    Some(entity) => {
                        let style = match entity {
                            Entity::Wall => Style::default().fg(Color::DarkGray),
                            Entity::Key => Style::default().fg(Color::Yellow),
                            Entity::MoveBonus { .. } => Style::default().fg(Color::LightRed),
                            Entity::Door => Style::default().fg(Color::Red).bold(),
                        };
                        Span::styled(entity.symbol().to_string(), style)
                    }
                    None => Span::raw(Dungeon::EMPTY_SYMBOL.to_string()),
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Key Cave").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(map_paragraph, area);
}

/// Renders moves left, the clock, the inventory and the last message.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let status_layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let player = app.game.player();
    let inventory = if player.inventory().is_empty() {
        "empty".to_string()
    } else {
        player
            .inventory()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let lines = vec![
        Line::from(format!("Level: {}", app.level)),
        Line::from(format!("Moves left: {}", player.moves_remaining())),
        Line::from(format!("Time elapsed: {}", format_elapsed(app.elapsed()))),
        Line::from(format!("Inventory: {inventory}")),
        Line::from(Span::styled(
            app.message.as_str(),
            Style::default().fg(Color::Cyan),
        )),
    ];
    let status =
        Paragraph::new(lines).block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, status_layout[0]);

    let help_text = Paragraph::new("WASD/arrows move, 'n' new game, 'q' quit.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, status_layout[1]);
}

/// Draws an end-of-game question in a box over the middle of the screen.
fn render_prompt(frame: &mut Frame, title: &str, text: String) {
    let area = centered_rect(frame.area(), 60, 7);
    let prompt = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
