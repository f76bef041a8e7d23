use std::{
    collections::VecDeque,
    io::{self, Write},
    num::NonZeroU8,
    sync::mpsc,
    time::{Duration, Instant},
};

use crossterm::{cursor, event::Event, style, terminal, ExecutableCommand};
use tetwist_engine::{
    Cell, ConfigurationError, FeedbackVerbosity, Game, GameBuilder, Notification, ShapeGenerator,
    TileTypeID,
};

use crate::{
    game_renderer,
    keybinds_presets::Keybinds,
    live_input_handler::{self, LiveTermSignal},
};

pub const GARBAGE_TILE: TileTypeID = NonZeroU8::MAX;

pub struct Application<T: Write> {
    term: T,
    game: Game,
    keybinds: Keybinds,
    tick_interval: Duration,
    debug_log: VecDeque<String>,
}

impl<T: Write> Drop for Application<T> {
    fn drop(&mut self) {
        // (Try to) undo terminal setup.
        let _ = terminal::disable_raw_mode();
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);
    }
}

impl<T: Write> Application<T> {
    pub const TICK_INTERVAL_LEVEL_ONE: Duration = Duration::from_millis(600);
    pub const DEBUG_LOG_LENGTH: usize = 8;

    /// Builds the game before touching the terminal, so configuration errors print normally.
    pub fn new(
        mut term: T,
        seed: Option<u64>,
        board: Option<String>,
        debug: bool,
        bag: bool,
        keybinds: Keybinds,
    ) -> Result<Self, ConfigurationError> {
        let game = game_builder(seed, board.as_deref(), debug, bag).build()?;

        let _v = term.execute(terminal::EnterAlternateScreen);
        let _v = term.execute(terminal::SetTitle(clap::crate_name!()));
        let _v = term.execute(cursor::Hide);
        let _v = terminal::enable_raw_mode();

        Ok(Self {
            term,
            game,
            keybinds,
            tick_interval: Self::TICK_INTERVAL_LEVEL_ONE,
            debug_log: VecDeque::new(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        let (input_sender, input_receiver) = mpsc::channel();
        let _join_handle = live_input_handler::spawn(input_sender, self.keybinds.clone());

        self.game.begin_game();
        self.handle_notifications();
        game_renderer::render(&mut self.term, &self.game, &self.keybinds, &self.debug_log)?;

        let mut time_next_tick = Instant::now() + self.tick_interval;
        loop {
            let tick_budget_remaining = time_next_tick.saturating_duration_since(Instant::now());
            match input_receiver.recv_timeout(tick_budget_remaining) {
                Ok(LiveTermSignal::RecognizedCommand(command)) => self.game.execute(command),
                Ok(LiveTermSignal::Forfeit) => self.game.forfeit(),
                Ok(LiveTermSignal::Quit) => break,
                Ok(LiveTermSignal::RawEvent(Event::Resize(..))) => {}
                Ok(LiveTermSignal::RawEvent(_)) => continue,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    self.game.let_shape_fall();
                    time_next_tick = Instant::now() + self.tick_interval;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            // A fresh shape gets a full tick, at the speed of the current level.
            if self.handle_notifications() {
                time_next_tick = Instant::now() + self.tick_interval;
            }
            game_renderer::render(&mut self.term, &self.game, &self.keybinds, &self.debug_log)?;
        }

        Ok(())
    }

    fn handle_notifications(&mut self) -> bool {
        handle_notifications(&mut self.game, &mut self.tick_interval, &mut self.debug_log)
    }
}

/// Sets up a game from the commandline options.
pub fn game_builder(seed: Option<u64>, board: Option<&str>, debug: bool, bag: bool) -> GameBuilder {
    let mut builder = Game::builder();
    if let Some(seed) = seed {
        builder.seed(seed);
    }
    if let Some(board) = board {
        let (width, height) = (builder.config.width, builder.config.height);
        builder.initial_board(decode_board(board, width, height, GARBAGE_TILE));
    }
    if debug {
        builder.feedback_verbosity(FeedbackVerbosity::Debug);
    }
    if bag {
        builder.shape_generator(ShapeGenerator::bag());
    }
    builder
}

/// Reacts to everything the game reported, including what the reactions themselves cause.
///
/// Returns whether a new shape started falling.
pub fn handle_notifications(
    game: &mut Game,
    tick_interval: &mut Duration,
    debug_log: &mut VecDeque<String>,
) -> bool {
    let mut spawned = false;
    let mut pending = game.take_notifications();
    while !pending.is_empty() {
        for notification in pending {
            match notification {
                Notification::GameBegan => {
                    *tick_interval = Application::<io::Sink>::TICK_INTERVAL_LEVEL_ONE;
                    spawned |= game.new_shape().is_some();
                }
                Notification::ShapeMoved { .. } => {}
                Notification::ShapeDropped { .. } => game.let_shape_fall(),
                Notification::ShapeLanded { .. } => {
                    while !game.remove_completed_lines().is_empty() {}
                    spawned |= game.new_shape().is_some();
                }
                Notification::LevelUp { .. } => {
                    *tick_interval = next_tick_interval(*tick_interval);
                }
                Notification::GameEnded { .. } => {
                    game.remove_all_blocks();
                    game.begin_game();
                }
                Notification::Debug(msg) => {
                    if debug_log.len() == Application::<io::Sink>::DEBUG_LOG_LENGTH {
                        debug_log.pop_back();
                    }
                    debug_log.push_front(msg);
                }
            }
        }
        pending = game.take_notifications();
    }
    spawned
}

/// Gravity speeds up by 100ms per level, then by 50ms, and never beyond 50ms.
pub fn next_tick_interval(current: Duration) -> Duration {
    let millis = current.as_millis();
    if millis >= 200 {
        current - Duration::from_millis(100)
    } else if millis > 50 {
        current
            .saturating_sub(Duration::from_millis(50))
            .max(Duration::from_millis(50))
    } else {
        current
    }
}

/// Decodes a starting board: any character but a space is a filled cell, newlines are ignored.
///
/// The last character is the bottom right cell; earlier characters fill rows towards the top.
pub fn decode_board(board_str: &str, width: usize, height: usize, tile: TileTypeID) -> Vec<Cell> {
    let tiles = board_str.chars().filter(|&c| c != '\n').collect::<Vec<_>>();
    let n = tiles.len();
    tiles
        .into_iter()
        .enumerate()
        .filter(|&(_, c)| c != ' ')
        .map(|(i, _)| {
            let from_end = n - 1 - i;
            let column = width as i64 - 1 - (from_end % width.max(1)) as i64;
            let row = height as i64 - 1 - (from_end / width.max(1)) as i64;
            Cell::new(
                i32::try_from(column).unwrap_or(i32::MIN),
                i32::try_from(row).unwrap_or(i32::MIN),
                tile,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_interval_schedule() {
        let mut interval = Application::<Vec<u8>>::TICK_INTERVAL_LEVEL_ONE;
        let mut schedule = vec![interval.as_millis()];
        for _ in 0..8 {
            interval = next_tick_interval(interval);
            schedule.push(interval.as_millis());
        }
        assert_eq!(schedule, vec![600, 500, 400, 300, 200, 100, 50, 50, 50]);
    }

    #[test]
    fn board_is_aligned_to_bottom_right() {
        let tile = GARBAGE_TILE;
        let cells = decode_board("X  X\nXXX ", 4, 5, tile);
        let positions = cells
            .iter()
            .map(|cell| (cell.column, cell.row))
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![(0, 3), (3, 3), (0, 4), (1, 4), (2, 4)]);
        assert!(cells.iter().all(|cell| cell.tile == tile));
    }

    #[test]
    fn partial_row_fills_from_the_right() {
        let cells = decode_board("XX", 10, 20, GARBAGE_TILE);
        let positions = cells
            .iter()
            .map(|cell| (cell.column, cell.row))
            .collect::<Vec<_>>();
        assert_eq!(positions, vec![(8, 19), (9, 19)]);
    }

    #[test]
    fn oversized_board_is_rejected_by_builder() {
        let board = "X".repeat(10 * 20 + 1);
        let err = Application::new(Vec::new(), Some(1), Some(board), false, false, Keybinds::new())
            .map(|_| ())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InitialBoardOutOfBounds { column: 9, row: -1 }
        );
    }

    #[test]
    fn landing_respawns_and_reports_it() {
        let mut game = game_builder(Some(4), None, false, false).build().unwrap();
        let mut tick_interval = Duration::from_millis(300);
        let mut debug_log = VecDeque::new();

        game.begin_game();
        assert!(handle_notifications(&mut game, &mut tick_interval, &mut debug_log));
        assert_eq!(tick_interval, Application::<Vec<u8>>::TICK_INTERVAL_LEVEL_ONE);
        assert!(game.move_shape_right());
        assert!(!handle_notifications(&mut game, &mut tick_interval, &mut debug_log));

        game.drop_shape();
        assert!(handle_notifications(&mut game, &mut tick_interval, &mut debug_log));
        let second = *game.falling_shape().unwrap();
        assert_eq!((second.column(), second.row()), (4, 0));
        assert_eq!(game.grid().cells().count(), 4);
    }

    #[test]
    fn bag_flag_selects_bag_generator() {
        let builder = game_builder(Some(1), Some("XX"), true, true);
        assert_eq!(builder.config.shape_generator, ShapeGenerator::bag());
        assert_eq!(builder.config.feedback_verbosity, FeedbackVerbosity::Debug);
        assert_eq!(builder.initial_board.len(), 2);
        let plain = game_builder(None, None, false, false);
        assert_eq!(plain.config.shape_generator, ShapeGenerator::Uniform);
        assert!(plain.seed.is_none());
    }
}
