/*!
# Tetwist Engine

`tetwist_engine` is the game-state engine of a falling-block puzzle: it owns the grid, spawns
and moves shapes through it, settles landed shapes, clears completed rows and keeps score.

Drawing, input and tick timing are left to whoever drives the engine. A driver issues
discrete commands and reacts to the [`Notification`]s the engine queues up in return.

# Examples

```
use tetwist_engine::*;

// Setting up a game - the builder validates the configuration.
let mut game = Game::builder()
    .seed(42)
    /* ...Further optional configuration possible... */
    .build()
    .unwrap();

// Start a round and bring the first shape into play.
game.begin_game();
game.new_shape();

// Player and timer commands.
game.move_shape_left();
game.rotate_shape();
game.let_shape_fall();

// Read what happened; this is how a driver knows what to redraw or do next.
for notification in game.take_notifications() {
    if let Notification::ShapeLanded { .. } = notification {
        let line_clears = game.remove_completed_lines();
        assert!(line_clears.is_empty());
    }
}
```
*/

#![warn(missing_docs)]

mod game_builder;
mod game_update;
pub mod grid;
mod line_clears;
pub mod shape;
pub mod shape_generator;

use std::{fmt, num::NonZeroU8};

use rand_chacha::ChaCha12Rng;

pub use game_builder::GameBuilder;
pub use grid::Grid;
pub use line_clears::LineClears;
pub use shape::Shape;
pub use shape_generator::ShapeGenerator;

/// Abstract identifier for which type of tile occupies a cell in the grid.
pub type TileTypeID = NonZeroU8;
/// Offsets `(columns, rows)` relative to a shape's anchor; rows grow downwards.
pub type Offset = (i32, i32);
/// The internal RNG used by a game.
pub type GameRng = ChaCha12Rng;

/// Represents one of the seven kinds of shape that can be in play.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// Four squares connected as one big square; `██`.
    O = 0,
    /// Four squares connected as one straight line; `▀▀▀▀`.
    I,
    /// Four squares connected in an 'S'-snaking manner; `▄█▀`.
    S,
    /// Four squares connected in a 'Z'-snaking manner; `▀█▄`.
    Z,
    /// Four squares connected in a 'T'-junction shape; `▀█▀`.
    T,
    /// Four squares connected in an 'L'-shape.
    L,
    /// Four squares connected in a 'J'-shape.
    J,
}

/// A single occupied position of the grid.
///
/// While a shape falls its cells are computed from the shape; once settled, the cell is owned by
/// the [`Grid`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Horizontal position, `0` being the leftmost column.
    pub column: i32,
    /// Vertical position, `0` being the topmost row.
    pub row: i32,
    /// What the cell should look like. The engine never inspects this.
    pub tile: TileTypeID,
}

/// The amount of notifications that are to be generated.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedbackVerbosity {
    /// No notifications at all; the driver is expected to poll the game state.
    Silent,
    /// The lifecycle notifications.
    #[default]
    Default,
    /// Lifecycle notifications plus a [`Notification::Debug`] message for every command processed
    /// and every transform that was rolled back.
    Debug,
}

/// Configuration options of the game, fixed once the [`Game`] is built.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// Number of columns of the grid.
    pub width: usize,
    /// Number of rows of the grid.
    pub height: usize,
    /// Column a shape's anchor is put at when it starts falling.
    pub spawn_column: i32,
    /// Row a shape's anchor is put at when it starts falling.
    pub spawn_row: i32,
    /// Column of the anchor of the previewed next shape (usually outside the grid).
    pub preview_column: i32,
    /// Row of the anchor of the previewed next shape.
    pub preview_row: i32,
    /// Points awarded per cleared line, before multiplying by the level.
    pub points_per_line: u32,
    /// A level is gained once the score reaches `level * level_threshold`.
    pub level_threshold: u32,
    /// The method of shape generation used.
    pub shape_generator: ShapeGenerator,
    /// The amount of notifications that is to be generated.
    pub feedback_verbosity: FeedbackVerbosity,
}

/// Represents how a round of the game ended.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOver {
    /// A new shape could not be spawned because its spawn position was already blocked.
    BlockOut,
    /// The falling shape was found in an illegal position even before moving down.
    StuckFall,
    /// The round was ended from outside, c.f. [`Game::forfeit`].
    Forfeit,
}

/// The phase the game state machine is in.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No shape is falling; between rounds, or between a settle and the next spawn.
    Idle,
    /// A shape is in play and can be controlled.
    Falling,
    /// The round ended. The driver is expected to clear the grid and begin a new round.
    GameOver {
        /// How the round ended.
        cause: GameOver,
    },
}

/// A discrete command a driver can issue, c.f. [`Game::execute`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Let the falling shape fall by one row (gravity tick).
    Fall,
    /// Rotate the falling shape by +90° (clockwise).
    RotateClockwise,
    /// Rotate the falling shape by -90° (counter-clockwise).
    RotateCounterClockwise,
    /// Shift the falling shape one column to the left.
    MoveLeft,
    /// Shift the falling shape one column to the right.
    MoveRight,
    /// Drop the falling shape all the way down.
    Drop,
}

/// The events a game reports back to its driver, in the order they happened.
///
/// Notifications are queued inside the [`Game`] and read with [`Game::take_notifications`].
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// A new round started and the next shape is ready to be spawned.
    GameBegan,
    /// The round ended.
    GameEnded {
        /// How the round ended.
        cause: GameOver,
        /// The score reached before it was reset.
        final_score: u32,
    },
    /// The falling shape was settled into the grid.
    ShapeLanded {
        /// The shape as it was settled.
        shape: Shape,
    },
    /// The falling shape fell, shifted or rotated successfully.
    ShapeMoved {
        /// The shape at its new position.
        shape: Shape,
    },
    /// The falling shape was dropped down as far as it goes.
    ShapeDropped {
        /// The shape before the drop.
        from: Shape,
        /// The shape after the drop.
        to: Shape,
    },
    /// The score crossed the threshold for the next level.
    LevelUp {
        /// The newly reached level.
        level: u32,
    },
    /// Diagnostic message, only generated with [`FeedbackVerbosity::Debug`].
    Debug(String),
}

/// An error that can be returned by [`GameBuilder::build`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum ConfigurationError {
    /// The grid was configured with zero columns.
    ZeroWidth,
    /// The grid was configured with zero rows.
    ZeroHeight,
    /// A cell of the initial board lies outside the grid.
    InitialBoardOutOfBounds {
        /// Column of the offending cell.
        column: i32,
        /// Row of the offending cell.
        row: i32,
    },
}

/// Main game struct representing the engine and its rounds of play.
#[derive(Clone, Debug)]
pub struct Game {
    config: Configuration,
    seed: u64,
    rng: GameRng,
    shape_generator: ShapeGenerator,
    grid: Grid,
    falling_shape: Option<Shape>,
    next_shape: Option<Shape>,
    score: u32,
    level: u32,
    lines_cleared: u32,
    phase: Phase,
    notifications: Vec<Notification>,
}

impl ShapeKind {
    /// All `ShapeKind` enum variants in order.
    ///
    /// Note that `ShapeKind::VARIANTS[k as usize] == k` always holds.
    pub const VARIANTS: [Self; 7] = {
        use ShapeKind::*;
        [O, I, S, Z, T, L, J]
    };

    /// How many distinct orientations the shape has; rotation indices wrap modulo this.
    pub const fn orientations(&self) -> usize {
        match self {
            ShapeKind::O => 1,
            ShapeKind::I | ShapeKind::S | ShapeKind::Z => 2,
            ShapeKind::T | ShapeKind::L | ShapeKind::J => 4,
        }
    }

    /// Returns the cell offsets of the shape relative to its anchor, given a rotation index.
    ///
    /// Successive indices are successive clockwise quarter turns.
    pub const fn offsets(&self, rotation: usize) -> [Offset; 4] {
        let rotation = rotation % self.orientations();
        match self {
            ShapeKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            ShapeKind::I => match rotation {
                0 => [(0, 0), (1, 0), (2, 0), (3, 0)],
                _ => [(1, 0), (1, 1), (1, 2), (1, 3)],
            },
            ShapeKind::S => match rotation {
                0 => [(1, 0), (2, 0), (0, 1), (1, 1)],
                _ => [(0, 0), (0, 1), (1, 1), (1, 2)],
            },
            ShapeKind::Z => match rotation {
                0 => [(0, 0), (1, 0), (1, 1), (2, 1)],
                _ => [(1, 0), (0, 1), (1, 1), (0, 2)],
            },
            ShapeKind::T => match rotation {
                0 => [(0, 0), (1, 0), (2, 0), (1, 1)],
                1 => [(1, 0), (0, 1), (1, 1), (1, 2)],
                2 => [(1, 0), (0, 1), (1, 1), (2, 1)],
                _ => [(0, 0), (0, 1), (1, 1), (0, 2)],
            },
            ShapeKind::L => match rotation {
                0 => [(0, 0), (0, 1), (0, 2), (1, 2)],
                1 => [(0, 0), (1, 0), (2, 0), (0, 1)],
                2 => [(0, 0), (1, 0), (1, 1), (1, 2)],
                _ => [(2, 0), (0, 1), (1, 1), (2, 1)],
            },
            ShapeKind::J => match rotation {
                0 => [(1, 0), (1, 1), (0, 2), (1, 2)],
                1 => [(0, 0), (0, 1), (1, 1), (2, 1)],
                2 => [(0, 0), (1, 0), (0, 1), (0, 2)],
                _ => [(0, 0), (1, 0), (2, 0), (2, 1)],
            },
        }
    }

    /// Returns the convened-on standard tile id corresponding to the given shape kind.
    pub const fn tile_type_id(&self) -> TileTypeID {
        let id = match self {
            ShapeKind::O => NonZeroU8::new(1),
            ShapeKind::I => NonZeroU8::new(2),
            ShapeKind::S => NonZeroU8::new(3),
            ShapeKind::Z => NonZeroU8::new(4),
            ShapeKind::T => NonZeroU8::new(5),
            ShapeKind::L => NonZeroU8::new(6),
            ShapeKind::J => NonZeroU8::new(7),
        };
        match id {
            Some(id) => id,
            None => NonZeroU8::MIN,
        }
    }
}

impl Cell {
    /// Creates a cell at the given position.
    pub const fn new(column: i32, row: i32, tile: TileTypeID) -> Self {
        Self { column, row, tile }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            spawn_column: 4,
            spawn_row: 0,
            preview_column: 12,
            preview_row: 1,
            points_per_line: 10,
            level_threshold: 500,
            shape_generator: ShapeGenerator::default(),
            feedback_verbosity: FeedbackVerbosity::default(),
        }
    }
}

impl Phase {
    /// Whether a round ended and has not been restarted yet.
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }
}

impl Game {
    /// The level every round starts at.
    pub const INITIAL_LEVEL: u32 = 1;

    /// Creates a blank new template representing a yet-to-be-started [`Game`] ready for configuration.
    pub fn builder() -> GameBuilder {
        GameBuilder::default()
    }

    /// Read accessor for the game's configuration.
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// The value the game's PRNG was seeded with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Read accessor for the settled cells.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The shape currently in play, if any.
    pub const fn falling_shape(&self) -> Option<&Shape> {
        self.falling_shape.as_ref()
    }

    /// The shape that will be spawned next, positioned at the preview anchor.
    pub const fn next_shape(&self) -> Option<&Shape> {
        self.next_shape.as_ref()
    }

    /// The current score of this round.
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// The current level of this round.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// The total number of lines cleared in this round.
    pub const fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// The phase the game is in.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Notifications generated since they were last taken, in chronological order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Removes and returns all queued notifications, in chronological order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Queues a notification, as far as the configured verbosity allows.
    fn notify(&mut self, notification: Notification) {
        match self.config.feedback_verbosity {
            FeedbackVerbosity::Silent => {}
            FeedbackVerbosity::Default => {
                if !matches!(notification, Notification::Debug(_)) {
                    self.notifications.push(notification);
                }
            }
            FeedbackVerbosity::Debug => self.notifications.push(notification),
        }
    }

    /// Queues a debug message. The message is only formatted if it will be kept.
    fn debug(&mut self, message: impl FnOnce() -> String) {
        if self.config.feedback_verbosity == FeedbackVerbosity::Debug {
            self.notifications.push(Notification::Debug(message()));
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ZeroWidth => write!(f, "grid must have at least one column"),
            ConfigurationError::ZeroHeight => write!(f, "grid must have at least one row"),
            ConfigurationError::InitialBoardOutOfBounds { column, row } => {
                write!(f, "initial board cell at ({column}, {row}) lies outside the grid")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
