/*!
This module handles creation / initialization / building of [`Game`]s.
*/

use rand_chacha::rand_core::SeedableRng;

use super::*;

/// This builder exposes the ability to configure a new [`Game`] to varying degrees.
///
/// Generally speaking, when using `GameBuilder`, you’ll first call [`GameBuilder::new`] or
/// [`Game::builder`], then chain calls to methods to set each field, then call
/// [`GameBuilder::build`].
/// This will give you a [`Game`] as specified that you can then use as normal.
/// The `GameBuilder` is not used up and its configuration can be re-used to initialize more [`Game`]s.
#[derive(PartialEq, Eq, Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameBuilder {
    /// The configuration options that will be set for the game.
    pub config: Configuration,
    /// The value to seed the game's PRNG with.
    pub seed: Option<u64>,
    /// Cells that are already settled when the game starts.
    pub initial_board: Vec<Cell>,
    /// The kind of the first shape to be previewed (and then spawned).
    pub initial_next_shape: Option<ShapeKind>,
}

impl GameBuilder {
    /// Creates a blank new template representing a yet-to-be-started [`Game`] ready for configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`Game`] with the information specified by `self`.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigurationError`] if the grid has no columns or rows, or if a cell of the
    /// initial board lies outside it.
    pub fn build(&self) -> Result<Game, ConfigurationError> {
        let config = self.config.clone();
        if config.width == 0 {
            return Err(ConfigurationError::ZeroWidth);
        }
        if config.height == 0 {
            return Err(ConfigurationError::ZeroHeight);
        }

        let mut grid = Grid::new(config.width, config.height);
        for &cell in &self.initial_board {
            let Some((column, row)) = grid.slot(cell.column, cell.row) else {
                return Err(ConfigurationError::InitialBoardOutOfBounds {
                    column: cell.column,
                    row: cell.row,
                });
            };
            grid.set(column, row, Some(cell));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let next_shape = self
            .initial_next_shape
            .map(|kind| Shape::new(kind, config.preview_column, config.preview_row));

        Ok(Game {
            seed,
            rng: GameRng::seed_from_u64(seed),
            shape_generator: config.shape_generator,
            grid,
            falling_shape: None,
            next_shape,
            score: 0,
            level: Game::INITIAL_LEVEL,
            lines_cleared: 0,
            phase: Phase::Idle,
            notifications: Vec::new(),
            config,
        })
    }

    /// Sets the [`Configuration`] that will be used by [`Game`].
    pub fn config(&mut self, x: Configuration) -> &mut Self {
        self.config = x;
        self
    }

    /// Number of columns of the grid.
    pub fn width(&mut self, x: usize) -> &mut Self {
        self.config.width = x;
        self
    }
    /// Number of rows of the grid.
    pub fn height(&mut self, x: usize) -> &mut Self {
        self.config.height = x;
        self
    }
    /// Where a shape's anchor is put when it starts falling.
    pub fn spawn_anchor(&mut self, column: i32, row: i32) -> &mut Self {
        self.config.spawn_column = column;
        self.config.spawn_row = row;
        self
    }
    /// Where the previewed next shape's anchor is put.
    pub fn preview_anchor(&mut self, column: i32, row: i32) -> &mut Self {
        self.config.preview_column = column;
        self.config.preview_row = row;
        self
    }
    /// Points awarded per cleared line, before multiplying by the level.
    pub fn points_per_line(&mut self, x: u32) -> &mut Self {
        self.config.points_per_line = x;
        self
    }
    /// A level is gained once the score reaches `level * level_threshold`.
    pub fn level_threshold(&mut self, x: u32) -> &mut Self {
        self.config.level_threshold = x;
        self
    }
    /// The method of shape generation used.
    pub fn shape_generator(&mut self, x: ShapeGenerator) -> &mut Self {
        self.config.shape_generator = x;
        self
    }
    /// The amount of notifications that is to be generated.
    pub fn feedback_verbosity(&mut self, x: FeedbackVerbosity) -> &mut Self {
        self.config.feedback_verbosity = x;
        self
    }

    /// The value to seed the game's PRNG with.
    pub fn seed(&mut self, x: u64) -> &mut Self {
        self.seed = Some(x);
        self
    }
    /// Cells that are already settled when the game starts.
    pub fn initial_board(&mut self, x: Vec<Cell>) -> &mut Self {
        self.initial_board = x;
        self
    }
    /// The kind of the first shape to be previewed (and then spawned).
    pub fn initial_next_shape(&mut self, x: ShapeKind) -> &mut Self {
        self.initial_next_shape = Some(x);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Game::builder().width(0).build().unwrap_err(),
            ConfigurationError::ZeroWidth
        );
        assert_eq!(
            Game::builder().height(0).build().unwrap_err(),
            ConfigurationError::ZeroHeight
        );
    }

    #[test]
    fn rejects_initial_board_outside_grid() {
        let tile = ShapeKind::O.tile_type_id();
        let err = Game::builder()
            .width(4)
            .height(4)
            .initial_board(vec![Cell::new(1, 1, tile), Cell::new(4, 0, tile)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InitialBoardOutOfBounds { column: 4, row: 0 }
        );
        assert_eq!(
            err.to_string(),
            "initial board cell at (4, 0) lies outside the grid"
        );
    }

    #[test]
    fn builds_fresh_game() {
        let tile = ShapeKind::S.tile_type_id();
        let game = Game::builder()
            .seed(5)
            .initial_board(vec![Cell::new(0, 19, tile)])
            .initial_next_shape(ShapeKind::J)
            .build()
            .unwrap();
        assert_eq!(game.seed(), 5);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), Game::INITIAL_LEVEL);
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.falling_shape().is_none());
        assert_eq!(game.next_shape(), Some(&Shape::new(ShapeKind::J, 12, 1)));
        assert_eq!(game.grid().get(0, 19), Some(Cell::new(0, 19, tile)));
        assert_eq!(game.grid().cells().count(), 1);
    }

    #[test]
    fn builder_is_reusable() {
        let mut builder = GameBuilder::new();
        builder.seed(11).width(6).height(8);
        let a = builder.build().unwrap();
        let b = builder.build().unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.config(), b.config());
        assert_eq!(a.grid().columns(), 6);
        assert_eq!(a.grid().rows(), 8);
    }

    #[test]
    fn custom_scoring_and_preview_anchor() {
        let tile = ShapeKind::I.tile_type_id();
        let bottom_row = |game: &mut Game| {
            for column in 0..10 {
                game.grid.set(column, 19, Some(Cell::new(column as i32, 19, tile)));
            }
        };
        let mut game = Game::builder()
            .seed(3)
            .points_per_line(7)
            .level_threshold(10)
            .preview_anchor(20, 3)
            .initial_next_shape(ShapeKind::L)
            .build()
            .unwrap();
        assert_eq!(game.next_shape(), Some(&Shape::new(ShapeKind::L, 20, 3)));

        game.begin_game();
        let (falling, next) = game.new_shape().unwrap();
        assert_eq!(falling, Shape::new(ShapeKind::L, 4, 0));
        assert_eq!((next.column(), next.row()), (20, 3));
        game.take_notifications();

        bottom_row(&mut game);
        assert_eq!(game.remove_completed_lines().removed_lines.len(), 1);
        assert_eq!((game.score(), game.level()), (7, 1));
        assert!(game.take_notifications().is_empty());

        bottom_row(&mut game);
        game.remove_completed_lines();
        assert_eq!((game.score(), game.level()), (14, 2));
        assert_eq!(
            game.take_notifications(),
            vec![Notification::LevelUp { level: 2 }]
        );

        // Points are multiplied by the level the line was cleared at.
        bottom_row(&mut game);
        game.remove_completed_lines();
        assert_eq!((game.score(), game.level()), (28, 3));
    }

    #[test]
    fn bag_game_spawns_every_kind_once_per_round() {
        let mut game = Game::builder()
            .seed(21)
            .shape_generator(ShapeGenerator::bag())
            .build()
            .unwrap();
        game.begin_game();
        let mut kinds = (0..7)
            .map(|_| game.new_shape().unwrap().0.kind())
            .collect::<Vec<_>>();
        kinds.sort();
        assert_eq!(kinds, ShapeKind::VARIANTS.to_vec());
    }
}
