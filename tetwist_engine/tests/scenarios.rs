use tetwist_engine::{Cell, Command, Game, GameOver, Notification, Phase, Shape, ShapeKind};

fn game_with(board: impl IntoIterator<Item = (i32, i32)>, next: ShapeKind) -> Game {
    let tile = ShapeKind::S.tile_type_id();
    Game::builder()
        .seed(20_240_417)
        .initial_board(
            board
                .into_iter()
                .map(|(column, row)| Cell::new(column, row, tile))
                .collect(),
        )
        .initial_next_shape(next)
        .build()
        .unwrap()
}

/// Full rows at the bottom with only the rightmost column left open.
fn rows_open_at_right(n: i32) -> impl Iterator<Item = (i32, i32)> {
    (20 - n..20).flat_map(|row| (0..9).map(move |column| (column, row)))
}

/// Spawns a vertical I and steers it into the rightmost column.
fn stand_i_in_right_column(game: &mut Game) {
    game.begin_game();
    game.new_shape().unwrap();
    assert!(game.rotate_shape());
    for _ in 0..4 {
        assert!(game.move_shape_right());
    }
    game.drop_shape();
    game.let_shape_fall();
}

#[test]
fn i_piece_falls_to_floor_and_lands() {
    let mut game = game_with([], ShapeKind::I);
    game.begin_game();
    assert_eq!(game.take_notifications(), vec![Notification::GameBegan]);
    let (falling, _) = game.new_shape().unwrap();
    assert_eq!(falling, Shape::new(ShapeKind::I, 4, 0));

    for tick in 1..=18 {
        game.let_shape_fall();
        assert!(!game.detect_illegal_placement());
        assert_eq!(
            game.take_notifications(),
            vec![Notification::ShapeMoved {
                shape: Shape::new(ShapeKind::I, 4, tick)
            }]
        );
    }

    game.let_shape_fall();
    let shape = Shape::new(ShapeKind::I, 4, 19);
    assert_eq!(
        game.take_notifications(),
        vec![
            Notification::ShapeMoved { shape },
            Notification::ShapeLanded { shape }
        ]
    );
    assert!(game.falling_shape().is_none());
    for column in 4..8 {
        assert!(game.grid().is_occupied(column, 19));
    }

    // Nothing left to fall.
    game.let_shape_fall();
    assert!(game.take_notifications().is_empty());
}

#[test]
fn filling_the_gap_clears_one_line() {
    let mut game = game_with(rows_open_at_right(1), ShapeKind::I);
    stand_i_in_right_column(&mut game);
    assert!(matches!(
        game.take_notifications().last(),
        Some(Notification::ShapeLanded { .. })
    ));

    let score_before = game.score();
    let clears = game.remove_completed_lines();
    assert_eq!(clears.removed_lines.len(), 1);
    assert_eq!(clears.removed_lines[0].len(), 10);
    assert_eq!(game.score(), score_before + 10 * game.level());
    assert_eq!(clears.fallen_blocks.len(), 1);
    assert_eq!(
        clears.fallen_blocks[0]
            .iter()
            .map(|cell| (cell.column, cell.row))
            .collect::<Vec<_>>(),
        vec![(9, 19), (9, 18), (9, 17)]
    );
    assert!(game.remove_completed_lines().is_empty());
}

#[test]
fn clearing_n_lines_scores_n_times_ten() {
    for n in 1..=4 {
        let mut game = game_with(rows_open_at_right(n), ShapeKind::I);
        stand_i_in_right_column(&mut game);
        let clears = game.remove_completed_lines();
        assert_eq!(clears.removed_lines.len(), n as usize, "{n} lines");
        assert!(clears.removed_lines.iter().all(|line| line.len() == 10));
        assert_eq!(game.score(), n as u32 * 10 * Game::INITIAL_LEVEL);
        assert_eq!(game.lines_cleared(), n as u32);
        assert_eq!(game.grid().cells().count(), 4 - n as usize);
        assert!(game.remove_completed_lines().is_empty());
    }
}

#[test]
fn blocked_spawn_tops_out_every_time() {
    let mut game = game_with((0..10).map(|column| (column, 0)), ShapeKind::L);
    game.begin_game();
    game.take_notifications();
    for _ in 0..3 {
        assert_eq!(game.new_shape(), None);
        assert!(game.falling_shape().is_none());
        assert_eq!(game.next_shape(), Some(&Shape::new(ShapeKind::L, 12, 1)));
        assert_eq!(
            game.take_notifications(),
            vec![Notification::GameEnded {
                cause: GameOver::BlockOut,
                final_score: 0
            }]
        );
    }
}

#[test]
fn restart_after_top_out() {
    let mut game = game_with((0..10).map(|column| (column, 0)), ShapeKind::O);
    game.begin_game();
    game.new_shape();
    assert!(game.phase().is_game_over());

    let all_blocks = game.remove_all_blocks();
    assert_eq!(all_blocks.len(), 1);
    assert!(game.grid().is_empty());

    game.take_notifications();
    game.begin_game();
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(game.take_notifications(), vec![Notification::GameBegan]);
    let (falling, _) = game.new_shape().unwrap();
    assert_eq!(falling, Shape::new(ShapeKind::O, 4, 0));
}

/// Plays like a driver would: react to every notification as it comes in.
fn autoplay(game: &mut Game, commands: &[Command]) -> Vec<Notification> {
    let mut log = Vec::new();
    game.begin_game();
    for &command in commands.iter().cycle().take(2_000) {
        game.execute(command);
        let mut pending = game.take_notifications();
        while !pending.is_empty() {
            for notification in pending {
                match notification {
                    Notification::GameBegan => {
                        game.new_shape();
                    }
                    Notification::ShapeDropped { .. } => game.let_shape_fall(),
                    Notification::ShapeLanded { .. } => {
                        while !game.remove_completed_lines().is_empty() {}
                        game.new_shape();
                    }
                    Notification::GameEnded { .. } => {
                        game.remove_all_blocks();
                        game.begin_game();
                    }
                    _ => {}
                }
                log.push(notification);
            }
            pending = game.take_notifications();
        }
    }
    log
}

#[test]
fn same_seed_same_game() {
    let commands = [
        Command::MoveLeft,
        Command::Fall,
        Command::RotateClockwise,
        Command::Fall,
        Command::MoveRight,
        Command::MoveRight,
        Command::Drop,
        Command::RotateCounterClockwise,
        Command::Fall,
    ];
    let builder = {
        let mut builder = Game::builder();
        builder.seed(77);
        builder
    };
    let mut a = builder.build().unwrap();
    let mut b = builder.build().unwrap();
    let log_a = autoplay(&mut a, &commands);
    let log_b = autoplay(&mut b, &commands);
    assert!(log_a
        .iter()
        .any(|n| matches!(n, Notification::ShapeLanded { .. })));
    assert_eq!(log_a, log_b);
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.score(), b.score());
    assert_eq!(a.next_shape(), b.next_shape());
}
