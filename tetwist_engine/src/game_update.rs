/*!
This module handles the commands a driver can issue to a [`Game`].
*/

use super::*;

impl Game {
    /// Starts a new round.
    ///
    /// Score, level and line tally are reset, any falling shape is discarded and a next shape is
    /// generated if none is being previewed. Fires [`Notification::GameBegan`].
    ///
    /// The grid is left untouched; c.f. [`Game::remove_all_blocks`].
    pub fn begin_game(&mut self) {
        self.score = 0;
        self.level = Self::INITIAL_LEVEL;
        self.lines_cleared = 0;
        self.falling_shape = None;
        self.phase = Phase::Idle;
        if self.next_shape.is_none() {
            self.next_shape = Some(self.generate_preview_shape());
        }
        self.debug(|| "round begins".to_owned());
        self.notify(Notification::GameBegan);
    }

    /// Brings the previewed shape into play and previews a freshly generated one.
    ///
    /// Returns the new falling and next shape, or `None` if the spawn position was blocked.
    /// In that case the rejected shape is put back at the preview anchor as the next shape and the
    /// round ends with [`GameOver::BlockOut`].
    pub fn new_shape(&mut self) -> Option<(Shape, Shape)> {
        let mut shape = match self.next_shape.take() {
            Some(shape) => shape,
            None => self.generate_preview_shape(),
        };
        let next = self.generate_preview_shape();
        shape.move_to(self.config.spawn_column, self.config.spawn_row);

        if self.is_illegal(&shape) {
            shape.move_to(self.config.preview_column, self.config.preview_row);
            self.next_shape = Some(shape);
            self.debug(|| format!("spawn of {:?} blocked", shape.kind()));
            self.end_game(GameOver::BlockOut);
            return None;
        }

        self.falling_shape = Some(shape);
        self.next_shape = Some(next);
        self.phase = Phase::Falling;
        self.debug(|| format!("spawned {:?}, next is {:?}", shape.kind(), next.kind()));
        Some((shape, next))
    }

    /// Whether the falling shape lies (partially) outside the grid or overlaps a settled cell.
    ///
    /// Always `false` if no shape is falling.
    pub fn detect_illegal_placement(&self) -> bool {
        self.falling_shape
            .as_ref()
            .is_some_and(|shape| self.is_illegal(shape))
    }

    /// Whether any lowest cell of the falling shape rests on the floor or on a settled cell.
    ///
    /// Always `false` if no shape is falling.
    pub fn detect_touch(&self) -> bool {
        let Some(shape) = self.falling_shape else {
            return false;
        };
        shape.bottom_cells().iter().any(|cell| {
            let below = cell.row + 1;
            usize::try_from(below).is_ok_and(|row| row >= self.grid.rows())
                || self
                    .grid
                    .slot(cell.column, below)
                    .is_some_and(|(column, row)| self.grid.is_occupied(column, row))
        })
    }

    /// Gravity tick: lowers the falling shape by one row.
    ///
    /// If the lowered position is illegal the shape is settled where it was. If even that position
    /// is illegal the round ends with [`GameOver::StuckFall`]. Otherwise
    /// [`Notification::ShapeMoved`] fires and the shape is settled right away if it now touches
    /// the floor or the stack.
    pub fn let_shape_fall(&mut self) {
        let Some(mut shape) = self.falling_shape else {
            return;
        };
        shape.lower_by_one_row();
        if self.is_illegal(&shape) {
            shape.raise_by_one_row();
            if self.is_illegal(&shape) {
                self.end_game(GameOver::StuckFall);
            } else {
                self.settle_shape();
            }
            return;
        }
        self.falling_shape = Some(shape);
        self.notify(Notification::ShapeMoved { shape });
        if self.detect_touch() {
            self.settle_shape();
        }
    }

    /// Rotates the falling shape clockwise, if the result is legal.
    ///
    /// Returns whether the rotation was accepted.
    pub fn rotate_shape(&mut self) -> bool {
        self.try_transform(
            "rotate clockwise",
            Shape::rotate_clockwise,
            Shape::rotate_counter_clockwise,
        )
    }

    /// Rotates the falling shape counter-clockwise, if the result is legal.
    ///
    /// Returns whether the rotation was accepted.
    pub fn rotate_shape_counter_clockwise(&mut self) -> bool {
        self.try_transform(
            "rotate counter-clockwise",
            Shape::rotate_counter_clockwise,
            Shape::rotate_clockwise,
        )
    }

    /// Shifts the falling shape one column to the left, if the result is legal.
    ///
    /// Returns whether the shift was accepted.
    pub fn move_shape_left(&mut self) -> bool {
        self.try_transform(
            "move left",
            Shape::shift_left_by_one_column,
            Shape::shift_right_by_one_column,
        )
    }

    /// Shifts the falling shape one column to the right, if the result is legal.
    ///
    /// Returns whether the shift was accepted.
    pub fn move_shape_right(&mut self) -> bool {
        self.try_transform(
            "move right",
            Shape::shift_right_by_one_column,
            Shape::shift_left_by_one_column,
        )
    }

    /// Lowers the falling shape until it rests right on top of whatever is below it, then fires
    /// [`Notification::ShapeDropped`].
    ///
    /// The shape is not settled yet; the next gravity tick does that.
    pub fn drop_shape(&mut self) {
        let Some(from) = self.falling_shape else {
            return;
        };
        let mut to = from;
        loop {
            to.lower_by_one_row();
            if self.is_illegal(&to) {
                to.raise_by_one_row();
                break;
            }
        }
        self.falling_shape = Some(to);
        self.notify(Notification::ShapeDropped { from, to });
    }

    /// Moves every cell of the falling shape into the grid and fires [`Notification::ShapeLanded`].
    ///
    /// Returns the settled shape, or `None` if no shape was falling.
    pub fn settle_shape(&mut self) -> Option<Shape> {
        let shape = self.falling_shape.take()?;
        for cell in shape.cells() {
            if let Some((column, row)) = self.grid.slot(cell.column, cell.row) {
                self.grid.set(column, row, Some(cell));
            }
        }
        self.phase = Phase::Idle;
        self.notify(Notification::ShapeLanded { shape });
        Some(shape)
    }

    /// Ends the current round from the outside with [`GameOver::Forfeit`].
    ///
    /// Does nothing if the round already ended.
    pub fn forfeit(&mut self) {
        if !self.phase.is_game_over() {
            self.end_game(GameOver::Forfeit);
        }
    }

    /// Single dispatch point for the discrete player and timer commands.
    pub fn execute(&mut self, command: Command) {
        self.debug(|| format!("command {command:?}"));
        match command {
            Command::Fall => self.let_shape_fall(),
            Command::RotateClockwise => {
                self.rotate_shape();
            }
            Command::RotateCounterClockwise => {
                self.rotate_shape_counter_clockwise();
            }
            Command::MoveLeft => {
                self.move_shape_left();
            }
            Command::MoveRight => {
                self.move_shape_right();
            }
            Command::Drop => self.drop_shape(),
        }
    }

    /// Discards the falling shape, resets score, level and line tally and fires
    /// [`Notification::GameEnded`] with the score reached.
    pub(crate) fn end_game(&mut self, cause: GameOver) {
        let final_score = self.score;
        self.falling_shape = None;
        self.score = 0;
        self.level = Self::INITIAL_LEVEL;
        self.lines_cleared = 0;
        self.phase = Phase::GameOver { cause };
        self.debug(|| format!("round ended by {cause:?} at score {final_score}"));
        self.notify(Notification::GameEnded { cause, final_score });
    }

    fn is_illegal(&self, shape: &Shape) -> bool {
        shape
            .cells()
            .iter()
            .any(|cell| match self.grid.slot(cell.column, cell.row) {
                Some((column, row)) => self.grid.is_occupied(column, row),
                None => true,
            })
    }

    /// Applies `transform` to the falling shape, rolling back with `inverse` if the result is illegal.
    fn try_transform(
        &mut self,
        name: &str,
        transform: fn(&mut Shape),
        inverse: fn(&mut Shape),
    ) -> bool {
        let Some(mut shape) = self.falling_shape else {
            return false;
        };
        transform(&mut shape);
        if self.is_illegal(&shape) {
            inverse(&mut shape);
            self.falling_shape = Some(shape);
            self.debug(|| format!("{name} of {:?} rejected", shape.kind()));
            return false;
        }
        self.falling_shape = Some(shape);
        self.notify(Notification::ShapeMoved { shape });
        true
    }

    fn generate_preview_shape(&mut self) -> Shape {
        let kind = self.shape_generator.generate(&mut self.rng);
        Shape::new(kind, self.config.preview_column, self.config.preview_row)
    }
}
