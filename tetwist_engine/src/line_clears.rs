/*!
This module handles clearing completed rows, the collapse that follows, and emptying the grid.
*/

use super::*;

/// The outcome of [`Game::remove_completed_lines`], to drive animations downstream.
#[derive(Eq, PartialEq, Clone, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineClears {
    /// The cells of each completed row, bottom row first.
    pub removed_lines: Vec<Vec<Cell>>,
    /// The cells that fell afterwards, at their new position, grouped by column.
    pub fallen_blocks: Vec<Vec<Cell>>,
}

impl LineClears {
    /// Whether no row was complete.
    pub fn is_empty(&self) -> bool {
        self.removed_lines.is_empty()
    }
}

impl Game {
    /// Removes all completed rows, awards points and lets the cells above fall.
    ///
    /// Rows are scanned from the bottom up to (but excluding) the topmost row. Clearing `n` rows
    /// awards `n * points_per_line * level` points; reaching `level * level_threshold` points
    /// raises the level by one and fires [`Notification::LevelUp`].
    ///
    /// Afterwards every cell above the lowest cleared row falls, column by column, as far as the
    /// floor or the next settled cell below it allows. The collapse may complete further rows, so
    /// drivers are expected to call this again until the result [`is_empty`](LineClears::is_empty).
    pub fn remove_completed_lines(&mut self) -> LineClears {
        let (columns, rows) = (self.grid.columns(), self.grid.rows());

        let mut removed_lines = Vec::new();
        let mut lowest_cleared_row = None;
        for row in (1..rows).rev() {
            if self.grid.is_row_complete(row) {
                let line = (0..columns)
                    .filter_map(|column| self.grid.take(column, row))
                    .collect::<Vec<_>>();
                removed_lines.push(line);
                lowest_cleared_row.get_or_insert(row);
            }
        }
        let Some(lowest_cleared_row) = lowest_cleared_row else {
            return LineClears::default();
        };

        let n_lines = u32::try_from(removed_lines.len()).unwrap_or(u32::MAX);
        self.lines_cleared = self.lines_cleared.saturating_add(n_lines);
        self.score = self.score.saturating_add(
            n_lines
                .saturating_mul(self.config.points_per_line)
                .saturating_mul(self.level),
        );
        self.debug(|| format!("cleared {n_lines} line(s)"));
        if self.score >= self.level.saturating_mul(self.config.level_threshold) {
            self.level += 1;
            self.notify(Notification::LevelUp { level: self.level });
        }

        let mut fallen_blocks = Vec::new();
        for column in 0..columns {
            let mut fallen = Vec::new();
            for row in (0..lowest_cleared_row).rev() {
                let Some(mut cell) = self.grid.take(column, row) else {
                    continue;
                };
                let mut new_row = row;
                while new_row + 1 < rows && !self.grid.is_occupied(column, new_row + 1) {
                    new_row += 1;
                }
                cell.row = new_row as i32;
                self.grid.set(column, new_row, Some(cell));
                if new_row != row {
                    fallen.push(cell);
                }
            }
            if !fallen.is_empty() {
                fallen_blocks.push(fallen);
            }
        }

        LineClears {
            removed_lines,
            fallen_blocks,
        }
    }

    /// Empties the whole grid, returning the cells that were in it row by row from the top.
    ///
    /// Empty rows are left out.
    pub fn remove_all_blocks(&mut self) -> Vec<Vec<Cell>> {
        let (columns, rows) = (self.grid.columns(), self.grid.rows());
        let mut all_blocks = Vec::new();
        for row in 0..rows {
            let line = (0..columns)
                .filter_map(|column| self.grid.take(column, row))
                .collect::<Vec<_>>();
            if !line.is_empty() {
                all_blocks.push(line);
            }
        }
        all_blocks
    }
}
