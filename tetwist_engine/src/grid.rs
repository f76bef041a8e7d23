/*!
This module holds the [`Grid`], the store of all settled [`Cell`]s.
*/

use crate::Cell;

/// Fixed-size two-dimensional store mapping `(column, row)` to an optional settled [`Cell`].
///
/// Slots are addressed with `usize` coordinates and are *not* bounds-checked beyond debug
/// assertions; callers validate positions first, e.g. with [`Grid::slot`].
/// An occupied slot always holds a cell whose `column`/`row` equal the slot's coordinates.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    columns: usize,
    rows: usize,
    /// Row-major slots (`row * columns + column`).
    slots: Vec<Option<Cell>>,
}

impl Grid {
    /// Creates an empty grid of the given dimensions.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            slots: vec![None; columns * rows],
        }
    }

    /// Number of columns.
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, column: usize, row: usize) -> usize {
        debug_assert!(
            column < self.columns && row < self.rows,
            "slot ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        row * self.columns + column
    }

    /// Converts signed coordinates into a slot, or `None` if they lie outside the grid.
    pub fn slot(&self, column: i32, row: i32) -> Option<(usize, usize)> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.columns && row < self.rows).then_some((column, row))
    }

    /// The cell settled at the given slot.
    pub fn get(&self, column: usize, row: usize) -> Option<Cell> {
        self.slots[self.index(column, row)]
    }

    /// Whether a cell is settled at the given slot.
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.get(column, row).is_some()
    }

    /// Stores `cell` at the given slot, returning what was there before.
    pub fn set(&mut self, column: usize, row: usize, cell: Option<Cell>) -> Option<Cell> {
        debug_assert!(cell.map_or(true, |cell| {
            usize::try_from(cell.column) == Ok(column) && usize::try_from(cell.row) == Ok(row)
        }));
        let idx = self.index(column, row);
        std::mem::replace(&mut self.slots[idx], cell)
    }

    /// Empties the given slot, returning the cell that was there.
    pub fn take(&mut self, column: usize, row: usize) -> Option<Cell> {
        let idx = self.index(column, row);
        self.slots[idx].take()
    }

    /// Whether every column of `row` holds a cell.
    pub fn is_row_complete(&self, row: usize) -> bool {
        let start = self.index(0, row);
        self.slots[start..start + self.columns]
            .iter()
            .all(Option::is_some)
    }

    /// Iterates over all settled cells, row by row from the top.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.slots.iter().flatten()
    }

    /// Whether no cell is settled anywhere.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeKind;

    fn cell(column: i32, row: i32) -> Cell {
        Cell::new(column, row, ShapeKind::T.tile_type_id())
    }

    #[test]
    fn set_get_take() {
        let mut grid = Grid::new(10, 20);
        assert!(grid.is_empty());
        assert_eq!(grid.set(3, 7, Some(cell(3, 7))), None);
        assert_eq!(grid.get(3, 7), Some(cell(3, 7)));
        assert!(grid.is_occupied(3, 7));
        assert!(!grid.is_occupied(7, 3));
        assert_eq!(grid.take(3, 7), Some(cell(3, 7)));
        assert!(grid.is_empty());
    }

    #[test]
    fn slot_rejects_outside_coordinates() {
        let grid = Grid::new(10, 20);
        assert_eq!(grid.slot(0, 0), Some((0, 0)));
        assert_eq!(grid.slot(9, 19), Some((9, 19)));
        assert_eq!(grid.slot(-1, 0), None);
        assert_eq!(grid.slot(10, 0), None);
        assert_eq!(grid.slot(0, -1), None);
        assert_eq!(grid.slot(0, 20), None);
    }

    #[test]
    fn row_completeness() {
        let mut grid = Grid::new(4, 3);
        for column in 0..3 {
            grid.set(column, 2, Some(cell(column as i32, 2)));
        }
        assert!(!grid.is_row_complete(2));
        grid.set(3, 2, Some(cell(3, 2)));
        assert!(grid.is_row_complete(2));
        assert!(!grid.is_row_complete(1));
        assert_eq!(grid.cells().count(), 4);
    }
}
