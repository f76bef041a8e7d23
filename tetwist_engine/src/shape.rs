/*!
This module handles [`Shape`]s and how they move.
*/

use crate::{Cell, ShapeKind};

/// A shape of a certain kind, at some rotation and anchor position.
///
/// The cells of a shape are never stored; they are always recomputed from the kind's
/// [`ShapeKind::offsets`] table, the rotation index and the anchor. Transforms therefore
/// cannot drift, and each one has an exact inverse.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    kind: ShapeKind,
    rotation: usize,
    column: i32,
    row: i32,
}

impl Shape {
    /// Creates an unrotated shape anchored at the given position.
    pub const fn new(kind: ShapeKind, column: i32, row: i32) -> Self {
        Self {
            kind,
            rotation: 0,
            column,
            row,
        }
    }

    /// What kind of shape this is.
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The rotation index, always below `kind().orientations()`.
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    /// Column of the anchor.
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row of the anchor.
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// The cells making up the shape, in the order of the offset table.
    pub fn cells(&self) -> [Cell; 4] {
        let tile = self.kind.tile_type_id();
        self.kind
            .offsets(self.rotation)
            .map(|(dc, dr)| Cell::new(self.column + dc, self.row + dr, tile))
    }

    /// For every column the shape occupies, its lowest cell.
    pub fn bottom_cells(&self) -> Vec<Cell> {
        let mut bottom: Vec<Cell> = Vec::with_capacity(4);
        for cell in self.cells() {
            match bottom.iter_mut().find(|other| other.column == cell.column) {
                Some(other) if other.row < cell.row => *other = cell,
                Some(_) => {}
                None => bottom.push(cell),
            }
        }
        bottom
    }

    /// Moves the shape by the given number of columns and rows.
    pub fn translate(&mut self, d_column: i32, d_row: i32) {
        self.column += d_column;
        self.row += d_row;
    }

    /// Puts the shape's anchor at the given position.
    pub fn move_to(&mut self, column: i32, row: i32) {
        self.column = column;
        self.row = row;
    }

    /// Turns the shape by +90°.
    pub fn rotate_clockwise(&mut self) {
        self.rotation = (self.rotation + 1) % self.kind.orientations();
    }

    /// Turns the shape by -90°.
    pub fn rotate_counter_clockwise(&mut self) {
        let n = self.kind.orientations();
        self.rotation = (self.rotation + n - 1) % n;
    }

    /// Moves the shape one row down.
    pub fn lower_by_one_row(&mut self) {
        self.translate(0, 1);
    }

    /// Moves the shape one row up.
    pub fn raise_by_one_row(&mut self) {
        self.translate(0, -1);
    }

    /// Moves the shape one column to the left.
    pub fn shift_left_by_one_column(&mut self) {
        self.translate(-1, 0);
    }

    /// Moves the shape one column to the right.
    pub fn shift_right_by_one_column(&mut self) {
        self.translate(1, 0);
    }
}
