//! Grid geometry: cell size, extent, and position → cell resolution.
//!
//! Rows run along the floor's `z` axis and columns along `x`.  Cell
//! `(0, 0)` has its lower-left corner at `origin`.  Each cell carries four
//! staggered velocity faces: `Left`/`Right` hold the `x` velocity component
//! and `Lower`/`Upper` hold the `z` component.

use ped_core::Vec2;

use crate::{FieldError, FieldResult};

/// A `(row, column)` grid index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One of the four staggered velocity faces of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// `-x` face, holds an `x` velocity.
    Left,
    /// `+x` face, holds an `x` velocity.
    Right,
    /// `+z` face, holds a `z` velocity.
    Upper,
    /// `-z` face, holds a `z` velocity.
    Lower,
}

impl Face {
    pub const ALL: [Face; 4] = [Face::Left, Face::Right, Face::Upper, Face::Lower];

    /// Position of this face in a per-cell `[f32; 4]` array.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Face::Left => 0,
            Face::Right => 1,
            Face::Upper => 2,
            Face::Lower => 3,
        }
    }
}

/// Uniform square grid covering the simulated floor.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// Floor coordinate of the lower-left corner of cell `(0, 0)`.
    pub origin: Vec2,
    /// Side length of one square cell, metres.
    pub cell_length: f32,
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Validate and create a layout.
    pub fn new(origin: Vec2, cell_length: f32, rows: usize, cols: usize) -> FieldResult<Self> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(FieldError::InvalidCellLength(cell_length));
        }
        if rows == 0 || cols == 0 {
            return Err(FieldError::EmptyGrid { rows, cols });
        }
        Ok(Self { origin, cell_length, rows, cols })
    }

    /// Smallest grid of `cell_length` cells centred on the origin that
    /// covers a `width × depth` floor.
    pub fn covering(width: f32, depth: f32, cell_length: f32) -> FieldResult<Self> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(FieldError::InvalidCellLength(cell_length));
        }
        let cols = (width / cell_length).ceil().max(1.0) as usize;
        let rows = (depth / cell_length).ceil().max(1.0) as usize;
        let origin = Vec2::new(
            -(cols as f32) * cell_length * 0.5,
            -(rows as f32) * cell_length * 0.5,
        );
        Self::new(origin, cell_length, rows, cols)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn cell_area(&self) -> f32 {
        self.cell_length * self.cell_length
    }

    /// Row-major flat index of `cell`.
    #[inline]
    pub fn flat(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Floor coordinate of the centre of `cell`.
    #[inline]
    pub fn center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            self.origin.x + (cell.col as f32 + 0.5) * self.cell_length,
            self.origin.y + (cell.row as f32 + 0.5) * self.cell_length,
        )
    }

    /// Resolve a floor position to its containing cell (clamped to the grid)
    /// and the offset from that cell's centre.
    ///
    /// The offset is clamped to `±cell_length / 2`, so positions outside the
    /// grid behave like the nearest point on its border.
    pub fn locate(&self, p: Vec2) -> (Cell, Vec2) {
        let col = axis_index(p.x - self.origin.x, self.cell_length, self.cols);
        let row = axis_index(p.y - self.origin.y, self.cell_length, self.rows);
        let cell = Cell { row, col };
        let half = self.cell_length * 0.5;
        let rel = p - self.center(cell);
        (cell, Vec2::new(rel.x.clamp(-half, half), rel.y.clamp(-half, half)))
    }

    /// The cell `d_row` rows and `d_col` columns away from `cell`, or `None`
    /// if that falls outside the grid.
    #[inline]
    pub fn offset(&self, cell: Cell, d_row: isize, d_col: isize) -> Option<Cell> {
        let row = cell.row.checked_add_signed(d_row)?;
        let col = cell.col.checked_add_signed(d_col)?;
        (row < self.rows && col < self.cols).then_some(Cell { row, col })
    }
}

fn axis_index(offset: f32, cell_length: f32, count: usize) -> usize {
    if offset.is_nan() || offset <= 0.0 {
        return 0;
    }
    ((offset / cell_length) as usize).min(count - 1)
}
