//! Fixed-size row-major grid shared by the board engines
//!
//! Every engine stores its board in a `Grid<T>`: 2048 tiles, minefield cells,
//! the block stack, and even tetromino shape matrices. The grid never changes
//! size after construction; rotations produce a new grid.

use std::ops::{Index, IndexMut};

/// Errors raised when building a grid from nested rows
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid must have at least one row and one column")]
    Empty,
    #[error("Row {row} has {actual} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, actual: usize },
}

/// Row-major 2D array with constant dimensions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Build a grid from nested rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(GridError::Empty);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(height * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            rows: height,
            cols,
            cells,
        })
    }

    /// Rotate a quarter turn clockwise: transpose, then reverse each row.
    ///
    /// A `rows × cols` grid becomes `cols × rows`.
    pub fn rotate_clockwise(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for c in 0..self.cols {
            for r in (0..self.rows).rev() {
                cells.push(self[(r, c)].clone());
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Remove row `row` and push a new `fill` row in at the top.
    ///
    /// Rows above `row` move down by one. Out-of-range rows are ignored.
    pub fn remove_row_and_shift_down(&mut self, row: usize, fill: T) {
        if row >= self.rows {
            return;
        }
        let start = row * self.cols;
        self.cells.drain(start..start + self.cols);
        let mut shifted = vec![fill; self.cols];
        shifted.append(&mut self.cells);
        self.cells = shifted;
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Create a grid of default-valued cells
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.cells.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Overwrite a cell. Returns `false` if the position is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        match self.get_mut(row, col) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Signed bounds check for coordinates that may lie above or left of the grid
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// Iterate rows top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// Iterate cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.cells.iter_mut()
    }

    /// All `(row, col)` positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    /// Count cells matching a predicate
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|cell| pred(cell)).count()
    }

    /// The 8-connected neighbourhood of a cell, clipped at the edges.
    ///
    /// The centre cell itself is not included.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        let (row, col) = (row as i64, col as i64);
        (-1i64..=1)
            .flat_map(|dr| (-1i64..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .map(move |(dr, dc)| (row + dr, col + dc))
            .filter(move |&(r, c)| r >= 0 && c >= 0 && r < rows && c < cols)
            .map(|(r, c)| (r as usize, c as usize))
    }

    /// Transform every cell into a new grid of the same shape
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "grid index ({row}, {col}) out of bounds");
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "grid index ({row}, {col}) out of bounds");
        &mut self.cells[row * self.cols + col]
    }
}
