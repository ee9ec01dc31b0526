//! Tetromino shapes and falling-piece kinematics

use engine_core::grid::Grid;
use rand::Rng;

/// The seven standard tetrominoes; each also serves as its colour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    /// Uniformly random kind
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Spawn orientation as a binary matrix
    pub fn shape(self) -> Grid<bool> {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
        };

        let mut shape = Grid::filled(rows.len(), rows[0].len(), false);
        for (r, row) in rows.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                shape.set(r, c, bit == 1);
            }
        }
        shape
    }

    pub fn symbol(self) -> char {
        match self {
            Tetromino::I => 'I',
            Tetromino::O => 'O',
            Tetromino::T => 'T',
            Tetromino::S => 'S',
            Tetromino::Z => 'Z',
            Tetromino::J => 'J',
            Tetromino::L => 'L',
        }
    }
}

/// A falling piece: shape matrix plus the board position of its top-left corner.
///
/// `row` may be negative while the piece is partly above the visible board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Grid<bool>,
    pub row: i32,
    pub col: i32,
}

impl Piece {
    pub fn new(kind: Tetromino, row: i32, col: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            row,
            col,
        }
    }

    /// Horizontally centred on row 0 of a board `board_cols` wide
    pub fn spawn(kind: Tetromino, board_cols: usize) -> Self {
        let width = kind.shape().cols();
        let col = (board_cols / 2) as i32 - (width / 2) as i32;
        Self::new(kind, 0, col)
    }

    pub fn width(&self) -> usize {
        self.shape.cols()
    }

    pub fn height(&self) -> usize {
        self.shape.rows()
    }

    /// Board coordinates `(row, col)` of every occupied sub-cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .positions()
            .filter(|&pos| self.shape[pos])
            .map(|(r, c)| (self.row + r as i32, self.col + c as i32))
    }

    /// Same piece moved by `(drow, dcol)`
    pub fn offset(&self, drow: i32, dcol: i32) -> Piece {
        Piece {
            row: self.row + drow,
            col: self.col + dcol,
            ..self.clone()
        }
    }

    /// Same origin, shape turned a quarter clockwise
    pub fn rotated(&self) -> Piece {
        Piece {
            shape: self.shape.rotate_clockwise(),
            ..self.clone()
        }
    }
}
