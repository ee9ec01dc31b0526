//! The block stack: fixed grid, active piece, locking and line clears

use engine_core::grid::Grid;
use engine_core::outcome::{MoveResult, TerminalKind};
use rand::Rng;
use tracing::debug;

use crate::piece::{Piece, Tetromino};

pub const ROWS: usize = 20;
pub const COLS: usize = 10;

/// Points for clearing 0, 1, 2, 3 or 4 rows in one lock
const LINE_CLEAR_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

/// Settled blocks; `None` is an empty cell
pub type Board = Grid<Option<Tetromino>>;

/// What to draw in one cell of the composited view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCell {
    Empty,
    Ghost,
    Block(Tetromino),
}

/// Score for clearing `rows` rows with a single lock
pub fn line_clear_points(rows: usize) -> u32 {
    LINE_CLEAR_POINTS[rows.min(LINE_CLEAR_POINTS.len() - 1)]
}

/// Whether `shape` placed with its top-left corner at `(row, col)` hits
/// a wall, the floor, or a settled block.
///
/// Sub-cells above the board only check the walls.
pub fn collides(grid: &Board, shape: &Grid<bool>, row: i32, col: i32) -> bool {
    shape.positions().filter(|&pos| shape[pos]).any(|(r, c)| {
        let y = row + r as i32;
        let x = col + c as i32;
        if x < 0 || x >= grid.cols() as i32 || y >= grid.rows() as i32 {
            return true;
        }
        y >= 0 && grid[(y as usize, x as usize)].is_some()
    })
}

/// Remove every full row, scanning bottom to top.
///
/// After a removal the same row index is checked again, since the rows
/// above have shifted into it. Returns the number of rows cleared.
pub fn clear_full_rows(grid: &mut Board) -> usize {
    let mut cleared = 0;
    let mut row = grid.rows();
    while row > 0 {
        if grid.row(row - 1).iter().all(Option::is_some) {
            grid.remove_row_and_shift_down(row - 1, None);
            cleared += 1;
        } else {
            row -= 1;
        }
    }
    cleared
}

/// A block-stacking game in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub grid: Board,
    pub active: Option<Piece>,
    pub score: u64,
    /// Total rows cleared this game
    pub lines: u32,
    pub over: bool,
}

impl Stack {
    /// Empty 20x10 board with no active piece
    pub fn new() -> Self {
        Self::with_grid(Grid::new(ROWS, COLS))
    }

    pub fn with_grid(grid: Board) -> Self {
        Self {
            grid,
            active: None,
            score: 0,
            lines: 0,
            over: false,
        }
    }

    /// Replace the active piece, e.g. to script a position
    pub fn with_active(mut self, piece: Piece) -> Self {
        self.active = Some(piece);
        self
    }

    fn terminal(&self) -> Option<TerminalKind> {
        self.over.then_some(TerminalKind::ToppedOut)
    }

    fn rejected(&self) -> MoveResult<Stack> {
        MoveResult::unchanged(self.clone()).with_terminal(self.terminal())
    }

    fn fits(&self, piece: &Piece) -> bool {
        !collides(&self.grid, &piece.shape, piece.row, piece.col)
    }

    /// Bring a new piece in at the top centre.
    ///
    /// If the spawn position is already blocked the game ends and no piece
    /// is placed. Rejected while a piece is still falling.
    pub fn spawn(&self, kind: Tetromino) -> MoveResult<Stack> {
        if self.over || self.active.is_some() {
            return self.rejected();
        }

        let piece = Piece::spawn(kind, self.grid.cols());
        let mut next = self.clone();
        if !self.fits(&piece) {
            next.over = true;
            debug!(?kind, score = next.score, "spawn blocked, game over");
            return MoveResult::changed(next, 0).with_terminal(Some(TerminalKind::ToppedOut));
        }

        next.active = Some(piece);
        MoveResult::changed(next, 0)
    }

    fn try_move(&self, candidate: impl FnOnce(&Piece) -> Piece) -> MoveResult<Stack> {
        let Some(active) = self.active.as_ref().filter(|_| !self.over) else {
            return self.rejected();
        };

        let moved = candidate(active);
        if !self.fits(&moved) {
            return self.rejected();
        }

        let mut next = self.clone();
        next.active = Some(moved);
        MoveResult::changed(next, 0)
    }

    pub fn move_left(&self) -> MoveResult<Stack> {
        self.try_move(|piece| piece.offset(0, -1))
    }

    pub fn move_right(&self) -> MoveResult<Stack> {
        self.try_move(|piece| piece.offset(0, 1))
    }

    /// Turn the piece clockwise in place; no wall kicks are tried
    pub fn rotate(&self) -> MoveResult<Stack> {
        self.try_move(Piece::rotated)
    }

    /// Move down one row, or lock the piece if it cannot move
    pub fn soft_drop(&self) -> MoveResult<Stack> {
        match &self.active {
            Some(active) if !self.over => {
                if self.fits(&active.offset(1, 0)) {
                    self.try_move(|piece| piece.offset(1, 0))
                } else {
                    self.lock()
                }
            }
            _ => self.rejected(),
        }
    }

    /// Lowest row the active piece could fall to from where it is
    pub fn ghost_row(&self) -> Option<i32> {
        let active = self.active.as_ref()?;
        let mut row = active.row;
        while !collides(&self.grid, &active.shape, row + 1, active.col) {
            row += 1;
        }
        Some(row)
    }

    /// Move the piece straight down as far as it goes, without locking
    pub fn hard_drop(&self) -> MoveResult<Stack> {
        match (self.ghost_row(), &self.active) {
            (Some(ghost), Some(active)) if !self.over && ghost != active.row => {
                self.try_move(|piece| Piece { row: ghost, ..piece.clone() })
            }
            _ => self.rejected(),
        }
    }

    /// Merge the active piece into the grid, clear full rows and score them
    pub fn lock(&self) -> MoveResult<Stack> {
        let Some(active) = self.active.as_ref().filter(|_| !self.over) else {
            return self.rejected();
        };

        let mut next = self.clone();
        for (y, x) in active.cells() {
            if y >= 0 {
                next.grid.set(y as usize, x as usize, Some(active.kind));
            }
        }

        let cleared = clear_full_rows(&mut next.grid);
        let points = line_clear_points(cleared);
        next.score += points as u64;
        next.lines += cleared as u32;
        next.active = None;
        if cleared > 0 {
            debug!(cleared, points, "rows cleared");
        }

        MoveResult::changed(next, points)
    }

    /// One gravity step: spawn if nothing is falling, otherwise soft drop
    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> MoveResult<Stack> {
        if self.over {
            return self.rejected();
        }
        match self.active {
            None => self.spawn(Tetromino::random(rng)),
            Some(_) => self.soft_drop(),
        }
    }

    /// Settled blocks with the ghost and the active piece drawn on top.
    ///
    /// The ghost only covers empty cells; the active piece is drawn last.
    pub fn composite(&self) -> Grid<DisplayCell> {
        let mut view = self.grid.map(|cell| match cell {
            Some(kind) => DisplayCell::Block(*kind),
            None => DisplayCell::Empty,
        });

        let Some(active) = &self.active else {
            return view;
        };

        if let Some(ghost_row) = self.ghost_row() {
            let ghost = Piece { row: ghost_row, ..active.clone() };
            for (y, x) in ghost.cells() {
                if y < 0 {
                    continue;
                }
                if let Some(cell) = view.get_mut(y as usize, x as usize) {
                    if *cell == DisplayCell::Empty {
                        *cell = DisplayCell::Ghost;
                    }
                }
            }
        }

        for (y, x) in active.cells() {
            if y >= 0 {
                view.set(y as usize, x as usize, DisplayCell::Block(active.kind));
            }
        }
        view
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
