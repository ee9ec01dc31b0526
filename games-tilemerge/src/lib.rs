//! 2048-style tile merging for the arcade engine
//!
//! Every move is reduced to a single canonical "slide left": the board is
//! rotated so the requested direction points left, each row is compacted and
//! merged, and the board is rotated back. A successful move then spawns one
//! new tile.

use engine_core::grid::Grid;
use engine_core::outcome::{MoveResult, TerminalKind};
use engine_core::typed::{
    BoardShape, Capabilities, CommandError, CommandSpec, CommandTokens, EngineId, Game, Snapshot,
};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// Side length of the square board
pub const SIZE: usize = 4;

/// Reaching this tile wins, but play continues
pub const WINNING_TILE: u32 = 2048;

/// Probability that a spawned tile is a 2 rather than a 4
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// A board cell: a power of two, or empty
pub type Tile = Option<u32>;

/// A direction to slide tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    /// Clockwise quarter turns that make this direction point left
    fn clockwise_turns(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }
}

fn turn(grid: &Grid<Tile>, quarter_turns: usize) -> Grid<Tile> {
    (0..quarter_turns).fold(grid.clone(), |g, _| g.rotate_clockwise())
}

/// Slide one row to the left, merging equal neighbours once.
///
/// Returns the new row (same length) and the score gained, which is the
/// sum of all merged values. A merged tile never merges again in the same
/// slide, so `[2, 2, 2, 2]` becomes `[4, 4, _, _]`.
pub fn slide_row(row: &[Tile]) -> (Vec<Tile>, u32) {
    let mut values: Vec<u32> = row.iter().flatten().copied().collect();
    let mut score = 0;

    let mut i = 0;
    while i + 1 < values.len() {
        if values[i] == values[i + 1] {
            values[i] *= 2;
            score += values[i];
            values.remove(i + 1);
        }
        i += 1;
    }

    let mut slid: Vec<Tile> = values.into_iter().map(Some).collect();
    slid.resize(row.len(), None);
    (slid, score)
}

fn slide_left(grid: &Grid<Tile>) -> (Grid<Tile>, u32, bool) {
    let mut slid = grid.clone();
    let mut score = 0;
    let mut changed = false;

    for r in 0..grid.rows() {
        let (row, gained) = slide_row(grid.row(r));
        changed |= row.as_slice() != grid.row(r);
        score += gained;
        slid.row_mut(r).copy_from_slice(&row);
    }

    (slid, score, changed)
}

/// Slide the whole board in `direction` without spawning a tile.
///
/// An unchanged result carries the input grid untouched.
pub fn shift(grid: &Grid<Tile>, direction: Direction) -> MoveResult<Grid<Tile>> {
    let turns = direction.clockwise_turns();
    let (slid, score, changed) = slide_left(&turn(grid, turns));

    if !changed {
        return MoveResult::unchanged(grid.clone());
    }
    MoveResult::changed(turn(&slid, (4 - turns) % 4), score)
}

/// Place a 2 (90%) or 4 (10%) in a uniformly chosen empty cell.
///
/// A full board is returned unchanged.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &Grid<Tile>, rng: &mut R) -> Grid<Tile> {
    let empty: Vec<(usize, usize)> = grid
        .positions()
        .filter(|&(r, c)| grid[(r, c)].is_none())
        .collect();
    if empty.is_empty() {
        return grid.clone();
    }

    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = if rng.gen_bool(SPAWN_TWO_PROBABILITY) { 2 } else { 4 };

    let mut spawned = grid.clone();
    spawned[(row, col)] = Some(value);
    spawned
}

/// Put a specific tile at a position, e.g. to script a board
pub fn place_tile(grid: &Grid<Tile>, row: usize, col: usize, value: u32) -> Grid<Tile> {
    let mut placed = grid.clone();
    placed.set(row, col, Some(value));
    placed
}

/// True when no direction changes the board
pub fn is_stuck(grid: &Grid<Tile>) -> bool {
    Direction::ALL.iter().all(|&d| !shift(grid, d).changed)
}

pub fn highest_tile(grid: &Grid<Tile>) -> Option<u32> {
    grid.iter().flatten().copied().max()
}

/// True once any tile reaches `WINNING_TILE`
pub fn has_won(grid: &Grid<Tile>) -> bool {
    highest_tile(grid).map_or(false, |tile| tile >= WINNING_TILE)
}

/// A 2048 game in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBoard {
    pub grid: Grid<Tile>,
    pub score: u64,
    /// Latched once a winning tile appears
    pub won: bool,
    pub over: bool,
}

impl TileBoard {
    /// Empty board with two starting tiles
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let grid = spawn_tile(&spawn_tile(&Grid::new(SIZE, SIZE), rng), rng);
        Self::from_grid(grid)
    }

    /// Wrap an existing grid, deriving the win and game-over flags
    pub fn from_grid(grid: Grid<Tile>) -> Self {
        Self {
            won: has_won(&grid),
            over: is_stuck(&grid),
            grid,
            score: 0,
        }
    }

    /// Slide, then spawn a tile if anything moved
    pub fn apply_move<R: Rng + ?Sized>(&self, direction: Direction, rng: &mut R) -> MoveResult<TileBoard> {
        if self.over {
            return MoveResult::unchanged(self.clone()).with_terminal(Some(TerminalKind::Stuck));
        }

        let shifted = shift(&self.grid, direction);
        if !shifted.changed {
            return MoveResult::unchanged(self.clone());
        }

        let grid = spawn_tile(&shifted.state, rng);
        let over = is_stuck(&grid);
        let board = TileBoard {
            won: self.won || has_won(&grid),
            over,
            score: self.score + shifted.score_delta as u64,
            grid,
        };
        if board.won && !self.won {
            debug!(score = board.score, "winning tile reached");
        }

        MoveResult::changed(board, shifted.score_delta)
            .with_terminal(over.then_some(TerminalKind::Stuck))
    }
}

/// TileMerge game implementation
#[derive(Debug, Default)]
pub struct TileMerge;

impl TileMerge {
    pub fn new() -> Self {
        Self
    }
}

impl Game for TileMerge {
    type State = TileBoard;
    type Command = Direction;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "2048".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape { rows: SIZE, cols: SIZE },
            commands: vec![
                CommandSpec { name: "left", usage: "left | l", summary: "Slide tiles left" },
                CommandSpec { name: "right", usage: "right | r", summary: "Slide tiles right" },
                CommandSpec { name: "up", usage: "up | u", summary: "Slide tiles up" },
                CommandSpec { name: "down", usage: "down | d", summary: "Slide tiles down" },
            ],
            tracks_score: true,
        }
    }

    fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State {
        TileBoard::new(rng)
    }

    fn apply(&mut self, state: &Self::State, command: Self::Command, rng: &mut ChaCha20Rng) -> MoveResult<Self::State> {
        state.apply_move(command, rng)
    }

    fn parse_command(&self, _state: &Self::State, input: &str) -> Result<Self::Command, CommandError> {
        let tokens = CommandTokens::parse(input)?;
        let direction = match tokens.verb() {
            "left" | "l" => Direction::Left,
            "right" | "r" => Direction::Right,
            "up" | "u" => Direction::Up,
            "down" | "d" => Direction::Down,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        tokens.finish()?;
        Ok(direction)
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let lines = state
            .grid
            .rows_iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match tile {
                        Some(value) => format!("{value:>5}"),
                        None => format!("{:>5}", "."),
                    })
                    .collect::<String>()
            })
            .collect();

        let status = match (state.over, state.won) {
            (true, _) => "no moves left".to_string(),
            (false, true) => format!("{WINNING_TILE} reached, keep going"),
            (false, false) => String::new(),
        };

        Snapshot {
            lines,
            score: Some(state.score),
            status,
            terminal: state.over.then_some(TerminalKind::Stuck),
        }
    }
}
