//! Minesweeper-style minefield for the arcade engine
//!
//! Mines are laid once per game and every neighbour count is fixed at that
//! moment. Revealing a zero-count cell flood-fills across the connected zero
//! region and its numbered border using an explicit stack.

use engine_core::grid::Grid;
use engine_core::outcome::{MoveResult, TerminalKind};
use engine_core::typed::{
    check_bounds, BoardShape, Capabilities, CommandError, CommandSpec, CommandTokens, EngineId, Game,
    Snapshot,
};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// One square of the minefield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mines in the 8 surrounding cells, fixed at generation
    pub neighbor_mines: u8,
}

/// Whether the first reveal is protected from mines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FirstClick {
    /// Mines are laid before any reveal; the first click can hit one
    #[default]
    Unprotected,
    /// Mines are laid on the first reveal, never under the revealed cell
    Safe,
}

/// Board dimensions, mine count and first-click policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinefieldConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    pub first_click: FirstClick,
}

impl MinefieldConfig {
    /// 16x16 board with 40 mines
    pub fn classic() -> Self {
        Self {
            rows: 16,
            cols: 16,
            mines: 40,
            first_click: FirstClick::Unprotected,
        }
    }

    pub fn with_first_click(mut self, first_click: FirstClick) -> Self {
        self.first_click = first_click;
        self
    }

    pub fn validate(&self) -> Result<(), MinefieldError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MinefieldError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let cells = self.rows * self.cols;
        let capacity = match self.first_click {
            FirstClick::Unprotected => cells,
            FirstClick::Safe => cells - 1,
        };
        if self.mines > capacity {
            return Err(MinefieldError::TooManyMines {
                mines: self.mines,
                capacity,
            });
        }
        Ok(())
    }
}

impl Default for MinefieldConfig {
    fn default() -> Self {
        Self::classic()
    }
}

/// Error type for minefield construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MinefieldError {
    #[error("Board must have at least one row and column, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("Cannot place {mines} mines, at most {capacity} fit")]
    TooManyMines { mines: usize, capacity: usize },
    #[error("Mine position ({row}, {col}) is outside the board")]
    MineOutOfBounds { row: usize, col: usize },
}

/// Progress of a minefield game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Playing,
    Won,
    Lost,
}

impl FieldStatus {
    fn terminal(self) -> Option<TerminalKind> {
        match self {
            FieldStatus::Playing => None,
            FieldStatus::Won => Some(TerminalKind::Won),
            FieldStatus::Lost => Some(TerminalKind::Lost),
        }
    }
}

/// A minefield game in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minefield {
    grid: Grid<Cell>,
    mines: usize,
    flags: usize,
    status: FieldStatus,
    first_click: FirstClick,
    mines_placed: bool,
}

impl Minefield {
    /// Validate the config and generate a new field
    pub fn new<R: Rng + ?Sized>(config: MinefieldConfig, rng: &mut R) -> Result<Self, MinefieldError> {
        config.validate()?;
        Ok(Self::generate(config, rng))
    }

    // Config must already be validated
    fn generate<R: Rng + ?Sized>(config: MinefieldConfig, rng: &mut R) -> Self {
        let mut field = Self {
            grid: Grid::new(config.rows, config.cols),
            mines: config.mines,
            flags: 0,
            status: FieldStatus::Playing,
            first_click: config.first_click,
            mines_placed: false,
        };
        if config.first_click == FirstClick::Unprotected {
            field.lay_mines(rng, None);
        }
        field
    }

    /// Build a field with mines at exactly the given positions
    pub fn from_mine_positions(
        rows: usize,
        cols: usize,
        mines: &[(usize, usize)],
    ) -> Result<Self, MinefieldError> {
        if rows == 0 || cols == 0 {
            return Err(MinefieldError::EmptyBoard { rows, cols });
        }

        let mut grid: Grid<Cell> = Grid::new(rows, cols);
        for &(row, col) in mines {
            let cell = grid
                .get_mut(row, col)
                .ok_or(MinefieldError::MineOutOfBounds { row, col })?;
            cell.is_mine = true;
        }

        let mut field = Self {
            mines: grid.count(|cell| cell.is_mine),
            grid,
            flags: 0,
            status: FieldStatus::Playing,
            first_click: FirstClick::Unprotected,
            mines_placed: true,
        };
        field.count_neighbor_mines();
        Ok(field)
    }

    /// Sample positions until `mines` distinct cells hold a mine
    fn lay_mines<R: Rng + ?Sized>(&mut self, rng: &mut R, keep_clear: Option<(usize, usize)>) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let mut placed = 0;
        while placed < self.mines {
            let pos = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            if Some(pos) == keep_clear || self.grid[pos].is_mine {
                continue;
            }
            self.grid[pos].is_mine = true;
            placed += 1;
        }
        self.count_neighbor_mines();
        self.mines_placed = true;
    }

    fn count_neighbor_mines(&mut self) {
        let positions: Vec<(usize, usize)> = self.grid.positions().collect();
        for (r, c) in positions {
            if self.grid[(r, c)].is_mine {
                continue;
            }
            let count = self
                .grid
                .neighbors(r, c)
                .filter(|&pos| self.grid[pos].is_mine)
                .count();
            self.grid[(r, c)].neighbor_mines = count as u8;
        }
    }

    /// Lay deferred mines before the first reveal, keeping `(row, col)` clear.
    ///
    /// Does nothing if mines are already placed or the reveal would be a no-op.
    pub fn arm<R: Rng + ?Sized>(&self, row: usize, col: usize, rng: &mut R) -> Minefield {
        let mut armed = self.clone();
        let target_open = matches!(
            self.grid.get(row, col),
            Some(cell) if !cell.is_revealed && !cell.is_flagged
        );
        if !self.mines_placed && self.status == FieldStatus::Playing && target_open {
            armed.lay_mines(rng, Some((row, col)));
            debug!(row, col, "mines laid around first reveal");
        }
        armed
    }

    /// Reveal a cell.
    ///
    /// Revealed or flagged cells, out-of-range positions, finished games and
    /// fields whose mines are not laid yet are no-ops. A mine loses the game
    /// and exposes every mine; a safe cell flood-fills from zero counts.
    pub fn reveal(&self, row: usize, col: usize) -> MoveResult<Minefield> {
        if self.status != FieldStatus::Playing {
            return MoveResult::unchanged(self.clone()).with_terminal(self.status.terminal());
        }
        let Some(cell) = self.grid.get(row, col) else {
            return MoveResult::unchanged(self.clone());
        };
        if cell.is_revealed || cell.is_flagged || !self.mines_placed {
            return MoveResult::unchanged(self.clone());
        }

        let mut next = self.clone();

        if cell.is_mine {
            next.grid[(row, col)].is_revealed = true;
            for cell in next.grid.iter_mut().filter(|cell| cell.is_mine) {
                cell.is_revealed = true;
            }
            next.status = FieldStatus::Lost;
            debug!(row, col, "mine revealed");
            return MoveResult::changed(next, 0).with_terminal(Some(TerminalKind::Lost));
        }

        let mut stack = vec![(row, col)];
        while let Some(pos) = stack.pop() {
            let current = &mut next.grid[pos];
            if current.is_revealed || current.is_flagged {
                continue;
            }
            current.is_revealed = true;
            if current.neighbor_mines == 0 {
                for neighbor in next.grid.neighbors(pos.0, pos.1) {
                    if !next.grid[neighbor].is_revealed {
                        stack.push(neighbor);
                    }
                }
            }
        }

        if next.all_safe_cells_revealed() {
            next.status = FieldStatus::Won;
            debug!(revealed = next.revealed_count(), "field cleared");
        }
        let terminal = next.status.terminal();
        MoveResult::changed(next, 0).with_terminal(terminal)
    }

    /// Flip the flag on an unrevealed cell while the game is running
    pub fn toggle_flag(&self, row: usize, col: usize) -> MoveResult<Minefield> {
        if self.status != FieldStatus::Playing {
            return MoveResult::unchanged(self.clone()).with_terminal(self.status.terminal());
        }
        match self.grid.get(row, col) {
            Some(cell) if !cell.is_revealed => {}
            _ => return MoveResult::unchanged(self.clone()),
        }

        let mut next = self.clone();
        let cell = &mut next.grid[(row, col)];
        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            next.flags += 1;
        } else {
            next.flags -= 1;
        }
        MoveResult::changed(next, 0)
    }

    fn all_safe_cells_revealed(&self) -> bool {
        self.grid.iter().all(|cell| cell.is_mine || cell.is_revealed)
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn mine_count(&self) -> usize {
        self.mines
    }

    /// Mines minus flags; negative when over-flagged
    pub fn remaining_mines(&self) -> i32 {
        self.mines as i32 - self.flags as i32
    }

    pub fn revealed_count(&self) -> usize {
        self.grid.count(|cell| cell.is_revealed)
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn first_click(&self) -> FirstClick {
        self.first_click
    }
}

/// Minefield commands, coordinates already bounds-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinefieldCommand {
    Reveal { row: usize, col: usize },
    ToggleFlag { row: usize, col: usize },
}

/// Minesweeper game implementation
#[derive(Debug)]
pub struct Minesweeper {
    config: MinefieldConfig,
}

impl Minesweeper {
    pub fn new(config: MinefieldConfig) -> Result<Self, MinefieldError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Classic board with the first reveal guaranteed safe
    pub fn safe_first_click() -> Self {
        Self {
            config: MinefieldConfig::classic().with_first_click(FirstClick::Safe),
        }
    }
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self {
            config: MinefieldConfig::classic(),
        }
    }
}

fn render_cell(cell: &Cell) -> char {
    match (cell.is_revealed, cell.is_flagged, cell.is_mine) {
        (false, true, _) => 'F',
        (false, false, _) => '#',
        (true, _, true) => '*',
        (true, _, false) if cell.neighbor_mines == 0 => '.',
        (true, _, false) => char::from(b'0' + cell.neighbor_mines),
    }
}

impl Game for Minesweeper {
    type State = Minefield;
    type Command = MinefieldCommand;

    fn engine_id(&self) -> EngineId {
        let env_id = match self.config.first_click {
            FirstClick::Unprotected => "minesweeper",
            FirstClick::Safe => "minesweeper-safe",
        };
        EngineId {
            env_id: env_id.to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape {
                rows: self.config.rows,
                cols: self.config.cols,
            },
            commands: vec![
                CommandSpec {
                    name: "reveal",
                    usage: "reveal <row> <col> | r <row> <col>",
                    summary: "Uncover a cell",
                },
                CommandSpec {
                    name: "flag",
                    usage: "flag <row> <col> | f <row> <col>",
                    summary: "Toggle a flag on a hidden cell",
                },
            ],
            tracks_score: false,
        }
    }

    fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State {
        Minefield::generate(self.config, rng)
    }

    fn apply(&mut self, state: &Self::State, command: Self::Command, rng: &mut ChaCha20Rng) -> MoveResult<Self::State> {
        match command {
            MinefieldCommand::Reveal { row, col } => state.arm(row, col, rng).reveal(row, col),
            MinefieldCommand::ToggleFlag { row, col } => state.toggle_flag(row, col),
        }
    }

    fn parse_command(&self, state: &Self::State, input: &str) -> Result<Self::Command, CommandError> {
        let mut tokens = CommandTokens::parse(input)?;
        let reveal = match tokens.verb() {
            "reveal" | "r" => true,
            "flag" | "f" => false,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        let row = tokens.next_usize("a row")?;
        let col = tokens.next_usize("a column")?;
        tokens.finish()?;

        let board = BoardShape {
            rows: state.grid.rows(),
            cols: state.grid.cols(),
        };
        check_bounds(row, col, board)?;

        Ok(if reveal {
            MinefieldCommand::Reveal { row, col }
        } else {
            MinefieldCommand::ToggleFlag { row, col }
        })
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let lines = state
            .grid
            .rows_iter()
            .map(|row| {
                row.iter()
                    .map(|cell| render_cell(cell).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let mut status = format!("mines left: {}", state.remaining_mines());
        match state.status {
            FieldStatus::Playing => {}
            FieldStatus::Won => status.push_str(" - field cleared"),
            FieldStatus::Lost => status.push_str(" - mine hit"),
        }

        Snapshot {
            lines,
            score: None,
            status,
            terminal: state.status.terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn corner_mine() -> Minefield {
        Minefield::from_mine_positions(3, 3, &[(0, 0)]).unwrap()
    }

    // Zero region reachable from `start` plus its numbered border, by BFS
    fn expected_flood(field: &Minefield, start: (usize, usize)) -> HashSet<(usize, usize)> {
        let grid = field.grid();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((r, c)) = queue.pop_front() {
            if grid[(r, c)].neighbor_mines != 0 {
                continue;
            }
            for n in grid.neighbors(r, c) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    #[test]
    fn test_generation_places_exact_mine_count() {
        let mut rng = ChaCha20Rng::seed_from_u64(40);
        let field = Minefield::new(MinefieldConfig::classic(), &mut rng).unwrap();

        assert_eq!(field.grid().count(|cell| cell.is_mine), 40);
        assert_eq!(field.mine_count(), 40);
        assert_eq!(field.remaining_mines(), 40);
        assert_eq!(field.revealed_count(), 0);
        assert!(field.mines_placed());
    }

    #[test]
    fn test_neighbor_counts_match_mines() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let field = Minefield::new(MinefieldConfig::classic(), &mut rng).unwrap();
        let grid = field.grid();

        for (r, c) in grid.positions() {
            if grid[(r, c)].is_mine {
                continue;
            }
            let expected = grid.neighbors(r, c).filter(|&n| grid[n].is_mine).count();
            assert_eq!(grid[(r, c)].neighbor_mines as usize, expected);
        }
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = Minefield::new(MinefieldConfig::classic(), &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        let b = Minefield::new(MinefieldConfig::classic(), &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_validation() {
        let mut config = MinefieldConfig::classic();
        config.mines = 256;
        assert!(config.validate().is_ok());

        config.first_click = FirstClick::Safe;
        assert_eq!(
            config.validate(),
            Err(MinefieldError::TooManyMines { mines: 256, capacity: 255 })
        );

        config.rows = 0;
        assert!(matches!(config.validate(), Err(MinefieldError::EmptyBoard { .. })));
        assert!(Minesweeper::new(config).is_err());
    }

    #[test]
    fn test_from_mine_positions_rejects_out_of_bounds() {
        assert_eq!(
            Minefield::from_mine_positions(3, 3, &[(3, 0)]),
            Err(MinefieldError::MineOutOfBounds { row: 3, col: 0 })
        );
    }

    #[test]
    fn test_reveal_mine_loses_and_exposes_all_mines() {
        let field = Minefield::from_mine_positions(3, 3, &[(0, 0), (2, 2)]).unwrap();

        let result = field.reveal(0, 0);
        assert!(result.changed);
        assert_eq!(result.terminal, Some(TerminalKind::Lost));
        assert_eq!(result.state.status(), FieldStatus::Lost);
        assert!(result.state.grid()[(2, 2)].is_revealed);
        assert_eq!(result.state.revealed_count(), 2);

        let after = result.state.reveal(1, 1);
        assert!(!after.changed);
        assert_eq!(after.terminal, Some(TerminalKind::Lost));
    }

    #[test]
    fn test_numbered_cell_reveals_only_itself() {
        let result = corner_mine().reveal(1, 1);
        assert!(result.changed);
        assert_eq!(result.state.revealed_count(), 1);
        assert_eq!(result.terminal, None);
    }

    #[test]
    fn test_flood_fill_clears_small_board() {
        let result = corner_mine().reveal(2, 2);
        assert_eq!(result.state.revealed_count(), 8);
        assert!(!result.state.grid()[(0, 0)].is_revealed);
        assert_eq!(result.state.status(), FieldStatus::Won);
        assert_eq!(result.terminal, Some(TerminalKind::Won));
    }

    #[test]
    fn test_flood_fill_cascades_on_classic_board() {
        let mut rng = ChaCha20Rng::seed_from_u64(1234);
        let field = Minefield::new(MinefieldConfig::classic(), &mut rng).unwrap();
        let start = field
            .grid()
            .positions()
            .find(|&pos| {
                let cell = field.grid()[pos];
                !cell.is_mine && cell.neighbor_mines == 0
            })
            .unwrap();

        let result = field.reveal(start.0, start.1);
        let revealed: HashSet<_> = result
            .state
            .grid()
            .positions()
            .filter(|&pos| result.state.grid()[pos].is_revealed)
            .collect();

        assert_eq!(revealed, expected_flood(&field, start));
        assert!(revealed.iter().all(|&pos| !field.grid()[pos].is_mine));
    }

    #[test]
    fn test_reveal_revealed_cell_is_noop() {
        let field = corner_mine().reveal(1, 1).state;
        let again = field.reveal(1, 1);
        assert!(!again.changed);
        assert_eq!(again.state, field);
    }

    #[test]
    fn test_reveal_revealed_zero_cell_is_noop() {
        let field = corner_mine().reveal(2, 2).state;
        assert_eq!(field.grid()[(2, 2)].neighbor_mines, 0);
        let again = field.reveal(2, 2);
        assert!(!again.changed);
        assert_eq!(again.state.revealed_count(), field.revealed_count());

        // Same check while the game is still running
        let open = corner_mine().toggle_flag(2, 0).state.reveal(2, 2).state;
        assert_eq!(open.status(), FieldStatus::Playing);
        let again = open.reveal(2, 2);
        assert!(!again.changed);
        assert_eq!(again.state.revealed_count(), 7);
        assert_eq!(again.state, open);
    }

    #[test]
    fn test_flagged_cell_blocks_reveal_and_flood() {
        let flagged = corner_mine().toggle_flag(2, 0);
        assert!(flagged.changed);
        let field = flagged.state;

        assert!(!field.reveal(2, 0).changed);

        let flooded = field.reveal(2, 2).state;
        assert!(!flooded.grid()[(2, 0)].is_revealed);
        assert_eq!(flooded.revealed_count(), 7);
        assert_eq!(flooded.status(), FieldStatus::Playing);

        let finished = flooded.toggle_flag(2, 0).state.reveal(2, 0);
        assert_eq!(finished.state.status(), FieldStatus::Won);
    }

    #[test]
    fn test_toggle_flag_rules() {
        let field = corner_mine();
        let revealed = field.reveal(1, 1).state;
        assert!(!revealed.toggle_flag(1, 1).changed);
        assert!(!field.toggle_flag(5, 5).changed);

        let once = field.toggle_flag(0, 0).state;
        assert_eq!(once.remaining_mines(), 0);
        let twice = once.toggle_flag(0, 0).state;
        assert_eq!(twice.remaining_mines(), 1);
    }

    #[test]
    fn test_remaining_mines_goes_negative() {
        let field = corner_mine()
            .toggle_flag(0, 1)
            .state
            .toggle_flag(1, 0)
            .state
            .toggle_flag(2, 2)
            .state;
        assert_eq!(field.remaining_mines(), -2);
    }

    #[test]
    fn test_win_ignores_flags() {
        // The flag on the mine plays no part in winning
        let field = Minefield::from_mine_positions(2, 2, &[(0, 0)]).unwrap();
        let field = field.toggle_flag(0, 0).state;
        let field = field.reveal(0, 1).state.reveal(1, 0).state;
        assert_eq!(field.status(), FieldStatus::Playing);

        let result = field.reveal(1, 1);
        assert_eq!(result.state.status(), FieldStatus::Won);
        assert_eq!(result.state.remaining_mines(), 0);
    }

    #[test]
    fn test_safe_first_click_defers_mines() {
        let config = MinefieldConfig::classic().with_first_click(FirstClick::Safe);
        let mut game = Minesweeper::new(config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(99);

        let state = game.new_game(&mut rng);
        assert!(!state.mines_placed());
        assert!(!state.reveal(0, 0).changed);

        let result = game.apply(&state, MinefieldCommand::Reveal { row: 8, col: 8 }, &mut rng);
        assert!(result.changed);
        assert!(result.state.mines_placed());
        assert_ne!(result.terminal, Some(TerminalKind::Lost));
        assert!(!result.state.grid()[(8, 8)].is_mine);
        assert_eq!(result.state.grid().count(|cell| cell.is_mine), 40);
    }

    #[test]
    fn test_safe_first_click_flag_does_not_arm() {
        let mut game = Minesweeper::safe_first_click();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let state = game.new_game(&mut rng);
        let flagged = game.apply(&state, MinefieldCommand::ToggleFlag { row: 0, col: 0 }, &mut rng);
        assert!(!flagged.state.mines_placed());

        let blocked = game.apply(&flagged.state, MinefieldCommand::Reveal { row: 0, col: 0 }, &mut rng);
        assert!(!blocked.changed);
        assert!(!blocked.state.mines_placed());
    }

    #[test]
    fn test_parse_command_bounds() {
        let game = Minesweeper::default();
        let state = Minefield::from_mine_positions(4, 4, &[(0, 0)]).unwrap();

        assert_eq!(
            game.parse_command(&state, "r 3 2"),
            Ok(MinefieldCommand::Reveal { row: 3, col: 2 })
        );
        assert_eq!(
            game.parse_command(&state, "flag 0 1"),
            Ok(MinefieldCommand::ToggleFlag { row: 0, col: 1 })
        );
        assert_eq!(
            game.parse_command(&state, "reveal 4 0"),
            Err(CommandError::OutOfBounds { row: 4, col: 0, rows: 4, cols: 4 })
        );
        assert!(matches!(
            game.parse_command(&state, "reveal 1"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_snapshot_rendering() {
        let game = Minesweeper::default();
        let state = corner_mine().toggle_flag(0, 0).state.reveal(1, 1).state;
        let snapshot = game.snapshot(&state);

        assert_eq!(snapshot.lines, vec!["F # #", "# 1 #", "# # #"]);
        assert_eq!(snapshot.status, "mines left: 0");
        assert_eq!(snapshot.terminal, None);
    }

    #[test]
    fn test_engine_ids() {
        assert_eq!(Minesweeper::default().engine_id().env_id, "minesweeper");
        assert_eq!(Minesweeper::safe_first_click().engine_id().env_id, "minesweeper-safe");
    }

    proptest! {
        #[test]
        fn won_iff_all_safe_cells_revealed(
            mines in proptest::collection::hash_set((0usize..5, 0usize..5), 1..8),
            reveals in proptest::collection::vec((0usize..5, 0usize..5), 1..30),
            flags in proptest::collection::vec((0usize..5, 0usize..5), 0..6),
        ) {
            let positions: Vec<_> = mines.into_iter().collect();
            let mut field = Minefield::from_mine_positions(5, 5, &positions).unwrap();
            for (r, c) in flags {
                field = field.toggle_flag(r, c).state;
            }

            let mut revealed = field.revealed_count();
            for (r, c) in reveals {
                field = field.reveal(r, c).state;
                prop_assert!(field.revealed_count() >= revealed);
                revealed = field.revealed_count();

                if field.status() != FieldStatus::Lost {
                    let all_safe = field.revealed_count() == 25 - field.mine_count();
                    prop_assert_eq!(field.status() == FieldStatus::Won, all_safe);
                }
            }
        }
    }
}
