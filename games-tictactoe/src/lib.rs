//! TicTacToe with an exhaustive minimax opponent
//!
//! The board is small enough that `best_move` searches the whole remaining
//! game tree on every call. Terminal positions score +10 for the engine's
//! side, -10 for the other side and 0 for a draw; ties between equally good
//! cells go to the lowest index.

use engine_core::outcome::{MoveResult, TerminalKind};
use engine_core::typed::{
    BoardShape, Capabilities, CommandError, CommandSpec, CommandTokens, EngineId, Game, Snapshot,
};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

pub const CELLS: usize = 9;

const WIN_SCORE: i32 = 10;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // columns
    [0, 4, 8], [2, 4, 6],            // diagonals
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// Cells in reading order, index 0 top-left to 8 bottom-right
pub type Board = [Option<Mark>; CELLS];

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Mark),
    Draw,
}

/// Mark holding a complete line, if any
pub fn winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => Some(mark),
        _ => None,
    })
}

pub fn is_full(board: &Board) -> bool {
    board.iter().all(Option::is_some)
}

/// Empty cells in ascending index order
pub fn legal_moves(board: &Board) -> Vec<usize> {
    (0..CELLS).filter(|&i| board[i].is_none()).collect()
}

fn outcome_of(board: &Board) -> Option<Outcome> {
    match winner(board) {
        Some(mark) => Some(Outcome::Winner(mark)),
        None if is_full(board) => Some(Outcome::Draw),
        None => None,
    }
}

/// Terminal evaluation used by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scoring {
    /// Every win is +10 and every loss -10, however many plies away
    #[default]
    Flat,
    /// `10 - depth` for a win and `depth - 10` for a loss, preferring fast
    /// wins and slow losses
    DepthAdjusted,
}

impl Scoring {
    fn terminal(self, engine_won: bool, depth: i32) -> i32 {
        let discount = match self {
            Scoring::Flat => 0,
            Scoring::DepthAdjusted => depth,
        };
        if engine_won {
            WIN_SCORE - discount
        } else {
            discount - WIN_SCORE
        }
    }
}

fn minimax(board: &mut Board, engine: Mark, to_move: Mark, depth: i32, scoring: Scoring) -> i32 {
    if let Some(mark) = winner(board) {
        return scoring.terminal(mark == engine, depth);
    }
    if is_full(board) {
        return 0;
    }

    let maximizing = to_move == engine;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for cell in 0..CELLS {
        if board[cell].is_some() {
            continue;
        }
        board[cell] = Some(to_move);
        let score = minimax(board, engine, to_move.opponent(), depth + 1, scoring);
        board[cell] = None;

        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

/// Value of each empty cell for `engine` moving next, in index order
pub fn move_scores(board: &Board, engine: Mark, scoring: Scoring) -> Vec<(usize, i32)> {
    let mut scratch = *board;
    legal_moves(board)
        .into_iter()
        .map(|cell| {
            scratch[cell] = Some(engine);
            let score = minimax(&mut scratch, engine, engine.opponent(), 1, scoring);
            scratch[cell] = None;
            (cell, score)
        })
        .collect()
}

/// Optimal cell for `engine` to play next.
///
/// Returns `None` once the board has a winner or no empty cell.
pub fn best_move(board: &Board, engine: Mark, scoring: Scoring) -> Option<usize> {
    if outcome_of(board).is_some() {
        return None;
    }

    let mut best: Option<(usize, i32)> = None;
    for (cell, score) in move_scores(board, engine, scoring) {
        // Strictly greater keeps the lowest index on ties
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((cell, score));
        }
    }

    if let Some((cell, score)) = best {
        debug!(cell, score, mark = ?engine, "minimax chose move");
    }
    best.map(|(cell, _)| cell)
}

/// TicTacToe game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub board: Board,
    pub to_move: Mark,
    pub outcome: Option<Outcome>,
}

impl State {
    /// Empty board with X to move
    pub fn new() -> Self {
        Self {
            board: [None; CELLS],
            to_move: Mark::X,
            outcome: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_done() {
            return Vec::new();
        }
        legal_moves(&self.board)
    }

    /// Place the side to move at `index` and pass the turn.
    ///
    /// Occupied cells, indices past the board and finished games leave the
    /// state as it was.
    pub fn place(&self, index: usize) -> MoveResult<State> {
        if self.is_done() || index >= CELLS || self.board[index].is_some() {
            return MoveResult::unchanged(*self);
        }

        let mut next = *self;
        next.board[index] = Some(self.to_move);
        next.outcome = outcome_of(&next.board);
        if next.outcome.is_none() {
            next.to_move = self.to_move.opponent();
        }
        MoveResult::changed(next, 0)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicTacToeCommand {
    Place(usize),
    /// Let the engine choose for the side to move
    Ai,
}

/// TicTacToe game implementation
///
/// In versus mode the engine plays `ai` and answers every placement by the
/// other side immediately. In two-player mode nobody moves automatically,
/// though either side can still ask the engine for a move.
#[derive(Debug, Clone, Copy)]
pub struct TicTacToe {
    ai: Option<Mark>,
    scoring: Scoring,
}

impl TicTacToe {
    pub fn versus_ai(ai: Mark) -> Self {
        Self {
            ai: Some(ai),
            scoring: Scoring::default(),
        }
    }

    pub fn two_player() -> Self {
        Self {
            ai: None,
            scoring: Scoring::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Engine move for whoever is to move; unchanged once the game is over
    fn engine_turn(&self, state: &State) -> MoveResult<State> {
        match best_move(&state.board, state.to_move, self.scoring) {
            Some(cell) => state.place(cell),
            None => MoveResult::unchanged(*state),
        }
    }

    fn reply(&self, mut result: MoveResult<State>) -> MoveResult<State> {
        if result.changed && !result.state.is_done() && self.ai == Some(result.state.to_move) {
            result.state = self.engine_turn(&result.state).state;
        }
        result
    }

    fn terminal(&self, state: &State) -> Option<TerminalKind> {
        match state.outcome? {
            Outcome::Draw => Some(TerminalKind::Draw),
            Outcome::Winner(mark) if self.ai == Some(mark) => Some(TerminalKind::Lost),
            Outcome::Winner(_) => Some(TerminalKind::Won),
        }
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::versus_ai(Mark::O)
    }
}

impl Game for TicTacToe {
    type State = State;
    type Command = TicTacToeCommand;

    fn engine_id(&self) -> EngineId {
        let env_id = if self.ai.is_some() { "tictactoe" } else { "tictactoe-duo" };
        EngineId {
            env_id: env_id.to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape { rows: 3, cols: 3 },
            commands: vec![
                CommandSpec {
                    name: "place",
                    usage: "place <0-8> | p <0-8> | <0-8>",
                    summary: "Mark a cell for the side to move",
                },
                CommandSpec {
                    name: "ai",
                    usage: "ai",
                    summary: "Let the engine move for the side to move",
                },
            ],
            tracks_score: false,
        }
    }

    fn new_game(&mut self, _rng: &mut ChaCha20Rng) -> Self::State {
        let state = State::new();
        if self.ai == Some(state.to_move) {
            return self.engine_turn(&state).state;
        }
        state
    }

    fn apply(&mut self, state: &Self::State, command: Self::Command, _rng: &mut ChaCha20Rng) -> MoveResult<Self::State> {
        let result = match command {
            TicTacToeCommand::Place(index) => state.place(index),
            TicTacToeCommand::Ai => self.engine_turn(state),
        };
        let result = self.reply(result);
        let terminal = self.terminal(&result.state);
        result.with_terminal(terminal)
    }

    fn parse_command(&self, _state: &Self::State, input: &str) -> Result<Self::Command, CommandError> {
        let mut tokens = CommandTokens::parse(input)?;
        let index = match tokens.verb() {
            "ai" => {
                tokens.finish()?;
                return Ok(TicTacToeCommand::Ai);
            }
            "place" | "p" => tokens.next_usize("a cell index 0-8")?,
            other => other
                .parse::<usize>()
                .map_err(|_| CommandError::Unknown(other.to_string()))?,
        };
        tokens.finish()?;

        if index >= CELLS {
            return Err(CommandError::IndexOutOfRange { index, max: CELLS });
        }
        Ok(TicTacToeCommand::Place(index))
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let lines = state
            .board
            .chunks(3)
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| match cell {
                        Some(mark) => mark.symbol(),
                        None => char::from(b'0' + (row * 3 + col) as u8),
                    })
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let status = match state.outcome {
            Some(Outcome::Winner(mark)) => format!("{} wins", mark.symbol()),
            Some(Outcome::Draw) => "draw".to_string(),
            None => format!("{} to move", state.to_move.symbol()),
        };

        Snapshot {
            lines,
            score: None,
            status,
            terminal: self.terminal(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Board from a 9-character picture, `.` for empty
    fn board(picture: &str) -> Board {
        let mut board = [None; CELLS];
        for (cell, ch) in board.iter_mut().zip(picture.chars()) {
            *cell = match ch {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        board
    }

    fn play(moves: &[usize]) -> State {
        moves
            .iter()
            .fold(State::new(), |state, &cell| state.place(cell).state)
    }

    #[test]
    fn test_initial_state() {
        let state = State::new();
        assert_eq!(state.board, [None; CELLS]);
        assert_eq!(state.to_move, Mark::X);
        assert_eq!(state.outcome, None);
        assert_eq!(state.legal_moves(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_place_alternates_turns() {
        let result = State::new().place(4);
        assert!(result.changed);
        assert_eq!(result.state.board[4], Some(Mark::X));
        assert_eq!(result.state.to_move, Mark::O);

        let legal = result.state.legal_moves();
        assert_eq!(legal.len(), 8);
        assert!(!legal.contains(&4));
    }

    #[test]
    fn test_invalid_place_is_noop() {
        let state = play(&[4]);
        let occupied = state.place(4);
        assert!(!occupied.changed);
        assert_eq!(occupied.state, state);

        let outside = state.place(9);
        assert!(!outside.changed);
    }

    #[test]
    fn test_winning_game() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert_eq!(state.outcome, Some(Outcome::Winner(Mark::X)));
        assert!(state.legal_moves().is_empty());
        assert!(!state.place(8).changed);
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X O / O X O
        let board = board("XOXOXOOXO");
        assert_eq!(winner(&board), None);
        assert!(is_full(&board));
        assert_eq!(outcome_of(&board), Some(Outcome::Draw));
        assert_eq!(best_move(&board, Mark::X, Scoring::Flat), None);
    }

    #[test]
    fn test_best_move_takes_win() {
        // O O . / X X . / X . .
        let board = board("OO.XX.X..");
        assert_eq!(best_move(&board, Mark::O, Scoring::Flat), Some(2));
    }

    #[test]
    fn test_best_move_blocks_threat() {
        // X X . / . O . / . . .
        let board = board("XX..O....");
        assert_eq!(best_move(&board, Mark::O, Scoring::Flat), Some(2));
    }

    #[test]
    fn test_empty_board_tie_breaks_to_lowest_index() {
        let board = [None; CELLS];
        assert_eq!(best_move(&board, Mark::X, Scoring::Flat), Some(0));
        assert!(move_scores(&board, Mark::X, Scoring::Flat)
            .iter()
            .all(|&(_, score)| score == 0));
    }

    #[test]
    fn test_flat_scoring_ignores_win_speed() {
        // X . . / X O O / . . .  with X to move: 6 wins at once, while 1 sets
        // up a fork that wins two plies later
        let board = board("X..XOO...");
        let flat = move_scores(&board, Mark::X, Scoring::Flat);
        assert!(flat.contains(&(6, WIN_SCORE)));
        assert_eq!(best_move(&board, Mark::X, Scoring::Flat), Some(1));
        assert_eq!(best_move(&board, Mark::X, Scoring::DepthAdjusted), Some(6));
    }

    #[test]
    fn test_finished_board_has_no_best_move() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert_eq!(best_move(&state.board, Mark::O, Scoring::Flat), None);
    }

    #[test]
    fn test_versus_ai_answers_each_placement() {
        let mut game = TicTacToe::versus_ai(Mark::O);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let state = game.new_game(&mut rng);
        assert_eq!(state, State::new());

        let result = game.apply(&state, TicTacToeCommand::Place(0), &mut rng);
        assert!(result.changed);
        assert_eq!(result.state.to_move, Mark::X);
        assert_eq!(result.state.board.iter().flatten().count(), 2);
        assert_eq!(result.state.board[4], Some(Mark::O));
        assert_eq!(result.terminal, None);
    }

    #[test]
    fn test_ai_playing_x_opens() {
        let mut game = TicTacToe::versus_ai(Mark::X);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let state = game.new_game(&mut rng);
        assert_eq!(state.board[0], Some(Mark::X));
        assert_eq!(state.to_move, Mark::O);
    }

    #[test]
    fn test_ai_win_reports_loss() {
        let mut game = TicTacToe::versus_ai(Mark::O);
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        // O O . / X X . / . . .  and X misses the block at 5
        let state = State {
            board: board("OO.XX...."),
            to_move: Mark::X,
            outcome: None,
        };

        let result = game.apply(&state, TicTacToeCommand::Place(6), &mut rng);
        assert_eq!(result.state.outcome, Some(Outcome::Winner(Mark::O)));
        assert_eq!(result.terminal, Some(TerminalKind::Lost));
    }

    #[test]
    fn test_two_player_mode_never_moves_alone() {
        let mut game = TicTacToe::two_player();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let state = game.new_game(&mut rng);

        let result = game.apply(&state, TicTacToeCommand::Place(4), &mut rng);
        assert_eq!(result.state.board.iter().flatten().count(), 1);
        assert_eq!(result.state.to_move, Mark::O);

        let ai = game.apply(&result.state, TicTacToeCommand::Ai, &mut rng);
        assert_eq!(ai.state.board[0], Some(Mark::O));
        assert_eq!(game.engine_id().env_id, "tictactoe-duo");
    }

    #[test]
    fn test_two_player_win_is_won() {
        let mut game = TicTacToe::two_player();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let state = play(&[0, 3, 1, 4]);

        let result = game.apply(&state, TicTacToeCommand::Place(2), &mut rng);
        assert_eq!(result.terminal, Some(TerminalKind::Won));

        let after = game.apply(&result.state, TicTacToeCommand::Place(8), &mut rng);
        assert!(!after.changed);
        assert_eq!(after.terminal, Some(TerminalKind::Won));
    }

    #[test]
    fn test_parse_command() {
        let game = TicTacToe::default();
        let state = State::new();

        assert_eq!(game.parse_command(&state, "place 4"), Ok(TicTacToeCommand::Place(4)));
        assert_eq!(game.parse_command(&state, "p 8"), Ok(TicTacToeCommand::Place(8)));
        assert_eq!(game.parse_command(&state, "0"), Ok(TicTacToeCommand::Place(0)));
        assert_eq!(game.parse_command(&state, "AI"), Ok(TicTacToeCommand::Ai));
        assert_eq!(
            game.parse_command(&state, "9"),
            Err(CommandError::IndexOutOfRange { index: 9, max: 9 })
        );
        assert_eq!(
            game.parse_command(&state, "place x"),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            game.parse_command(&state, "swap"),
            Err(CommandError::Unknown("swap".to_string()))
        );
        assert!(game.parse_command(&state, "ai 3").is_err());
    }

    #[test]
    fn test_snapshot_numbers_empty_cells() {
        let game = TicTacToe::default();
        let state = play(&[4, 0]);
        let snapshot = game.snapshot(&state);

        assert_eq!(snapshot.lines, vec!["O 1 2", "3 X 5", "6 7 8"]);
        assert_eq!(snapshot.status, "X to move");
        assert_eq!(snapshot.score, None);
    }
}
