//! Tetris-style block stacking for the arcade engine
//!
//! Pieces fall on a 20x10 board. Rotation is a plain clockwise matrix turn
//! around the piece's top-left corner with no wall kicks. Locking a piece
//! clears every full row and scores 0/100/300/500/800 for 0..=4 rows.

pub mod piece;
pub mod stack;

use engine_core::outcome::{MoveResult, TerminalKind};
use engine_core::typed::{
    BoardShape, Capabilities, CommandError, CommandSpec, CommandTokens, EngineId, Game, Snapshot,
};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

pub use piece::{Piece, Tetromino};
pub use stack::{clear_full_rows, collides, line_clear_points, Board, DisplayCell, Stack, COLS, ROWS};

/// Player or clock input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackCommand {
    Left,
    Right,
    Rotate,
    SoftDrop,
    HardDrop,
    Tick,
    Spawn,
}

/// BlockStack game implementation
///
/// Keeps a piece in play at all times: whenever a command locks the active
/// piece, the next one is spawned before the result is returned.
#[derive(Debug, Default)]
pub struct BlockStack;

impl BlockStack {
    pub fn new() -> Self {
        Self
    }

    fn follow_up(result: MoveResult<Stack>, rng: &mut ChaCha20Rng) -> MoveResult<Stack> {
        if !result.changed || result.state.over || result.state.active.is_some() {
            return result;
        }

        let spawned = result.state.spawn(Tetromino::random(rng));
        debug!(
            score = spawned.state.score,
            over = spawned.state.over,
            "spawned next piece"
        );
        MoveResult {
            state: spawned.state,
            score_delta: result.score_delta,
            changed: true,
            terminal: spawned.terminal,
        }
    }
}

impl Game for BlockStack {
    type State = Stack;
    type Command = StackCommand;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "tetris".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            board: BoardShape { rows: ROWS, cols: COLS },
            commands: vec![
                CommandSpec { name: "left", usage: "left | a", summary: "Shift the piece one column left" },
                CommandSpec { name: "right", usage: "right | d", summary: "Shift the piece one column right" },
                CommandSpec { name: "rotate", usage: "rotate | w", summary: "Turn the piece clockwise" },
                CommandSpec { name: "down", usage: "down | s", summary: "Drop one row, locking if blocked" },
                CommandSpec { name: "drop", usage: "drop", summary: "Move the piece to its landing row" },
                CommandSpec { name: "tick", usage: "tick | t", summary: "Advance gravity by one step" },
                CommandSpec { name: "spawn", usage: "spawn", summary: "Bring in a piece if none is falling" },
            ],
            tracks_score: true,
        }
    }

    fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State {
        Stack::new().spawn(Tetromino::random(rng)).state
    }

    fn apply(&mut self, state: &Self::State, command: Self::Command, rng: &mut ChaCha20Rng) -> MoveResult<Self::State> {
        let result = match command {
            StackCommand::Left => state.move_left(),
            StackCommand::Right => state.move_right(),
            StackCommand::Rotate => state.rotate(),
            StackCommand::SoftDrop => state.soft_drop(),
            StackCommand::HardDrop => state.hard_drop(),
            StackCommand::Tick => state.tick(rng),
            StackCommand::Spawn => state.spawn(Tetromino::random(rng)),
        };
        Self::follow_up(result, rng)
    }

    fn parse_command(&self, _state: &Self::State, input: &str) -> Result<Self::Command, CommandError> {
        let tokens = CommandTokens::parse(input)?;
        let command = match tokens.verb() {
            "left" | "a" => StackCommand::Left,
            "right" | "d" => StackCommand::Right,
            "rotate" | "w" => StackCommand::Rotate,
            "down" | "s" => StackCommand::SoftDrop,
            "drop" => StackCommand::HardDrop,
            "tick" | "t" => StackCommand::Tick,
            "spawn" => StackCommand::Spawn,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        tokens.finish()?;
        Ok(command)
    }

    fn snapshot(&self, state: &Self::State) -> Snapshot {
        let lines = state
            .composite()
            .rows_iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        DisplayCell::Empty => '.',
                        DisplayCell::Ghost => ':',
                        DisplayCell::Block(kind) => kind.symbol(),
                    })
                    .collect::<String>()
            })
            .collect();

        let status = if state.over {
            format!("game over after {} lines", state.lines)
        } else {
            format!("lines: {}", state.lines)
        };

        Snapshot {
            lines,
            score: Some(state.score),
            status,
            terminal: state.over.then_some(TerminalKind::ToppedOut),
        }
    }
}
