//! Typed Game trait providing ergonomic interface for board engines
//!
//! This trait allows engines to work with strongly-typed state and command
//! types while the adapter layer exposes them to callers through plain text
//! commands and rendered snapshots.

use std::fmt;

use rand_chacha::ChaCha20Rng;

use crate::outcome::{MoveResult, TerminalKind};

/// Engine identification information
#[derive(Debug, Clone, PartialEq)]
pub struct EngineId {
    pub env_id: String,
    pub build_id: String,
}

/// Board dimensions reported by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardShape {
    pub rows: usize,
    pub cols: usize,
}

/// One command verb accepted by an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Game capabilities and configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub id: EngineId,
    pub board: BoardShape,
    pub commands: Vec<CommandSpec>,
    /// Whether the game produces a cumulative score worth persisting
    pub tracks_score: bool,
}

/// Renderable view of a game state handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// One text line per board row
    pub lines: Vec<String>,
    pub score: Option<u64>,
    /// Short human-readable status, e.g. "mines left: 12" or "X to move"
    pub status: String,
    pub terminal: Option<TerminalKind>,
}

/// Main trait for engine implementations
///
/// Engines are pure transformations from `(state, command)` to a new state.
/// `apply` never mutates its input; the caller keeps whichever state it
/// wants to continue from.
///
/// # Type Parameters
///
/// * `State` - Complete board state, cloned per command
/// * `Command` - Small, already-validated command value
pub trait Game: Send + Sync + 'static {
    /// Game state type
    type State: Clone + Send + Sync + 'static;

    /// Command type - produced only by `parse_command`
    type Command: Copy + fmt::Debug + Send + Sync + 'static;

    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Get game capabilities and configuration
    fn capabilities(&self) -> Capabilities;

    /// Start a fresh game
    ///
    /// # Arguments
    ///
    /// * `rng` - Deterministic random number generator for reproducible games
    fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State;

    /// Apply one command
    ///
    /// Commands that the rules reject (occupied cells, colliding rotations,
    /// moves after the game ended) come back as `MoveResult::unchanged`.
    fn apply(
        &mut self,
        state: &Self::State,
        command: Self::Command,
        rng: &mut ChaCha20Rng,
    ) -> MoveResult<Self::State>;

    /// Parse and validate a text command against the current state
    ///
    /// This is the input boundary: malformed verbs and out-of-range cells
    /// are rejected here and never reach `apply`.
    fn parse_command(&self, state: &Self::State, input: &str) -> Result<Self::Command, CommandError>;

    /// Render the state for display
    fn snapshot(&self, state: &Self::State) -> Snapshot;
}

/// Error type for rejected text commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument for '{command}': expected {expected}")]
    MissingArgument { command: String, expected: &'static str },
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Unexpected extra input: {0}")]
    TrailingInput(String),
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
    #[error("Cell index {index} is out of range, expected 0..{max}")]
    IndexOutOfRange { index: usize, max: usize },
}

/// Whitespace-separated command tokens with typed accessors
///
/// Shared by every engine's `parse_command`.
#[derive(Debug)]
pub struct CommandTokens<'a> {
    verb: String,
    args: std::str::SplitWhitespace<'a>,
}

impl<'a> CommandTokens<'a> {
    /// Split input into a lowercase verb and its arguments
    pub fn parse(input: &'a str) -> Result<Self, CommandError> {
        let mut args = input.split_whitespace();
        let verb = args.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        Ok(Self { verb, args })
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Next argument as an unsigned number
    pub fn next_usize(&mut self, expected: &'static str) -> Result<usize, CommandError> {
        let raw = self.args.next().ok_or_else(|| CommandError::MissingArgument {
            command: self.verb.clone(),
            expected,
        })?;
        raw.parse()
            .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
    }

    /// Reject any arguments left over
    pub fn finish(mut self) -> Result<(), CommandError> {
        match self.args.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_string())),
            None => Ok(()),
        }
    }
}

/// Check a `(row, col)` pair against board dimensions
pub fn check_bounds(row: usize, col: usize, board: BoardShape) -> Result<(), CommandError> {
    if row < board.rows && col < board.cols {
        Ok(())
    } else {
        Err(CommandError::OutOfBounds {
            row,
            col,
            rows: board.rows,
            cols: board.cols,
        })
    }
}
