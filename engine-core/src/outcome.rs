//! Uniform result shape returned by every engine command

use std::fmt;

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    /// The player reached the winning condition (all safe cells revealed, a line of three)
    Won,
    /// The player hit a losing condition (revealed a mine)
    Lost,
    /// The board filled up with no winner
    Draw,
    /// No move in any direction changes the board
    Stuck,
    /// A new piece could not be placed at its spawn position
    ToppedOut,
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TerminalKind::Won => "won",
            TerminalKind::Lost => "lost",
            TerminalKind::Draw => "draw",
            TerminalKind::Stuck => "stuck",
            TerminalKind::ToppedOut => "topped out",
        };
        f.write_str(label)
    }
}

/// Result of applying one command to a game state
///
/// `terminal` always describes the returned `state`, so a command that is
/// rejected because the game already ended still reports how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult<S> {
    pub state: S,
    pub score_delta: u32,
    pub changed: bool,
    pub terminal: Option<TerminalKind>,
}

impl<S> MoveResult<S> {
    /// A rejected command: same state, no score, nothing changed
    pub fn unchanged(state: S) -> Self {
        Self {
            state,
            score_delta: 0,
            changed: false,
            terminal: None,
        }
    }

    /// A command that changed the state
    pub fn changed(state: S, score_delta: u32) -> Self {
        Self {
            state,
            score_delta,
            changed: true,
            terminal: None,
        }
    }

    pub fn with_terminal(mut self, terminal: Option<TerminalKind>) -> Self {
        self.terminal = terminal;
        self
    }

    /// Project the state while keeping the outcome fields
    pub fn map<U>(self, f: impl FnOnce(S) -> U) -> MoveResult<U> {
        MoveResult {
            state: f(self.state),
            score_delta: self.score_delta,
            changed: self.changed,
            terminal: self.terminal,
        }
    }
}
