//! Erased Game interface for runtime polymorphism
//!
//! This trait provides a text-command interface without generics so a
//! front-end can drive any registered engine by name. All typed games are
//! converted to this interface via the adapter layer.

use crate::outcome::TerminalKind;
use crate::typed::{Capabilities, CommandError, EngineId, Snapshot};

/// Runtime error for erased game operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErasedGameError {
    #[error("No game in progress, start one first")]
    NoActiveGame,
    #[error("Invalid command: {0}")]
    InvalidCommand(#[from] CommandError),
}

/// Outcome of one erased command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub changed: bool,
    pub score_delta: u32,
    pub terminal: Option<TerminalKind>,
}

/// Erased game trait that works only with text commands and snapshots
///
/// Implementations own exactly one in-flight game state. Taking `&mut self`
/// for every command serializes commands against that state.
///
/// # Example Usage
///
/// ```rust
/// # use engine_core::erased::*;
///
/// fn play_left(game: &mut dyn ErasedGame) -> Result<(), ErasedGameError> {
///     let caps = game.capabilities();
///     println!("Playing {}", caps.id.env_id);
///
///     game.new_game(42);
///     let outcome = game.command("left")?;
///     println!("Changed: {}, +{}", outcome.changed, outcome.score_delta);
///     Ok(())
/// }
/// ```
pub trait ErasedGame: Send + Sync + 'static {
    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Get game capabilities and configuration
    fn capabilities(&self) -> Capabilities;

    /// Discard any current game and start a new one from `seed`
    fn new_game(&mut self, seed: u64) -> Snapshot;

    /// Parse and apply one text command
    ///
    /// # Errors
    ///
    /// Returns `ErasedGameError` if no game is running or the command is
    /// malformed. Rule-level rejections are not errors; they come back with
    /// `changed == false`.
    fn command(&mut self, input: &str) -> Result<CommandOutcome, ErasedGameError>;

    /// Render the current game
    fn snapshot(&self) -> Result<Snapshot, ErasedGameError>;
}
