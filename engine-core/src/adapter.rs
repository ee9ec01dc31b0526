//! Adapter layer converting typed games to erased interface
//!
//! This module provides the `GameAdapter` struct that automatically converts
//! any typed `Game` implementation to the `ErasedGame` interface, handling
//! command parsing, state ownership and random number generation.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::erased::{CommandOutcome, ErasedGame, ErasedGameError};
use crate::typed::{Capabilities, EngineId, Game, Snapshot};

/// Adapter that converts typed games to erased interface
///
/// The adapter holds the single in-flight state for its game. Each command
/// replaces that state with the one returned by `Game::apply`; the previous
/// value is dropped, so no history is retained.
///
/// The RNG is re-seeded on every `new_game`, which makes a whole game
/// reproducible from its seed and command sequence.
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::*;
/// # use engine_core::outcome::MoveResult;
/// # use engine_core::adapter::GameAdapter;
/// # use engine_core::erased::ErasedGame;
/// # use rand_chacha::ChaCha20Rng;
///
/// # #[derive(Default)]
/// # struct MyGame;
/// # impl Game for MyGame {
/// #     type State = u32;
/// #     type Command = u8;
/// #     fn engine_id(&self) -> EngineId { todo!() }
/// #     fn capabilities(&self) -> Capabilities { todo!() }
/// #     fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State { todo!() }
/// #     fn apply(&mut self, state: &Self::State, command: Self::Command, rng: &mut ChaCha20Rng) -> MoveResult<Self::State> { todo!() }
/// #     fn parse_command(&self, state: &Self::State, input: &str) -> Result<Self::Command, CommandError> { todo!() }
/// #     fn snapshot(&self, state: &Self::State) -> Snapshot { todo!() }
/// # }
///
/// let typed_game = MyGame::default();
/// let erased_game: Box<dyn ErasedGame> = Box::new(GameAdapter::new(typed_game));
/// ```
pub struct GameAdapter<T: Game> {
    game: T,
    rng: ChaCha20Rng,
    state: Option<T::State>,
}

impl<T: Game> GameAdapter<T> {
    /// Create a new adapter wrapping the given game
    ///
    /// No game is in progress until `new_game` is called.
    pub fn new(game: T) -> Self {
        Self {
            game,
            rng: ChaCha20Rng::seed_from_u64(0), // Will be re-seeded on new_game
            state: None,
        }
    }

    /// Get a reference to the underlying game
    pub fn game(&self) -> &T {
        &self.game
    }

    /// Current typed state, if a game is running
    pub fn state(&self) -> Option<&T::State> {
        self.state.as_ref()
    }
}

impl<T: Game> ErasedGame for GameAdapter<T> {
    fn engine_id(&self) -> EngineId {
        self.game.engine_id()
    }

    fn capabilities(&self) -> Capabilities {
        self.game.capabilities()
    }

    fn new_game(&mut self, seed: u64) -> Snapshot {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        let state = self.game.new_game(&mut self.rng);
        let snapshot = self.game.snapshot(&state);
        self.state = Some(state);
        debug!(env_id = %self.game.engine_id().env_id, seed, "new game");
        snapshot
    }

    fn command(&mut self, input: &str) -> Result<CommandOutcome, ErasedGameError> {
        let state = self.state.as_ref().ok_or(ErasedGameError::NoActiveGame)?;
        let command = self.game.parse_command(state, input)?;

        let result = self.game.apply(state, command, &mut self.rng);
        debug!(
            ?command,
            changed = result.changed,
            score_delta = result.score_delta,
            terminal = ?result.terminal,
            "applied command"
        );

        let outcome = CommandOutcome {
            changed: result.changed,
            score_delta: result.score_delta,
            terminal: result.terminal,
        };
        self.state = Some(result.state);
        Ok(outcome)
    }

    fn snapshot(&self) -> Result<Snapshot, ErasedGameError> {
        self.state
            .as_ref()
            .map(|state| self.game.snapshot(state))
            .ok_or(ErasedGameError::NoActiveGame)
    }
}
