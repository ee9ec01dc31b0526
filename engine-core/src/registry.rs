//! Static game registry for startup game registration
//!
//! This module provides a thread-safe registry system that allows games to be
//! registered once at startup and looked up at runtime by their env_id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use tracing::warn;

use crate::erased::ErasedGame;

/// Factory function type for creating game instances
pub type GameFactory = fn() -> Box<dyn ErasedGame>;

/// Thread-safe registry mapping env_id to game factory functions
static REGISTRY: Lazy<Mutex<HashMap<String, GameFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<String, GameFactory>> {
    // Factories are plain fn pointers, so a poisoned map is still consistent
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register a game with the global registry
///
/// # Arguments
///
/// * `env_id` - Unique environment identifier (e.g., "2048")
/// * `factory` - Function that creates new instances of the game
///
/// # Example
///
/// ```rust
/// # use engine_core::registry::*;
/// # use engine_core::erased::ErasedGame;
/// # use engine_core::adapter::GameAdapter;
/// # use engine_core::outcome::MoveResult;
/// # use engine_core::typed::*;
/// # use rand_chacha::ChaCha20Rng;
///
/// # struct MyGame;
/// # impl Game for MyGame {
/// #     type State = ();
/// #     type Command = ();
/// #     fn engine_id(&self) -> EngineId { todo!() }
/// #     fn capabilities(&self) -> Capabilities { todo!() }
/// #     fn new_game(&mut self, rng: &mut ChaCha20Rng) -> Self::State { todo!() }
/// #     fn apply(&mut self, state: &Self::State, command: Self::Command, rng: &mut ChaCha20Rng) -> MoveResult<Self::State> { todo!() }
/// #     fn parse_command(&self, state: &Self::State, input: &str) -> Result<Self::Command, CommandError> { todo!() }
/// #     fn snapshot(&self, state: &Self::State) -> Snapshot { todo!() }
/// # }
///
/// fn my_game_factory() -> Box<dyn ErasedGame> {
///     Box::new(GameAdapter::new(MyGame))
/// }
///
/// register_game("my_game".to_string(), my_game_factory);
/// ```
pub fn register_game(env_id: String, factory: GameFactory) {
    let mut registry = registry();
    if registry.contains_key(&env_id) {
        warn!(%env_id, "overriding existing game registration");
    }
    registry.insert(env_id, factory);
}

/// Create a new game instance by env_id
///
/// Returns `Some(game)` if the env_id is registered, `None` otherwise.
pub fn create_game(env_id: &str) -> Option<Box<dyn ErasedGame>> {
    let factory = registry().get(env_id).copied();
    factory.map(|factory| factory())
}

/// All registered environment IDs, sorted
pub fn list_registered_games() -> Vec<String> {
    let mut games: Vec<String> = registry().keys().cloned().collect();
    games.sort();
    games
}

/// Check if a game is registered
pub fn is_registered(env_id: &str) -> bool {
    registry().contains_key(env_id)
}

/// Clear all registered games (mainly for testing)
pub fn clear_registry() {
    registry().clear();
}

/// Convenience macro for registering games
///
/// Creates the factory function from the game's `Default` impl and calls
/// `register_game`.
///
/// # Example
///
/// ```ignore
/// register_game!(TileMerge, "2048");
/// ```
#[macro_export]
macro_rules! register_game {
    ($game_type:ty, $env_id:expr) => {{
        fn factory() -> Box<dyn $crate::erased::ErasedGame> {
            Box::new($crate::adapter::GameAdapter::new(<$game_type>::default()))
        }
        $crate::registry::register_game($env_id.to_string(), factory);
    }};
}
