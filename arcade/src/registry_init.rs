//! Game registry initialization
//!
//! Registers every engine variant the arcade can start by name.

use engine_core::registry::list_registered_games;
use engine_core::{register_game, GameAdapter};
use games_blockstack::BlockStack;
use games_minefield::Minesweeper;
use games_tictactoe::{Mark, TicTacToe};
use games_tilemerge::TileMerge;
use tracing::{debug, info};

/// Initialize the global game registry with all available games
///
/// Call once at startup, before any lookup by name.
pub fn initialize_registry() {
    register_game("2048".to_string(), || Box::new(GameAdapter::new(TileMerge::new())));
    register_game("minesweeper".to_string(), || {
        Box::new(GameAdapter::new(Minesweeper::default()))
    });
    register_game("minesweeper-safe".to_string(), || {
        Box::new(GameAdapter::new(Minesweeper::safe_first_click()))
    });
    register_game("tetris".to_string(), || Box::new(GameAdapter::new(BlockStack::new())));
    register_game("tictactoe".to_string(), || {
        Box::new(GameAdapter::new(TicTacToe::versus_ai(Mark::O)))
    });
    register_game("tictactoe-duo".to_string(), || {
        Box::new(GameAdapter::new(TicTacToe::two_player()))
    });

    let games = list_registered_games();
    info!("Initialized game registry with {} games", games.len());
    for game_id in games {
        debug!("  - {}", game_id);
    }
}
