//! Terminal front-end for the board engines
//!
//! Everything the engines leave to their caller lives here: configuration,
//! game registration, the play loop with its clock, and best-score storage.

pub mod config;
pub mod registry_init;
pub mod scores;
pub mod session;

pub use config::Config;
pub use registry_init::initialize_registry;
pub use scores::BestScores;
pub use session::Session;
