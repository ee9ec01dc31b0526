//! Core traits and types shared by the arcade board engines
//!
//! This crate provides the fundamental abstractions used by every engine:
//! - `Grid`: Fixed-size row-major board storage
//! - `MoveResult`: Uniform `(state, score delta, changed, terminal)` outcome
//! - `Game`: Typed trait for ergonomic engine development
//! - `ErasedGame`: Runtime interface that works only with text commands
//! - `GameAdapter`: Automatic conversion from typed to erased interface
//! - `Registry`: Name-keyed registration of available games

pub mod grid;
pub mod outcome;
pub mod typed;
pub mod erased;
pub mod adapter;
pub mod registry;

// Re-export main types for convenience
pub use grid::{Grid, GridError};
pub use outcome::{MoveResult, TerminalKind};
pub use typed::Game;
pub use erased::ErasedGame;
pub use adapter::GameAdapter;
pub use registry::{register_game, create_game, GameFactory};
