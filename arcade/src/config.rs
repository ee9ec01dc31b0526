use anyhow::{anyhow, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::Level;

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "arcade")]
#[command(about = "Terminal arcade for the board engines")]
#[command(long_about = "Plays 2048, Minesweeper, Tetris and Tic-Tac-Toe in the terminal.

Commands are read one per line from standard input. Type `help` once a
game is running to see what it accepts.")]
pub struct Config {
    /// Game to play (see --list)
    #[arg(long, env = "ARCADE_GAME", default_value = "2048")]
    pub game: String,

    /// Seed for the first game; later games in the session count up from it
    #[arg(long, env = "ARCADE_SEED")]
    pub seed: Option<u64>,

    /// File holding the best score per game
    #[arg(long, env = "ARCADE_SCORES_FILE", default_value = "arcade-scores.toml")]
    pub scores_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ARCADE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print the available games and exit
    #[arg(long)]
    pub list: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.game.is_empty() {
            return Err(anyhow!("game cannot be empty"));
        }

        if self.scores_file.as_os_str().is_empty() {
            return Err(anyhow!("scores_file cannot be empty"));
        }

        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("invalid log_level '{}'", self.log_level))
    }

    /// Configured seed, or one taken from the clock
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("arcade").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.game, "2048");
        assert_eq!(config.scores_file, PathBuf::from("arcade-scores.toml"));
        assert!(!config.list);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_seed_is_used() {
        let config = parse(&["--game", "tetris", "--seed", "7"]);
        assert_eq!(config.game, "tetris");
        assert_eq!(config.seed(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = parse(&["--log-level", "loud"]);
        assert!(config.validate().is_err());

        let config = parse(&["--game", ""]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_parses_case_insensitively() {
        let config = parse(&["--log-level", "DEBUG"]);
        assert_eq!(config.level().unwrap(), Level::DEBUG);
    }
}
