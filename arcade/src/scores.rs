//! Best score per game, kept in a small TOML file between sessions

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScores {
    #[serde(default)]
    best: BTreeMap<String, u64>,
}

impl BestScores {
    /// Read scores from `path`; a missing file is an empty table
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no score file yet");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(self).context("Failed to encode scores")?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn get(&self, game: &str) -> Option<u64> {
        self.best.get(game).copied()
    }

    /// Keep `score` if it beats the stored best; returns whether it did
    pub fn record(&mut self, game: &str, score: u64) -> bool {
        let previous = self.get(game);
        if previous.is_some_and(|best| best >= score) {
            return false;
        }
        info!(game, score, ?previous, "new best score");
        self.best.insert(game.to_string(), score);
        true
    }
}
