use anyhow::{anyhow, Result};
use clap::Parser;
use std::io;
use tracing::{error, info};

use arcade::{initialize_registry, BestScores, Config, Session};
use engine_core::registry::{create_game, list_registered_games};

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Logs go to stderr so they never interleave with the board on stdout
    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(io::stderr)
        .init();

    initialize_registry();

    if config.list {
        for game_id in list_registered_games() {
            println!("{game_id}");
        }
        return Ok(());
    }

    let game = create_game(&config.game).ok_or_else(|| {
        anyhow!(
            "unknown game '{}', expected one of: {}",
            config.game,
            list_registered_games().join(", ")
        )
    })?;
    let scores = BestScores::load(&config.scores_file)?;

    info!("Starting {} with scores in {}", config.game, config.scores_file.display());

    let mut session = Session::new(game, config.seed(), scores).persist_to(config.scores_file.clone());
    match session.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Session failed: {}", e);
            Err(e)
        }
    }
}
