//! Line-oriented play loop driving one erased game

use anyhow::Result;
use engine_core::erased::ErasedGame;
use engine_core::typed::Snapshot;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::scores::BestScores;

/// One player's sitting at one game.
///
/// Owns the clock and the best-score table; the engine owns only the board.
/// The clock stops when a game ends and restarts with `new`.
pub struct Session {
    name: String,
    game: Box<dyn ErasedGame>,
    tracks_score: bool,
    next_seed: u64,
    started: Instant,
    finished: Option<Duration>,
    scores: BestScores,
    scores_path: Option<PathBuf>,
}

impl Session {
    pub fn new(game: Box<dyn ErasedGame>, seed: u64, scores: BestScores) -> Self {
        let capabilities = game.capabilities();
        Self {
            name: capabilities.id.env_id,
            tracks_score: capabilities.tracks_score,
            game,
            next_seed: seed,
            started: Instant::now(),
            finished: None,
            scores,
            scores_path: None,
        }
    }

    /// Write the score table back to `path` whenever a best is beaten
    pub fn persist_to(mut self, path: PathBuf) -> Self {
        self.scores_path = Some(path);
        self
    }

    pub fn game(&self) -> &dyn ErasedGame {
        self.game.as_ref()
    }

    pub fn scores(&self) -> &BestScores {
        &self.scores
    }

    /// Play until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        info!("Session for {} starting", self.name);
        self.start(&mut out)?;

        for line in input.lines() {
            let line = line?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            match command.to_ascii_lowercase().as_str() {
                "quit" | "exit" => break,
                "help" | "?" => self.help(&mut out)?,
                "new" => self.start(&mut out)?,
                _ => self.play(command, &mut out)?,
            }
            out.flush()?;
        }

        info!("Session for {} ended", self.name);
        Ok(())
    }

    fn start<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let seed = self.next_seed;
        self.next_seed = seed.wrapping_add(1);
        self.started = Instant::now();
        self.finished = None;

        let snapshot = self.game.new_game(seed);
        info!(game = %self.name, seed, "new game");
        writeln!(out, "new {} game (seed {})", self.name, seed)?;
        self.render(&snapshot, out)
    }

    fn play<W: Write>(&mut self, command: &str, out: &mut W) -> Result<()> {
        let outcome = match self.game.command(command) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(command, error = %e, "command rejected");
                writeln!(out, "{e} (type `help` for commands)")?;
                return Ok(());
            }
        };

        let snapshot = self.game.snapshot()?;
        if outcome.terminal.is_some() && self.finished.is_none() {
            self.finished = Some(self.started.elapsed());
        }
        if outcome.changed {
            self.record(&snapshot);
        } else {
            writeln!(out, "nothing happened")?;
        }
        self.render(&snapshot, out)?;

        if let (Some(terminal), true) = (outcome.terminal, outcome.changed) {
            writeln!(out, "game over: {terminal}. Type `new` to play again.")?;
        }
        Ok(())
    }

    fn record(&mut self, snapshot: &Snapshot) {
        let Some(score) = snapshot.score.filter(|_| self.tracks_score) else {
            return;
        };
        if !self.scores.record(&self.name, score) {
            return;
        }
        if let Some(path) = &self.scores_path {
            // Losing the file is not worth ending the game over
            if let Err(e) = self.scores.save(path) {
                warn!("Failed to save best scores: {:#}", e);
            }
        }
    }

    fn render<W: Write>(&self, snapshot: &Snapshot, out: &mut W) -> Result<()> {
        for line in &snapshot.lines {
            writeln!(out, "{line}")?;
        }
        if let Some(score) = snapshot.score {
            let best = self.scores.get(&self.name).unwrap_or(0).max(score);
            writeln!(out, "score: {score}  best: {best}")?;
        }
        if !snapshot.status.is_empty() {
            writeln!(out, "{}", snapshot.status)?;
        }
        writeln!(out, "time: {}s", self.elapsed().as_secs())?;
        Ok(())
    }

    /// Time since `new`, frozen at the moment the game ended
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        let capabilities = self.game.capabilities();
        writeln!(
            out,
            "{} on a {}x{} board, commands:",
            self.name, capabilities.board.rows, capabilities.board.cols
        )?;
        for spec in capabilities.commands {
            writeln!(out, "  {:<32} {}", spec.usage, spec.summary)?;
        }
        writeln!(out, "  {:<32} {}", "new", "Start a new game")?;
        writeln!(out, "  {:<32} {}", "quit", "Leave the arcade")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::adapter::GameAdapter;
    use engine_core::erased::{CommandOutcome, ErasedGameError};
    use engine_core::typed::{BoardShape, Capabilities, EngineId};
    use games_tictactoe::TicTacToe;
    use games_tilemerge::TileMerge;

    fn duo() -> Session {
        Session::new(Box::new(GameAdapter::new(TicTacToe::two_player())), 1, BestScores::default())
    }

    fn run(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn board_lines(session: &Session) -> Vec<String> {
        session.game().snapshot().unwrap().lines
    }

    #[test]
    fn test_malformed_input_leaves_board_alone() {
        let mut session = duo();
        let out = run(&mut session, "place 9\nplace 4\nwhatever\n");

        assert!(out.contains("out of range"));
        assert!(out.contains("Unknown command: whatever"));
        assert_eq!(board_lines(&session), vec!["0 1 2", "3 X 5", "6 7 8"]);
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = duo();
        run(&mut session, "4\nquit\n0\n");
        assert_eq!(board_lines(&session)[0], "0 1 2");
    }

    #[test]
    fn test_new_restarts_game() {
        let mut session = duo();
        let out = run(&mut session, "4\nnew\n");

        assert!(out.contains("seed 1"));
        assert!(out.contains("seed 2"));
        assert_eq!(board_lines(&session)[1], "3 4 5");
    }

    #[test]
    fn test_rejected_move_is_reported() {
        let mut session = duo();
        let out = run(&mut session, "4\n4\n");
        assert!(out.contains("nothing happened"));
    }

    #[test]
    fn test_help_lists_game_commands() {
        let mut session = duo();
        let out = run(&mut session, "help\n");
        assert!(out.contains("place <0-8>"));
        assert!(out.contains("quit"));
    }

    #[test]
    fn test_finished_game_is_announced() {
        let mut session = duo();
        let out = run(&mut session, "0\n3\n1\n4\n2\n");
        assert!(out.contains("X wins"));
        assert!(out.contains("game over: won"));
    }

    #[test]
    fn test_scores_follow_the_game() {
        let path = std::env::temp_dir().join(format!("arcade-session-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut session = Session::new(Box::new(GameAdapter::new(TileMerge::new())), 9, BestScores::default())
            .persist_to(path.clone());
        let out = run(&mut session, "left\nright\nup\ndown\nleft\nright\nup\ndown\n");

        let score = session.game().snapshot().unwrap().score;
        assert!(out.contains("score: "));
        assert_eq!(session.scores().get("2048"), score);
        assert_eq!(BestScores::load(&path).unwrap().get("2048"), score);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_clock_stops_when_game_ends() {
        let mut session = duo();
        let mut out = Vec::new();
        session.start(&mut out).unwrap();
        for cell in ["0", "3", "1", "4", "2"] {
            session.play(cell, &mut out).unwrap();
        }
        let frozen = session.elapsed();
        assert!(session.finished.is_some());

        std::thread::sleep(Duration::from_millis(1100));
        let mut after = Vec::new();
        session.play("8", &mut after).unwrap();
        let after = String::from_utf8(after).unwrap();

        assert!(after.contains("nothing happened"));
        assert!(after.contains(&format!("time: {}s", frozen.as_secs())));
        assert_eq!(session.elapsed(), frozen);

        session.start(&mut out).unwrap();
        assert!(session.finished.is_none());
    }

    #[test]
    fn test_help_shows_board_size() {
        let mut session = duo();
        let out = run(&mut session, "help\n");
        assert!(out.contains("tictactoe-duo on a 3x3 board"));
    }

    /// Adds five points per command and reports a score either way
    struct Counter {
        tracks_score: bool,
        score: Option<u64>,
    }

    impl ErasedGame for Counter {
        fn engine_id(&self) -> EngineId {
            EngineId {
                env_id: "counter".to_string(),
                build_id: "0.1.0".to_string(),
            }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                id: self.engine_id(),
                board: BoardShape { rows: 1, cols: 1 },
                commands: Vec::new(),
                tracks_score: self.tracks_score,
            }
        }

        fn new_game(&mut self, _seed: u64) -> Snapshot {
            self.score = Some(0);
            self.snapshot().unwrap()
        }

        fn command(&mut self, _input: &str) -> Result<CommandOutcome, ErasedGameError> {
            let score = self.score.ok_or(ErasedGameError::NoActiveGame)? + 5;
            self.score = Some(score);
            Ok(CommandOutcome {
                changed: true,
                score_delta: 5,
                terminal: None,
            })
        }

        fn snapshot(&self) -> Result<Snapshot, ErasedGameError> {
            let score = self.score.ok_or(ErasedGameError::NoActiveGame)?;
            Ok(Snapshot {
                lines: Vec::new(),
                score: Some(score),
                status: String::new(),
                terminal: None,
            })
        }
    }

    #[test]
    fn test_best_score_only_for_scored_games() {
        let scored = Box::new(Counter { tracks_score: true, score: None });
        let mut session = Session::new(scored, 0, BestScores::default());
        run(&mut session, "add\nadd\n");
        assert_eq!(session.scores().get("counter"), Some(10));

        let unscored = Box::new(Counter { tracks_score: false, score: None });
        let mut session = Session::new(unscored, 0, BestScores::default());
        run(&mut session, "add\nadd\n");
        assert_eq!(session.scores().get("counter"), None);
    }
}
