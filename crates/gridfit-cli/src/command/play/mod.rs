use std::{path::PathBuf, time::Duration};

use anyhow::ensure;
use gridfit_engine::{ClearMode, Dealing, GameConfig, GameState, PieceSeed};
use ratatui_runtime::Runtime;

use self::app::{PlayApp, PlaySettings};
use crate::model::score_file::ScoreFile;

mod app;
mod render;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Leaderboard file
    #[clap(long, default_value = "./data/scores.json")]
    scores: PathBuf,
    /// Seed for piece dealing (32 hex digits)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Deal pieces uniformly instead of favoring pieces that fit
    #[clap(long)]
    random_dealing: bool,
    /// Delay before completed lines disappear, in milliseconds
    #[clap(long, default_value_t = 300)]
    clear_delay_ms: u64,
    /// How long the last placed piece stays highlighted, in milliseconds
    #[clap(long, default_value_t = 400)]
    highlight_ms: u64,
    /// Number of entries shown on the leaderboard
    #[clap(long, default_value_t = 10)]
    leaderboard_size: usize,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        scores,
        seed,
        random_dealing,
        clear_delay_ms,
        highlight_ms,
        leaderboard_size,
    } = arg;
    ensure!(*leaderboard_size > 0, "--leaderboard-size must be at least 1");

    let config = GameConfig {
        dealing: if *random_dealing {
            Dealing::Random
        } else {
            Dealing::Smart
        },
        clear_mode: ClearMode::Deferred,
        seed: *seed,
    };
    let settings = PlaySettings {
        clear_delay: Duration::from_millis(*clear_delay_ms),
        highlight: Duration::from_millis(*highlight_ms),
        leaderboard_size: *leaderboard_size,
    };
    let store = ScoreFile::new(scores.clone());
    let mut app = PlayApp::new(GameState::new(config), store, settings);

    Runtime::new().run(&mut app)?;

    let stats = app.game().stats();
    eprintln!(
        "Final score: {} ({} pieces, {} lines, best streak {})",
        stats.score(),
        stats.placed_pieces(),
        stats.cleared_lines(),
        stats.best_streak()
    );
    Ok(())
}
