use std::path::PathBuf;

use anyhow::ensure;

use crate::model::score_file::ScoreFile;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Leaderboard file
    #[clap(long, default_value = "./data/scores.json")]
    scores: PathBuf,
    /// Number of entries to show
    #[clap(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg { scores, limit } = arg;
    ensure!(*limit > 0, "--limit must be at least 1");

    let file = ScoreFile::new(scores.clone());
    eprintln!("Loading scores from {}...", file.path().display());
    let entries = file.ranked_entries()?;
    eprintln!("Loaded {} scores", entries.len());

    if entries.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }

    println!("{:>4}  {:<16}  {:>8}  RECORDED", "RANK", "NAME", "SCORE");
    for (rank, entry) in entries.iter().take(*limit).enumerate() {
        println!(
            "{:>4}  {:<16}  {:>8}  {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.recorded_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
