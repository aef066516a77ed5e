use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg, simulate::SimulateArg};

mod play;
mod scores;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct CommandArgs {
    /// What mode to run the program in (default: play)
    #[command(subcommand)]
    mode: Option<Mode>,
    #[clap(flatten)]
    play: PlayArg,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Show the leaderboard
    Scores(#[clap(flatten)] ScoresArg),
    /// Run headless games with a greedy player and report statistics
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(args.play)) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
