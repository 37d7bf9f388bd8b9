//! Pursuit CLI - Command-line interface
//!
//! Commands:
//! - distances: Build or load a board's distance table and query it
//! - play: Play a single game with a move trace
//! - match: Play a series of games and summarise the outcomes

mod board_file;
mod distance_cache;
mod distances_cmd;
mod game_runner;
mod match_cmd;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use distances_cmd::DistancesArgs;
use match_cmd::MatchArgs;
use play_cmd::PlayArgs;

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(about = "Hidden-movement pursuit engine")]
struct Cli {
    /// Seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or load the distance table and print distances
    Distances(DistancesArgs),
    /// Play a single game
    Play(PlayArgs),
    /// Play several games and report results
    Match(MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Distances(args) => distances_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
