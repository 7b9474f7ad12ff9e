//! Arimaa CLI - Command-line interface
//!
//! Commands:
//! - play: One random self-play game, saved as a game record
//! - match: Many seeded self-play games in parallel
//! - replay: Rebuild a saved game and show the position

mod match_cmd;
mod play_cmd;
mod replay_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arimaa")]
#[command(about = "Arimaa rule engine: self-play, matches and game records")]
struct Cli {
    /// Seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one random self-play game
    Play(play_cmd::PlayArgs),
    /// Play many random games and summarize the results
    Match(match_cmd::MatchArgs),
    /// Load a game record and show where it stands
    Replay(replay_cmd::ReplayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Replay(args) => replay_cmd::run(args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
