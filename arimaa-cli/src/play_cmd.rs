//! Play command - one random self-play game, saved as a game record
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_setup(), play_recorded(), save_record()
//! - Level 3: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use arimaa_core::record::COMPUTER_NAME;
use arimaa_core::{
    placement_tokens, Color, Game, GameRecord, Phase, Player, RandomPlayer, Setup,
};

use crate::match_cmd::create_rng;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Starting layout JSON file (standard layout if omitted)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Maximum half-turns before the game is left unfinished
    #[arg(long, default_value = "200")]
    pub max_turns: u32,

    /// Directory the game record is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Print the record instead of saving it
    #[arg(long)]
    pub no_save: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let setup = load_setup(args.setup.as_deref())?;
    let board = setup.to_board()?;

    let gold = Player::gold("Random").computer();
    let silver = Player::silver(COMPUTER_NAME).computer();
    let mut game = Game::with_board(gold, silver, board)?;
    let mut player = RandomPlayer::from_rng(create_rng(seed));

    tracing::info!(
        "Starting self-play on '{}' (max {} turns)",
        setup.name,
        args.max_turns
    );

    let record = play_recorded(&mut game, &mut player, args.max_turns)?;

    println!("{}", game.board());
    println!();
    println!("{}", describe_result(&game));

    if args.no_save {
        println!();
        print!("{}", record);
    } else {
        let path = save_record(&record, &args.output)?;
        println!("Record saved to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the layout file, warning about non-standard armies
pub fn load_setup(path: Option<&Path>) -> Result<Setup> {
    let setup = match path {
        Some(path) => Setup::load(path)?,
        None => Setup::standard(),
    };
    for issue in setup.army_issues()? {
        tracing::warn!("{}: {}", setup.name, issue);
    }
    Ok(setup)
}

/// Arrange both sides and play up to `max_turns` half-turns, recording
/// every placement, step and capture
pub fn play_recorded(
    game: &mut Game,
    player: &mut RandomPlayer,
    max_turns: u32,
) -> Result<GameRecord> {
    let mut record = GameRecord::new(
        &game.player(Color::Gold).name,
        &game.player(Color::Silver).name,
    );

    while let Phase::Arranging(color) = game.phase() {
        let label = game.turn_label();
        player.arrange(game)?;
        record.record_tokens(label, placement_tokens(game.board(), color));
        record.start_turn(game.turn_label());
    }

    for _ in 0..max_turns {
        if game.is_ended() {
            break;
        }
        let turn = player.play_turn(game)?;
        if turn.reports.is_empty() {
            tracing::warn!("No legal move for the side to move at {}", turn.label);
            break;
        }
        record.record_tokens(turn.label, turn.reports.iter().flat_map(|r| r.tokens()));
        if !game.is_ended() {
            record.start_turn(game.turn_label());
        }
    }

    record.record_outcome(game.outcome());
    Ok(record)
}

/// Write the record as `arimaa-dd-mm-yyyy-hh-mm-ss.txt` under `dir`
fn save_record(record: &GameRecord, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let name = chrono::Local::now()
        .format("arimaa-%d-%m-%Y-%H-%M-%S.txt")
        .to_string();
    let path = dir.join(name);
    std::fs::write(&path, record.to_string())
        .with_context(|| format!("Failed to write record {}", path.display()))?;
    Ok(path)
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

fn describe_result(game: &Game) -> String {
    match game.outcome() {
        Some(outcome) => format!(
            "{} ({}) won by {} at {}",
            outcome.winner,
            game.player(outcome.winner).name,
            outcome.reason,
            game.turn_label()
        ),
        None => format!("Unfinished: {} at {}", game.phase(), game.turn_label()),
    }
}
