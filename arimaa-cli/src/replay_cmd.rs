//! Replay command - rebuild a saved game record and show where it stands

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use arimaa_core::record::{format_clock, is_record_file_name};
use arimaa_core::GameRecord;

#[derive(Args)]
pub struct ReplayArgs {
    /// Game record file
    pub file: PathBuf,

    /// Also list the legal moves of the side to move
    #[arg(long)]
    pub moves: bool,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !is_record_file_name(&name) {
        tracing::warn!("'{}' does not look like a saved game record", name);
    }

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let record: GameRecord = text
        .parse()
        .with_context(|| format!("Failed to parse record {}", args.file.display()))?;
    tracing::info!(
        "Loaded {} turn lines from {}",
        record.lines.len(),
        args.file.display()
    );

    print!("{}", summarize(&record, args.moves)?);
    Ok(())
}

/// Players, result, final board and, for unfinished games, the side to move
fn summarize(record: &GameRecord, list_moves: bool) -> Result<String> {
    let board = record.board().context("Record does not replay")?;

    let mut out = String::new();
    writeln!(
        out,
        "Gold:   {} ({})",
        record.gold_name,
        format_clock(record.gold_time)
    )?;
    writeln!(
        out,
        "Silver: {} ({})",
        record.silver_name,
        format_clock(record.silver_time)
    )?;
    writeln!(out, "Result: {}", record.result_text())?;
    writeln!(out)?;
    writeln!(out, "{}", board)?;

    if record.winner.is_some() {
        return Ok(out);
    }

    let game = record.resume().context("Record cannot be resumed")?;
    writeln!(out, "{} ({})", game.phase(), game.turn_label())?;
    if list_moves {
        let moves = game.legal_moves();
        writeln!(out, "{} legal moves:", moves.len())?;
        for mv in moves {
            writeln!(out, "  {}", mv)?;
        }
    }
    Ok(out)
}
