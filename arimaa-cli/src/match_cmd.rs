//! Match command - many independent random self-play games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use arimaa_core::{Board, Color, Game, Outcome, Player, RandomPlayer, WinReason};

use crate::play_cmd::load_setup;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maximum half-turns per game
    #[arg(long, default_value = "200")]
    pub max_turns: u32,

    /// Starting layout JSON file (standard layout if omitted)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    seed: u64,
    outcome: Option<Outcome>,
    turns: u32,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameSummary>,
    gold_wins: usize,
    silver_wins: usize,
    goal_wins: usize,
    elimination_wins: usize,
    unfinished: usize,
    avg_turns: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Load the starting layout
/// 2. Play the games in parallel
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let setup = load_setup(args.setup.as_deref())?;
    let board = setup.to_board()?;

    tracing::info!(
        "Starting match on '{}' ({} games, max {} turns)",
        setup.name,
        args.games,
        args.max_turns
    );

    let results = play_match(&board, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games; game `i` is seeded with `base + i`
fn play_match(board: &Board, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let base_seed = seed.unwrap_or_else(|| create_rng(None).gen());

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games ({eta})") {
        progress.set_style(style);
    }

    let games = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let summary = play_single_game(board, i + 1, base_seed.wrapping_add(i as u64), args.max_turns);
            progress.inc(1);
            summary
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    for game in &games {
        tracing::debug!(
            "Game {} (seed {}): {} in {} turns",
            game.game_number,
            game.seed,
            describe_outcome(game.outcome),
            game.turns
        );
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one seeded game from `board`
fn play_single_game(board: &Board, game_number: usize, seed: u64, max_turns: u32) -> Result<GameSummary> {
    let mut game = Game::with_board(
        Player::gold("Random").computer(),
        Player::silver("Random").computer(),
        board.clone(),
    )?;
    let turns = RandomPlayer::new(seed).play_game(&mut game, max_turns)?;

    Ok(GameSummary {
        game_number,
        seed,
        outcome: game.outcome(),
        turns: turns.len() as u32,
    })
}

/// Compute aggregate statistics from game summaries
fn compute_match_statistics(games: Vec<GameSummary>) -> MatchResults {
    let outcomes: Vec<Outcome> = games.iter().filter_map(|g| g.outcome).collect();
    let wins_for = |color: Color| outcomes.iter().filter(|o| o.winner == color).count();
    let wins_by = |reason: WinReason| outcomes.iter().filter(|o| o.reason == reason).count();

    let gold_wins = wins_for(Color::Gold);
    let silver_wins = wins_for(Color::Silver);
    let goal_wins = wins_by(WinReason::Goal);
    let elimination_wins = wins_by(WinReason::Elimination);
    let unfinished = games.len() - outcomes.len();

    let total_turns: u32 = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        games,
        gold_wins,
        silver_wins,
        goal_wins,
        elimination_wins,
        unfinished,
        avg_turns,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn describe_outcome(outcome: Option<Outcome>) -> String {
    match outcome {
        Some(o) => format!("{} by {}", o.winner, o.reason),
        None => "unfinished".to_string(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        outcome: Option<Outcome>,
        turns: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        gold_wins: usize,
        silver_wins: usize,
        goal_wins: usize,
        elimination_wins: usize,
        unfinished: usize,
        avg_turns: f32,
        gold_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        gold_wins: results.gold_wins,
        silver_wins: results.silver_wins,
        goal_wins: results.goal_wins,
        elimination_wins: results.elimination_wins,
        unfinished: results.unfinished,
        avg_turns: results.avg_turns,
        gold_win_rate: percent(results.gold_wins, total) / 100.0,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                outcome: g.outcome,
                turns: g.turns,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:  {}", total);
    println!(
        "Gold wins:    {} ({:.1}%)",
        results.gold_wins,
        percent(results.gold_wins, total)
    );
    println!(
        "Silver wins:  {} ({:.1}%)",
        results.silver_wins,
        percent(results.silver_wins, total)
    );
    println!(
        "Unfinished:   {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!(
        "By goal:      {}   by elimination: {}",
        results.goal_wins, results.elimination_wins
    );
    println!("Avg turns:    {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {} in {} turns",
            game.game_number,
            game.seed,
            describe_outcome(game.outcome),
            game.turns
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arimaa_core::Setup;

    fn summary(game_number: usize, outcome: Option<Outcome>, turns: u32) -> GameSummary {
        GameSummary {
            game_number,
            seed: game_number as u64,
            outcome,
            turns,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.gold_wins, 0);
        assert_eq!(results.silver_wins, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_turns, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            summary(
                1,
                Some(Outcome {
                    winner: Color::Gold,
                    reason: WinReason::Goal,
                }),
                10,
            ),
            summary(
                2,
                Some(Outcome {
                    winner: Color::Silver,
                    reason: WinReason::Elimination,
                }),
                20,
            ),
            summary(
                3,
                Some(Outcome {
                    winner: Color::Gold,
                    reason: WinReason::Goal,
                }),
                30,
            ),
            summary(4, None, 40),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.gold_wins, 2);
        assert_eq!(results.silver_wins, 1);
        assert_eq!(results.goal_wins, 2);
        assert_eq!(results.elimination_wins, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_turns, 25.0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_single_game_is_reproducible() {
        let board = Setup::standard().to_board().unwrap();
        let a = play_single_game(&board, 1, 77, 40).unwrap();
        let b = play_single_game(&board, 1, 77, 40).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.turns, b.turns);
        assert!(a.turns <= 40);
    }
}
