//! Match command - play a series of games on one board
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use pursuit_core::{create_rng, Move};

use crate::game_runner::{play_game, GameArgs, GameContext, Outcome};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    outcome: Outcome,
    rounds: usize,
    moves: Vec<Move>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameSummary>,
    fugitive_wins: usize,
    pursuer_wins: usize,
    stalled: usize,
    unfinished: usize,
    avg_rounds: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Load the board and its distance table
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let ctx = GameContext::load(&args.game)?;

    tracing::info!(
        "Starting match on {}: {:?} fugitive vs {:?} pursuers ({} games, depth={})",
        ctx.board.display_name(),
        args.game.fugitive,
        args.game.pursuers,
        args.games,
        args.game.depth
    );

    let results = play_match(&ctx, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(ctx: &GameContext, args: &MatchArgs, seed: Option<u64>) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let (mut fugitive, mut pursuers) = ctx.agents(&args.game, &mut rng);
        let record = play_game(
            ctx.initial_state()?,
            fugitive.as_mut(),
            pursuers.as_mut(),
            args.game.max_moves,
            Vec::new(),
        )?;

        tracing::info!(
            "Game {}: {:?} ({} rounds, {} moves)",
            game_num + 1,
            record.outcome,
            record.rounds,
            record.moves.len()
        );

        games.push(GameSummary {
            game_number: game_num + 1,
            outcome: record.outcome,
            rounds: record.rounds,
            moves: record.moves,
        });
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

/// Compute aggregate statistics from game summaries
fn compute_match_statistics(games: Vec<GameSummary>) -> MatchResults {
    let count = |outcome: Outcome| games.iter().filter(|g| g.outcome == outcome).count();
    let fugitive_wins = count(Outcome::FugitiveWins);
    let pursuer_wins = count(Outcome::PursuersWin);
    let stalled = count(Outcome::Stalled);
    let unfinished = count(Outcome::MoveLimit);

    let total_rounds: usize = games.iter().map(|g| g.rounds).sum();
    let avg_rounds = if games.is_empty() {
        0.0
    } else {
        total_rounds as f32 / games.len() as f32
    };

    MatchResults {
        games,
        fugitive_wins,
        pursuer_wins,
        stalled,
        unfinished,
        avg_rounds,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn rate(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame<'a> {
        game_number: usize,
        outcome: Outcome,
        rounds: usize,
        moves: &'a [Move],
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        total_games: usize,
        fugitive_wins: usize,
        pursuer_wins: usize,
        stalled: usize,
        unfinished: usize,
        avg_rounds: f32,
        fugitive_win_rate: f32,
        games: Vec<JsonGame<'a>>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        fugitive_wins: results.fugitive_wins,
        pursuer_wins: results.pursuer_wins,
        stalled: results.stalled,
        unfinished: results.unfinished,
        avg_rounds: results.avg_rounds,
        fugitive_win_rate: rate(results.fugitive_wins, total),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                outcome: g.outcome,
                rounds: g.rounds,
                moves: &g.moves,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialise results: {}", e),
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games:    {}", total);
    for (label, count) in [
        ("Fugitive wins:", results.fugitive_wins),
        ("Pursuer wins: ", results.pursuer_wins),
        ("Stalled:      ", results.stalled),
        ("Unfinished:   ", results.unfinished),
    ] {
        println!("{} {} ({:.1}%)", label, count, rate(count, total) * 100.0);
    }
    println!("Avg rounds:     {:.1}", results.avg_rounds);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} after {} rounds ({} moves)",
            game.game_number,
            game.outcome,
            game.rounds,
            game.moves.len()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
