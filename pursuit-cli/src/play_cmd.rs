//! Play command - one game with a move-by-move trace

use anyhow::Result;
use clap::Args;

use pursuit_core::{create_rng, Event, GameState, LogEntry, Observer};

use crate::game_runner::{play_game, GameArgs, GameContext};

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,
}

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let ctx = GameContext::load(&args.game)?;
    let mut rng = create_rng(seed);
    let (mut fugitive, mut pursuers) = ctx.agents(&args.game, &mut rng);

    tracing::info!(
        "Playing on {}: {} fugitive vs {} pursuers (depth={})",
        ctx.board.display_name(),
        fugitive.name(),
        pursuers.name(),
        args.game.depth
    );

    let initial = ctx.initial_state()?;
    println!("Start: {}", describe(&initial));

    let record = play_game(
        initial,
        fugitive.as_mut(),
        pursuers.as_mut(),
        args.game.max_moves,
        vec![Box::new(TracePrinter::default()) as Box<dyn Observer>],
    )?;

    println!("\nFinal: {}", describe(&record.final_state));
    println!("Result: {:?} after {} fugitive moves", record.outcome, record.rounds);
    Ok(())
}

/// Prints the board after every accepted move
#[derive(Default)]
struct TracePrinter {
    moves: usize,
}

impl Observer for TracePrinter {
    fn on_model_changed(&mut self, state: &GameState, event: Event) {
        self.moves += 1;
        let marker = match event {
            Event::MoveMade => "",
            Event::GameOver => "  [game over]",
        };
        println!("{:>4}. {}{}", self.moves, describe(state), marker);
    }
}

/// One-line summary: locations and the latest log entry
fn describe(state: &GameState) -> String {
    let pursuers: Vec<String> = state
        .pursuers()
        .iter()
        .map(|p| format!("{}@{}", p.piece, p.location))
        .collect();

    let last = match state.log().last() {
        Some(LogEntry::Revealed { ticket, location }) => format!("{ticket:?} to {location} (seen)"),
        Some(LogEntry::Hidden { ticket }) => format!("{ticket:?} (hidden)"),
        None => "-".to_string(),
    };

    format!(
        "Fugitive@{} | {} | log {}/{}: {}",
        state.fugitive().location,
        pursuers.join(" "),
        state.log().len(),
        state.schedule().len(),
        last
    )
}
