//! Game runner - shared setup and game loop for `play` and `match`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use pursuit_core::{
    Agent, DistanceTable, GameSetup, GameState, GreedyPursuer, Model, Move, Observer, Piece,
    Pruning, PursuerView, RandomAgent, SearchAgent, SearchConfig, DEFAULT_DEPTH,
};

use crate::board_file::BoardFile;
use crate::distance_cache::{default_cache_path, load_or_build};

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FugitiveKind {
    Search,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PursuerKind {
    Greedy,
    Search,
}

/// Options shared by every command that plays games
#[derive(Args, Clone, Debug)]
pub struct GameArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Distance table cache (default: next to the board file)
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Search depth in side hand-overs
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Search every pursuer move instead of only score-lowering ones
    #[arg(long)]
    pub exact: bool,

    /// Fugitive strategy
    #[arg(long, value_enum, default_value_t = FugitiveKind::Search)]
    pub fugitive: FugitiveKind,

    /// Pursuer strategy
    #[arg(long, value_enum, default_value_t = PursuerKind::Greedy)]
    pub pursuers: PursuerKind,

    /// Stop a game after this many moves
    #[arg(long, default_value = "500")]
    pub max_moves: usize,
}

impl GameArgs {
    pub fn search_config(&self) -> SearchConfig {
        let pruning = if self.exact { Pruning::Exact } else { Pruning::Heuristic };
        SearchConfig::default().with_depth(self.depth).with_pruning(pruning)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache.clone().unwrap_or_else(|| default_cache_path(&self.board))
    }
}

// ============================================================================
// GAME CONTEXT
// ============================================================================

/// Everything needed to start games on one board
pub struct GameContext {
    pub board: BoardFile,
    pub setup: Arc<GameSetup>,
    pub distances: Arc<DistanceTable>,
}

impl GameContext {
    pub fn load(args: &GameArgs) -> Result<Self> {
        let board = BoardFile::load(&args.board)?;
        let setup = board.setup()?;
        let (table, _) = load_or_build(&setup.graph, &args.cache_path())?;

        Ok(Self {
            board,
            setup,
            distances: Arc::new(table),
        })
    }

    pub fn initial_state(&self) -> Result<GameState> {
        self.board.initial_state(Arc::clone(&self.setup))
    }

    /// Fresh fugitive and pursuer agents, seeded from `rng`
    pub fn agents(
        &self,
        args: &GameArgs,
        rng: &mut ChaCha8Rng,
    ) -> (Box<dyn Agent>, Box<dyn Agent>) {
        let config = args.search_config();
        let table = &self.distances;

        let fugitive: Box<dyn Agent> = match args.fugitive {
            FugitiveKind::Search => Box::new(SearchAgent::with_seed(Arc::clone(table), config, rng.gen())),
            FugitiveKind::Random => Box::new(RandomAgent::with_seed(rng.gen())),
        };
        let pursuers: Box<dyn Agent> = match args.pursuers {
            PursuerKind::Greedy => Box::new(GreedyPursuer::with_seed(Arc::clone(table), rng.gen())),
            PursuerKind::Search => Box::new(SearchAgent::with_seed(Arc::clone(table), config, rng.gen())),
        };
        (fugitive, pursuers)
    }
}

// ============================================================================
// GAME LOOP
// ============================================================================

/// How a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    FugitiveWins,
    PursuersWin,
    /// Pursuers still owe moves but none can travel
    Stalled,
    MoveLimit,
}

impl Outcome {
    pub fn of(state: &GameState) -> Self {
        let winner = state.winner();
        if winner.contains(Piece::Fugitive) {
            Outcome::FugitiveWins
        } else if !winner.is_empty() {
            Outcome::PursuersWin
        } else if state.legal_moves().is_empty() {
            Outcome::Stalled
        } else {
            Outcome::MoveLimit
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Fugitive moves made (travel log length)
    pub rounds: usize,
    pub moves: Vec<Move>,
    pub final_state: GameState,
}

/// Play one game, routing moves through a `Model`
///
/// The fugitive sees the full state; the pursuers see a `PursuerView`.
pub fn play_game(
    initial: GameState,
    fugitive: &mut dyn Agent,
    pursuers: &mut dyn Agent,
    max_moves: usize,
    observers: Vec<Box<dyn Observer>>,
) -> Result<GameRecord> {
    let mut model = Model::new(initial);
    for observer in observers {
        model.register_observer(observer);
    }

    let mut moves = Vec::new();
    while moves.len() < max_moves {
        let state = model.state();
        if state.legal_moves().is_empty() {
            break;
        }

        let mv = if state.fugitive_to_move() {
            fugitive
                .pick_move(state)
                .with_context(|| format!("{} fugitive failed to move", fugitive.name()))?
        } else {
            pursuers
                .pick_move(&PursuerView::new(state))
                .with_context(|| format!("{} pursuers failed to move", pursuers.name()))?
        };

        model.choose_move(&mv)?;
        moves.push(mv);
    }

    let final_state = model.into_state();
    Ok(GameRecord {
        outcome: Outcome::of(&final_state),
        rounds: final_state.log().len(),
        moves,
        final_state,
    })
}

// ============================================================================
// TESTS
// ============================================================================
