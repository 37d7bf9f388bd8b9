//! Move-selection strategies
//!
//! Every agent answers one question: given a `Board`, which of its
//! available moves to play.

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::{MinimaxAI, SearchConfig};
use crate::distances::DistanceTable;
use crate::eval::last_revealed_location;
use crate::game::{GameError, GameState, Move};
use crate::view::Board;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("no moves available")]
    NoMoves,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A player that picks moves from a board view
pub trait Agent {
    fn name(&self) -> &str;

    fn pick_move(&mut self, board: &dyn Board) -> Result<Move, AgentError>;
}

/// Seeded RNG, or one drawn from entropy when no seed is given
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

// ============================================================================
// RANDOM
// ============================================================================

/// Uniformly random legal moves
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: create_rng(Some(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: create_rng(None) }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn pick_move(&mut self, board: &dyn Board) -> Result<Move, AgentError> {
        board
            .available_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(AgentError::NoMoves)
    }
}

// ============================================================================
// GREEDY PURSUER
// ============================================================================

/// Moves the acting pursuer toward the fugitive's last reveal
///
/// Before the first reveal it wanders at random.
pub struct GreedyPursuer {
    distances: Arc<DistanceTable>,
    rng: ChaCha8Rng,
}

impl GreedyPursuer {
    pub fn new(distances: Arc<DistanceTable>) -> Self {
        Self::with_seed(distances, 42)
    }

    pub fn with_seed(distances: Arc<DistanceTable>, seed: u64) -> Self {
        Self { distances, rng: create_rng(Some(seed)) }
    }
}

impl Agent for GreedyPursuer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn pick_move(&mut self, board: &dyn Board) -> Result<Move, AgentError> {
        let moves = board.available_moves();
        let acting = moves.first().ok_or(AgentError::NoMoves)?.piece();
        let own: Vec<&Move> = moves.iter().filter(|m| m.piece() == acting).collect();

        let chosen = match last_revealed_location(board.travel_log()) {
            None => own.choose(&mut self.rng).copied(),
            // min_by_key keeps the first of equal keys
            Some(target) => own
                .iter()
                .copied()
                .min_by_key(|m| self.distances.distance(m.destination(), target)),
        };

        chosen.copied().ok_or(AgentError::NoMoves)
    }
}

// ============================================================================
// SEARCH AGENT
// ============================================================================

/// Minimax player for either side
///
/// When the pursuers cannot place the fugitive, or the search finds nothing
/// playable, the greedy policy decides instead.
pub struct SearchAgent {
    ai: MinimaxAI,
    fallback: GreedyPursuer,
}

impl SearchAgent {
    pub fn new(distances: Arc<DistanceTable>, config: SearchConfig) -> Self {
        Self::with_seed(distances, config, 42)
    }

    pub fn with_seed(distances: Arc<DistanceTable>, config: SearchConfig, seed: u64) -> Self {
        Self {
            ai: MinimaxAI::new(Arc::clone(&distances), config),
            fallback: GreedyPursuer::with_seed(distances, seed),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.ai.config()
    }
}

impl Agent for SearchAgent {
    fn name(&self) -> &str {
        "search"
    }

    fn pick_move(&mut self, board: &dyn Board) -> Result<Move, AgentError> {
        if board.available_moves().is_empty() {
            return Err(AgentError::NoMoves);
        }

        let state = match GameState::from_board(board) {
            Ok(state) => state,
            Err(GameError::UnknownFugitiveLocation) => {
                tracing::debug!("fugitive not yet seen, falling back to greedy");
                return self.fallback.pick_move(board);
            }
            Err(e) => return Err(e.into()),
        };

        let outcome = self.ai.search(&state)?;
        tracing::debug!(
            best = ?outcome.best_move,
            score = outcome.score,
            nodes = outcome.nodes,
            "search finished"
        );

        match outcome.best_move {
            Some(mv) if board.available_moves().contains(&mv) => Ok(mv),
            _ => self.fallback.pick_move(board),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
