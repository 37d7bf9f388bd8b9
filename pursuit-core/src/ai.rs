//! Minimax search with alpha-beta pruning
//!
//! The fugitive maximises `eval::evaluate`, the pursuers minimise it. Every
//! hand-over between the two sides costs one unit of depth; consecutive
//! pursuer moves within a round are free.

use std::sync::Arc;

use crate::distances::DistanceTable;
use crate::eval::{evaluate, heuristic};
use crate::game::{GameError, GameState, Move};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default search depth (side hand-overs)
pub const DEFAULT_DEPTH: u32 = 3;

/// How pursuer candidates are narrowed before recursion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pruning {
    /// Only moves that lower the fugitive's score are searched
    #[default]
    Heuristic,
    /// Every legal move is searched
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u32,
    pub pruning: Pruning,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: Pruning::Heuristic,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }
}

/// Result of a root search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the state has no legal moves
    pub best_move: Option<Move>,
    pub score: i32,
    /// Positions visited below the root
    pub nodes: u64,
}

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Alpha-beta player for either side
#[derive(Clone, Debug)]
pub struct MinimaxAI {
    distances: Arc<DistanceTable>,
    config: SearchConfig,
}

impl MinimaxAI {
    pub fn new(distances: Arc<DistanceTable>, config: SearchConfig) -> Self {
        Self { distances, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn distances(&self) -> &Arc<DistanceTable> {
        &self.distances
    }

    /// Search from `state` for the side to move
    pub fn search(&self, state: &GameState) -> Result<SearchOutcome, GameError> {
        let mut search = Search {
            distances: &self.distances,
            pruning: self.config.pruning,
            nodes: 0,
        };
        search.root(state, self.config.depth.max(1))
    }

    /// Best move for the side to move, if any
    pub fn best_move(&self, state: &GameState) -> Result<Option<Move>, GameError> {
        Ok(self.search(state)?.best_move)
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Per-search context threaded through the recursion
struct Search<'a> {
    distances: &'a DistanceTable,
    pruning: Pruning,
    nodes: u64,
}

impl Search<'_> {
    fn root(&mut self, state: &GameState, depth: u32) -> Result<SearchOutcome, GameError> {
        let location = state.fugitive().location;
        if state.legal_moves().is_empty() {
            return Ok(SearchOutcome {
                best_move: None,
                score: evaluate(state, self.distances, location),
                nodes: 0,
            });
        }

        let mut best: Option<(Move, i32)> = None;

        if state.fugitive_to_move() {
            let mut alpha = i32::MIN;
            for mv in state.legal_moves() {
                let child = state.advance(mv)?;
                let eval = self.minimax(&child, false, depth - 1, alpha, i32::MAX)?;
                if best.map_or(true, |(_, score)| eval > score) {
                    best = Some((*mv, eval));
                }
                alpha = alpha.max(eval);
            }
        } else {
            let mut candidates = self.candidates(state)?;
            // Always answer with a move while one exists
            if candidates.is_empty() {
                candidates = state
                    .legal_moves()
                    .iter()
                    .map(|mv| state.advance(mv).map(|child| (*mv, child)))
                    .collect::<Result<_, _>>()?;
            }

            let mut beta = i32::MAX;
            for (mv, child) in &candidates {
                let eval = self.pursuer_child(child, depth, i32::MIN, beta)?;
                if best.map_or(true, |(_, score)| eval < score) {
                    best = Some((*mv, eval));
                }
                beta = beta.min(eval);
            }
        }

        Ok(SearchOutcome {
            best_move: best.map(|(mv, _)| mv),
            score: best.map_or(0, |(_, score)| score),
            nodes: self.nodes,
        })
    }

    fn minimax(
        &mut self,
        state: &GameState,
        maximizing: bool,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, GameError> {
        self.nodes += 1;
        let location = state.fugitive().location;

        // Terminal check comes before the depth cutoff
        if state.is_terminal() {
            return Ok(evaluate(state, self.distances, location));
        }
        if depth == 0 {
            return Ok(heuristic(state, self.distances, location));
        }

        if maximizing {
            let mut best = i32::MIN;
            for mv in state.legal_moves() {
                let child = state.advance(mv)?;
                let eval = self.minimax(&child, false, depth - 1, alpha, beta)?;
                best = best.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            Ok(best)
        } else {
            let mut best = i32::MAX;
            for (_, child) in self.candidates(state)? {
                let eval = self.pursuer_child(&child, depth, alpha, beta)?;
                best = best.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            Ok(best)
        }
    }

    /// Recurse below a pursuer move
    ///
    /// Once the round is complete the fugitive maximises one level down;
    /// otherwise the next pursuer moves at the same depth.
    fn pursuer_child(
        &mut self,
        child: &GameState,
        depth: u32,
        alpha: i32,
        beta: i32,
    ) -> Result<i32, GameError> {
        if child.fugitive_to_move() {
            self.minimax(child, true, depth - 1, alpha, beta)
        } else {
            self.minimax(child, false, depth, alpha, beta)
        }
    }

    /// Pursuer moves worth searching, paired with their resulting states
    fn candidates(&self, state: &GameState) -> Result<Vec<(Move, GameState)>, GameError> {
        let location = state.fugitive().location;
        let baseline = evaluate(state, self.distances, location);

        let mut kept = Vec::new();
        for mv in state.legal_moves() {
            let child = state.advance(mv)?;
            let keep = match self.pruning {
                Pruning::Exact => true,
                Pruning::Heuristic => evaluate(&child, self.distances, location) < baseline,
            };
            if keep {
                kept.push((*mv, child));
            }
        }
        Ok(kept)
    }
}

// ============================================================================
// TESTS
// ============================================================================
