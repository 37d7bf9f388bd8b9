//! Pursuit Core - Hidden-movement pursuit game engine and AI
//!
//! This crate provides the core game logic for a fugitive-and-pursuers game:
//! - Location graph with typed transport links
//! - All-pairs distance table
//! - Immutable game state with move generation and win detection
//! - Position evaluation from the fugitive's point of view
//! - Minimax alpha-beta search and agent strategies
//! - Observable game model

pub mod graph;
pub mod distances;
pub mod game;
pub mod eval;
pub mod ai;
pub mod view;
pub mod agents;
pub mod model;

// Re-exports for convenient access
pub use graph::{Graph, GraphError, NodeId, Ticket, Transport, TransportSet};
pub use distances::{DistanceTable, UNREACHABLE};
pub use game::{
    standard_schedule, GameError, GameSetup, GameState, LogEntry, Move, Piece, PieceSet, Player,
    Tickets, PURSUERS,
};
pub use eval::{evaluate, last_revealed_location, WIN_VALUE};
pub use ai::{MinimaxAI, Pruning, SearchConfig, SearchOutcome, DEFAULT_DEPTH};
pub use view::{Board, PursuerView};
pub use agents::{create_rng, Agent, AgentError, GreedyPursuer, RandomAgent, SearchAgent};
pub use model::{Event, Model, ModelError, Observer, ObserverId};
