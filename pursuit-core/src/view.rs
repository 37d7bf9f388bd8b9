//! Read-only board views handed to agents
//!
//! Agents never see a `GameState` directly. The host exposes a `Board`,
//! which for the pursuers hides the fugitive's true location.

use std::sync::Arc;

use crate::eval::last_revealed_location;
use crate::game::{GameError, GameSetup, GameState, LogEntry, Move, Piece, PieceSet, Player, Tickets};
use crate::graph::NodeId;

/// What a player may observe about the game
pub trait Board {
    fn setup(&self) -> &Arc<GameSetup>;

    /// Fugitive first, then pursuers in turn order
    fn players(&self) -> Vec<Piece>;

    /// `None` for the fugitive unless the host exposes it
    fn location(&self, piece: Piece) -> Option<NodeId>;

    fn tickets(&self, piece: Piece) -> Option<Tickets>;

    fn travel_log(&self) -> &[LogEntry];

    fn available_moves(&self) -> &[Move];

    fn winner(&self) -> PieceSet;
}

/// Full information, as seen by the fugitive
impl Board for GameState {
    fn setup(&self) -> &Arc<GameSetup> {
        GameState::setup(self)
    }

    fn players(&self) -> Vec<Piece> {
        std::iter::once(Piece::Fugitive)
            .chain(self.pursuers().iter().map(|p| p.piece))
            .collect()
    }

    fn location(&self, piece: Piece) -> Option<NodeId> {
        self.player(piece).map(|p| p.location)
    }

    fn tickets(&self, piece: Piece) -> Option<Tickets> {
        self.player(piece).map(|p| p.tickets)
    }

    fn travel_log(&self) -> &[LogEntry] {
        self.log()
    }

    fn available_moves(&self) -> &[Move] {
        self.legal_moves()
    }

    fn winner(&self) -> PieceSet {
        GameState::winner(self)
    }
}

/// The pursuers' view: the fugitive's location is withheld
#[derive(Clone, Copy, Debug)]
pub struct PursuerView<'a> {
    state: &'a GameState,
}

impl<'a> PursuerView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }
}

impl Board for PursuerView<'_> {
    fn setup(&self) -> &Arc<GameSetup> {
        self.state.setup()
    }

    fn players(&self) -> Vec<Piece> {
        Board::players(self.state)
    }

    fn location(&self, piece: Piece) -> Option<NodeId> {
        if piece.is_fugitive() {
            None
        } else {
            Board::location(self.state, piece)
        }
    }

    fn tickets(&self, piece: Piece) -> Option<Tickets> {
        Board::tickets(self.state, piece)
    }

    fn travel_log(&self) -> &[LogEntry] {
        self.state.log()
    }

    fn available_moves(&self) -> &[Move] {
        self.state.legal_moves()
    }

    fn winner(&self) -> PieceSet {
        self.state.winner()
    }
}

impl GameState {
    /// Rebuild a searchable state from what `board` shows
    ///
    /// The fugitive is placed at its visible location, else at its last
    /// revealed one. Whoever owns an available move is owed a move.
    pub fn from_board(board: &dyn Board) -> Result<GameState, GameError> {
        let moves = board.available_moves();
        if moves.is_empty() {
            return Err(GameError::NoAvailableMoves);
        }
        let remaining: PieceSet = moves.iter().map(Move::piece).collect();

        let log = board.travel_log().to_vec();
        let location = board
            .location(Piece::Fugitive)
            .or_else(|| last_revealed_location(&log))
            .ok_or(GameError::UnknownFugitiveLocation)?;
        let fugitive = Player::new(Piece::Fugitive, location, player_tickets(board, Piece::Fugitive)?);

        let pursuers = board
            .players()
            .into_iter()
            .filter(|p| p.is_pursuer())
            .map(|piece| {
                let location = board.location(piece).ok_or(GameError::MissingLocation(piece))?;
                Ok(Player::new(piece, location, player_tickets(board, piece)?))
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        GameState::from_parts(Arc::clone(board.setup()), remaining, log, fugitive, pursuers)
    }
}

fn player_tickets(board: &dyn Board, piece: Piece) -> Result<Tickets, GameError> {
    board.tickets(piece).ok_or(GameError::MissingTickets(piece))
}

// ============================================================================
// TESTS
// ============================================================================
