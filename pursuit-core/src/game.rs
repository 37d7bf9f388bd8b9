//! Game state, move generation and transitions
//!
//! A `GameState` is immutable: `advance` validates a move against the
//! memoised legal-move list and builds a fresh state, re-deriving moves and
//! winner in the constructor.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, Ticket};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Length of the standard reveal schedule
pub const STANDARD_MOVES: usize = 24;

/// Fugitive moves (1-based) published in the standard schedule
pub const STANDARD_REVEALS: [usize; 5] = [3, 8, 13, 18, 24];

/// Standard schedule: `STANDARD_MOVES` entries, revealing `STANDARD_REVEALS`
pub fn standard_schedule() -> Vec<bool> {
    (1..=STANDARD_MOVES)
        .map(|m| STANDARD_REVEALS.contains(&m))
        .collect()
}

// ============================================================================
// PIECES
// ============================================================================

/// Player identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Fugitive = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
    White = 4,
    Yellow = 5,
}

pub const ALL_PIECES: [Piece; 6] = [
    Piece::Fugitive,
    Piece::Red,
    Piece::Green,
    Piece::Blue,
    Piece::White,
    Piece::Yellow,
];

pub const PURSUERS: [Piece; 5] = [Piece::Red, Piece::Green, Piece::Blue, Piece::White, Piece::Yellow];

impl Piece {
    pub fn is_fugitive(self) -> bool {
        self == Piece::Fugitive
    }

    pub fn is_pursuer(self) -> bool {
        !self.is_fugitive()
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Fugitive => "Fugitive",
            Piece::Red => "Red",
            Piece::Green => "Green",
            Piece::Blue => "Blue",
            Piece::White => "White",
            Piece::Yellow => "Yellow",
        };
        f.write_str(name)
    }
}

/// Small set of pieces (bitmask)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PieceSet(u8);

impl PieceSet {
    pub const EMPTY: PieceSet = PieceSet(0);

    pub fn of(pieces: &[Piece]) -> Self {
        pieces.iter().copied().collect()
    }

    pub fn with(self, piece: Piece) -> Self {
        PieceSet(self.0 | piece.bit())
    }

    pub fn without(self, piece: Piece) -> Self {
        PieceSet(self.0 & !piece.bit())
    }

    pub fn contains(self, piece: Piece) -> bool {
        self.0 & piece.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate fugitive first, then pursuers in colour order
    pub fn iter(self) -> impl Iterator<Item = Piece> {
        ALL_PIECES.into_iter().filter(move |&p| self.contains(p))
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        iter.into_iter().fold(PieceSet::EMPTY, PieceSet::with)
    }
}

// ============================================================================
// TICKETS AND PLAYERS
// ============================================================================

/// Ticket inventory
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Tickets {
    pub taxi: u32,
    pub bus: u32,
    pub underground: u32,
    pub double: u32,
    pub secret: u32,
}

impl Tickets {
    /// Fugitive's starting inventory in the standard game
    pub fn fugitive_default() -> Self {
        Self { taxi: 4, bus: 3, underground: 3, double: 2, secret: 5 }
    }

    /// Pursuer's starting inventory in the standard game
    pub fn pursuer_default() -> Self {
        Self { taxi: 11, bus: 8, underground: 4, double: 0, secret: 0 }
    }

    pub fn count(&self, ticket: Ticket) -> u32 {
        match ticket {
            Ticket::Taxi => self.taxi,
            Ticket::Bus => self.bus,
            Ticket::Underground => self.underground,
            Ticket::Double => self.double,
            Ticket::Secret => self.secret,
        }
    }

    fn slot(&mut self, ticket: Ticket) -> &mut u32 {
        match ticket {
            Ticket::Taxi => &mut self.taxi,
            Ticket::Bus => &mut self.bus,
            Ticket::Underground => &mut self.underground,
            Ticket::Double => &mut self.double,
            Ticket::Secret => &mut self.secret,
        }
    }

    pub fn has(&self, ticket: Ticket) -> bool {
        self.count(ticket) > 0
    }

    /// True when every count is zero
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> u32 {
        self.taxi + self.bus + self.underground + self.double + self.secret
    }

    /// Copy with one ticket of `ticket` removed
    pub fn spend(mut self, ticket: Ticket) -> Self {
        let slot = self.slot(ticket);
        *slot = slot.saturating_sub(1);
        self
    }

    /// Copy with one ticket of `ticket` added
    pub fn give(mut self, ticket: Ticket) -> Self {
        *self.slot(ticket) += 1;
        self
    }

    /// Copy with the count of `ticket` replaced
    pub fn with(mut self, ticket: Ticket, count: u32) -> Self {
        *self.slot(ticket) = count;
        self
    }
}

/// A piece on the board with its inventory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub piece: Piece,
    pub location: NodeId,
    pub tickets: Tickets,
}

impl Player {
    pub fn new(piece: Piece, location: NodeId, tickets: Tickets) -> Self {
        Self { piece, location, tickets }
    }

    pub fn is_fugitive(&self) -> bool {
        self.piece.is_fugitive()
    }

    /// Spend `ticket` and relocate
    fn travel(self, ticket: Ticket, destination: NodeId) -> Self {
        Self {
            location: destination,
            tickets: self.tickets.spend(ticket),
            ..self
        }
    }
}

// ============================================================================
// LOG, SETUP, MOVES
// ============================================================================

/// One fugitive leg in the travel log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogEntry {
    Revealed { ticket: Ticket, location: NodeId },
    Hidden { ticket: Ticket },
}

impl LogEntry {
    pub fn ticket(&self) -> Ticket {
        match *self {
            LogEntry::Revealed { ticket, .. } | LogEntry::Hidden { ticket } => ticket,
        }
    }

    /// Location if this entry was published
    pub fn location(&self) -> Option<NodeId> {
        match *self {
            LogEntry::Revealed { location, .. } => Some(location),
            LogEntry::Hidden { .. } => None,
        }
    }
}

/// Immutable board setup shared by every state of a game
#[derive(Clone, Debug)]
pub struct GameSetup {
    pub graph: Graph,
    /// One flag per fugitive move: true when that move is published
    pub schedule: Vec<bool>,
}

impl GameSetup {
    pub fn new(graph: Graph, schedule: Vec<bool>) -> Self {
        Self { graph, schedule }
    }

    /// Setup with the standard 24-move schedule
    pub fn standard(graph: Graph) -> Self {
        Self::new(graph, standard_schedule())
    }
}

/// A legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Single {
        piece: Piece,
        source: NodeId,
        ticket: Ticket,
        destination: NodeId,
    },
    Double {
        piece: Piece,
        source: NodeId,
        ticket1: Ticket,
        destination1: NodeId,
        ticket2: Ticket,
        destination2: NodeId,
    },
}

impl Move {
    pub fn piece(&self) -> Piece {
        match *self {
            Move::Single { piece, .. } | Move::Double { piece, .. } => piece,
        }
    }

    pub fn source(&self) -> NodeId {
        match *self {
            Move::Single { source, .. } | Move::Double { source, .. } => source,
        }
    }

    /// Final location after the move
    pub fn destination(&self) -> NodeId {
        match *self {
            Move::Single { destination, .. } => destination,
            Move::Double { destination2, .. } => destination2,
        }
    }

    /// Travel tickets in leg order (the double ticket is not listed)
    pub fn tickets(&self) -> Vec<Ticket> {
        match *self {
            Move::Single { ticket, .. } => vec![ticket],
            Move::Double { ticket1, ticket2, .. } => vec![ticket1, ticket2],
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Single { piece, source, ticket, destination } => {
                write!(f, "{piece} {source} -{ticket:?}-> {destination}")
            }
            Move::Double { piece, source, ticket1, destination1, ticket2, destination2 } => write!(
                f,
                "{piece} {source} -{ticket1:?}-> {destination1} -{ticket2:?}-> {destination2}"
            ),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("reveal schedule is empty")]
    EmptySchedule,

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("{0} cannot fill the fugitive slot")]
    NotFugitive(Piece),

    #[error("{0} cannot be a pursuer")]
    NotPursuer(Piece),

    #[error("{0} appears more than once")]
    DuplicatePiece(Piece),

    #[error("two pursuers share location {0}")]
    SharedLocation(NodeId),

    #[error("pursuer {piece} holds forbidden {ticket:?} ticket")]
    ForbiddenTicket { piece: Piece, ticket: Ticket },

    #[error("{piece} at {location}, which is not on the board")]
    UnknownLocation { piece: Piece, location: NodeId },

    #[error("travel log has {log} entries but the schedule only {schedule}")]
    LogTooLong { log: usize, schedule: usize },

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("board offers no moves")]
    NoAvailableMoves,

    #[error("board has no ticket board for {0}")]
    MissingTickets(Piece),

    #[error("board has no location for {0}")]
    MissingLocation(Piece),

    #[error("fugitive location is neither visible nor revealed")]
    UnknownFugitiveLocation,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable game state (advance to get a new one)
#[derive(Clone, Debug)]
pub struct GameState {
    setup: Arc<GameSetup>,
    remaining: PieceSet,
    log: Vec<LogEntry>,
    fugitive: Player,
    pursuers: Vec<Player>,

    /// Derived in the constructor, empty once there is a winner
    moves: Vec<Move>,
    winner: PieceSet,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Initial state: fugitive to move, empty log
    pub fn new(
        setup: Arc<GameSetup>,
        fugitive: Player,
        pursuers: Vec<Player>,
    ) -> Result<Self, GameError> {
        Self::from_parts(
            setup,
            PieceSet::of(&[Piece::Fugitive]),
            Vec::new(),
            fugitive,
            pursuers,
        )
    }

    /// Validate invariants and derive legal moves and winner
    pub(crate) fn from_parts(
        setup: Arc<GameSetup>,
        remaining: PieceSet,
        log: Vec<LogEntry>,
        fugitive: Player,
        pursuers: Vec<Player>,
    ) -> Result<Self, GameError> {
        validate(&setup, &log, &fugitive, &pursuers)?;

        let mut state = Self {
            setup,
            remaining,
            log,
            fugitive,
            pursuers,
            moves: Vec::new(),
            winner: PieceSet::EMPTY,
        };
        state.moves = state.generate_moves();
        state.winner = state.detect_winner();
        if !state.winner.is_empty() {
            state.moves.clear();
        }
        Ok(state)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn setup(&self) -> &Arc<GameSetup> {
        &self.setup
    }

    pub fn graph(&self) -> &Graph {
        &self.setup.graph
    }

    pub fn schedule(&self) -> &[bool] {
        &self.setup.schedule
    }

    /// Identities still owed a move this round
    pub fn remaining(&self) -> PieceSet {
        self.remaining
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn fugitive(&self) -> &Player {
        &self.fugitive
    }

    pub fn pursuers(&self) -> &[Player] {
        &self.pursuers
    }

    pub fn player(&self, piece: Piece) -> Option<&Player> {
        if piece.is_fugitive() {
            Some(&self.fugitive)
        } else {
            self.pursuers.iter().find(|p| p.piece == piece)
        }
    }

    /// Every piece in the game
    pub fn pieces(&self) -> PieceSet {
        self.pursuers
            .iter()
            .map(|p| p.piece)
            .chain([Piece::Fugitive])
            .collect()
    }

    pub fn legal_moves(&self) -> &[Move] {
        &self.moves
    }

    /// Empty while the game is undecided
    pub fn winner(&self) -> PieceSet {
        self.winner
    }

    pub fn is_terminal(&self) -> bool {
        !self.winner.is_empty()
    }

    pub fn fugitive_to_move(&self) -> bool {
        self.remaining.contains(Piece::Fugitive)
    }

    pub fn is_occupied_by_pursuer(&self, node: NodeId) -> bool {
        self.pursuers.iter().any(|p| p.location == node)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    fn generate_moves(&self) -> Vec<Move> {
        let graph = &self.setup.graph;
        let occupied: FxHashSet<NodeId> = self.pursuers.iter().map(|p| p.location).collect();
        let mut moves = Vec::new();

        if self.fugitive_to_move() {
            let source = self.fugitive.location;
            for (ticket, destination) in single_legs(graph, &occupied, &self.fugitive, source) {
                moves.push(Move::Single { piece: Piece::Fugitive, source, ticket, destination });
            }
            self.generate_double_moves(&occupied, &mut moves);
        }

        for pursuer in &self.pursuers {
            if !self.remaining.contains(pursuer.piece) {
                continue;
            }
            let source = pursuer.location;
            for (ticket, destination) in single_legs(graph, &occupied, pursuer, source) {
                moves.push(Move::Single { piece: pursuer.piece, source, ticket, destination });
            }
        }

        moves
    }

    /// Fugitive-only combined moves
    ///
    /// Needs a double ticket and at least two schedule slots left. Second
    /// legs see the same pursuer positions as the first.
    fn generate_double_moves(&self, occupied: &FxHashSet<NodeId>, moves: &mut Vec<Move>) {
        let player = &self.fugitive;
        if !player.tickets.has(Ticket::Double) || self.log.len() + 1 >= self.setup.schedule.len() {
            return;
        }

        let graph = &self.setup.graph;
        let source = player.location;
        for (ticket1, destination1) in single_legs(graph, occupied, player, source) {
            for (ticket2, destination2) in single_legs(graph, occupied, player, destination1) {
                if ticket2 == ticket1 && player.tickets.count(ticket1) < 2 {
                    continue;
                }
                moves.push(Move::Double {
                    piece: player.piece,
                    source,
                    ticket1,
                    destination1,
                    ticket2,
                    destination2,
                });
            }
        }
    }

    // ========================================================================
    // WINNER
    // ========================================================================

    fn detect_winner(&self) -> PieceSet {
        let pursuers: PieceSet = self.pursuers.iter().map(|p| p.piece).collect();
        let fugitive = PieceSet::of(&[Piece::Fugitive]);

        // Capture
        if self.is_occupied_by_pursuer(self.fugitive.location) {
            return pursuers;
        }
        // Fugitive cornered
        if self.fugitive_to_move() && !self.moves.iter().any(|m| m.piece().is_fugitive()) {
            return pursuers;
        }
        // Survived the whole schedule
        if self.fugitive_to_move() && self.log.len() == self.setup.schedule.len() {
            return fugitive;
        }
        // Pursuers out of tickets
        if self.pursuers.iter().all(|p| p.tickets.is_empty()) {
            return fugitive;
        }
        PieceSet::EMPTY
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a legal move, returning the next state
    pub fn advance(&self, mv: &Move) -> Result<GameState, GameError> {
        if !self.moves.contains(mv) {
            return Err(GameError::IllegalMove(*mv));
        }

        match *mv {
            Move::Single { piece, ticket, destination, .. } if piece.is_fugitive() => {
                self.apply_fugitive_single(ticket, destination)
            }
            Move::Single { piece, ticket, destination, .. } => {
                self.apply_pursuer_single(piece, ticket, destination)
            }
            Move::Double { ticket1, destination1, ticket2, destination2, .. } => {
                self.apply_double(ticket1, destination1, ticket2, destination2)
            }
        }
    }

    fn apply_fugitive_single(&self, ticket: Ticket, destination: NodeId) -> Result<GameState, GameError> {
        let mut log = self.log.clone();
        self.record(&mut log, ticket, destination);

        Self::from_parts(
            Arc::clone(&self.setup),
            self.all_pursuers(),
            log,
            self.fugitive.travel(ticket, destination),
            self.pursuers.clone(),
        )
    }

    fn apply_pursuer_single(
        &self,
        piece: Piece,
        ticket: Ticket,
        destination: NodeId,
    ) -> Result<GameState, GameError> {
        let pursuers: Vec<Player> = self
            .pursuers
            .iter()
            .map(|&p| if p.piece == piece { p.travel(ticket, destination) } else { p })
            .collect();

        // A pursuer without tickets can never be owed a move
        let mut remaining = self.remaining.without(piece);
        for p in pursuers.iter().filter(|p| p.tickets.is_empty()) {
            remaining = remaining.without(p.piece);
        }
        if remaining.is_empty() {
            remaining = PieceSet::of(&[Piece::Fugitive]);
        }

        let fugitive = Player {
            tickets: self.fugitive.tickets.give(ticket),
            ..self.fugitive
        };

        Self::from_parts(Arc::clone(&self.setup), remaining, self.log.clone(), fugitive, pursuers)
    }

    fn apply_double(
        &self,
        ticket1: Ticket,
        destination1: NodeId,
        ticket2: Ticket,
        destination2: NodeId,
    ) -> Result<GameState, GameError> {
        let mut log = self.log.clone();
        self.record(&mut log, ticket1, destination1);
        self.record(&mut log, ticket2, destination2);

        let mut fugitive = self
            .fugitive
            .travel(ticket1, destination1)
            .travel(ticket2, destination2);
        fugitive.tickets = fugitive.tickets.spend(Ticket::Double);

        Self::from_parts(
            Arc::clone(&self.setup),
            self.all_pursuers(),
            log,
            fugitive,
            self.pursuers.clone(),
        )
    }

    /// Append a log entry, published if the schedule says so
    fn record(&self, log: &mut Vec<LogEntry>, ticket: Ticket, destination: NodeId) {
        let reveal = self.setup.schedule.get(log.len()).copied().unwrap_or(false);
        log.push(if reveal {
            LogEntry::Revealed { ticket, location: destination }
        } else {
            LogEntry::Hidden { ticket }
        });
    }

    fn all_pursuers(&self) -> PieceSet {
        self.pursuers.iter().map(|p| p.piece).collect()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn validate(
    setup: &GameSetup,
    log: &[LogEntry],
    fugitive: &Player,
    pursuers: &[Player],
) -> Result<(), GameError> {
    if setup.schedule.is_empty() {
        return Err(GameError::EmptySchedule);
    }
    if setup.graph.is_empty() {
        return Err(GameError::EmptyGraph);
    }
    if !fugitive.is_fugitive() {
        return Err(GameError::NotFugitive(fugitive.piece));
    }
    if log.len() > setup.schedule.len() {
        return Err(GameError::LogTooLong { log: log.len(), schedule: setup.schedule.len() });
    }

    let mut seen = PieceSet::EMPTY;
    let mut locations = FxHashSet::default();
    for p in pursuers {
        if p.is_fugitive() {
            return Err(GameError::NotPursuer(p.piece));
        }
        for ticket in [Ticket::Double, Ticket::Secret] {
            if p.tickets.has(ticket) {
                return Err(GameError::ForbiddenTicket { piece: p.piece, ticket });
            }
        }
        if seen.contains(p.piece) {
            return Err(GameError::DuplicatePiece(p.piece));
        }
        seen = seen.with(p.piece);
        if !locations.insert(p.location) {
            return Err(GameError::SharedLocation(p.location));
        }
    }

    for p in pursuers.iter().chain([fugitive]) {
        if !setup.graph.contains(p.location) {
            return Err(GameError::UnknownLocation { piece: p.piece, location: p.location });
        }
    }

    Ok(())
}

/// Single legs `(ticket, destination)` for `player` from `source`
///
/// Destinations held by a pursuer are skipped. The fugitive may also use a
/// secret ticket on any edge. Each (ticket, destination) pair appears once.
fn single_legs(
    graph: &Graph,
    occupied: &FxHashSet<NodeId>,
    player: &Player,
    source: NodeId,
) -> Vec<(Ticket, NodeId)> {
    let mut legs = Vec::new();

    for &(destination, transports) in graph.neighbours(source) {
        if occupied.contains(&destination) {
            continue;
        }
        let first = legs.len();
        let push = |legs: &mut Vec<(Ticket, NodeId)>, ticket: Ticket| {
            if !legs[first..].contains(&(ticket, destination)) {
                legs.push((ticket, destination));
            }
        };

        for transport in transports.iter() {
            let ticket = transport.required_ticket();
            if player.tickets.has(ticket) {
                push(&mut legs, ticket);
            }
        }
        if player.is_fugitive() && player.tickets.has(Ticket::Secret) {
            push(&mut legs, Ticket::Secret);
        }
    }

    legs
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Transport;

    /// 1 -taxi- 2 -taxi/bus- 3 -taxi- 4 -ferry- 5, plus 2 -underground- 4
    fn simple_setup(schedule: Vec<bool>) -> Arc<GameSetup> {
        let graph = Graph::from_edges(&[
            (1, 2, Transport::Taxi),
            (2, 3, Transport::Taxi),
            (2, 3, Transport::Bus),
            (3, 4, Transport::Taxi),
            (2, 4, Transport::Underground),
            (4, 5, Transport::Ferry),
        ])
        .unwrap();
        Arc::new(GameSetup::new(graph, schedule))
    }

    fn simple_game() -> GameState {
        GameState::new(
            simple_setup(vec![false, true, false, false]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default())],
        )
        .unwrap()
    }

    fn find_single(state: &GameState, piece: Piece, ticket: Ticket, destination: NodeId) -> Move {
        *state
            .legal_moves()
            .iter()
            .find(|m| {
                matches!(m, Move::Single { piece: p, ticket: t, destination: d, .. }
                    if *p == piece && *t == ticket && *d == destination)
            })
            .unwrap()
    }

    #[test]
    fn test_game_creation() {
        let game = simple_game();
        assert!(game.fugitive_to_move());
        assert!(game.winner().is_empty());
        assert!(game.log().is_empty());
        assert_eq!(game.pieces(), PieceSet::of(&[Piece::Fugitive, Piece::Red]));
        assert!(game.legal_moves().iter().all(|m| m.piece().is_fugitive()));
    }

    #[test]
    fn test_standard_schedule() {
        let schedule = standard_schedule();
        assert_eq!(schedule.len(), 24);
        assert_eq!(schedule.iter().filter(|&&r| r).count(), 5);
        assert!(schedule[2] && schedule[7] && schedule[23]);
        assert!(!schedule[0]);
    }

    #[test]
    fn test_single_moves_for_fugitive() {
        let game = simple_game();
        let singles: Vec<(Ticket, NodeId)> = game
            .legal_moves()
            .iter()
            .filter_map(|m| match *m {
                Move::Single { ticket, destination, .. } => Some((ticket, destination)),
                Move::Double { .. } => None,
            })
            .collect();

        assert_eq!(
            singles,
            vec![
                (Ticket::Taxi, 1),
                (Ticket::Secret, 1),
                (Ticket::Taxi, 3),
                (Ticket::Bus, 3),
                (Ticket::Secret, 3),
                (Ticket::Underground, 4),
                (Ticket::Secret, 4),
            ]
        );
    }

    #[test]
    fn test_pursuer_blocks_destination() {
        // Red on 4: fugitive at 2 cannot land there, even with a secret ticket
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 4, Tickets::pursuer_default())],
        )
        .unwrap();
        assert!(game.legal_moves().iter().all(|m| match *m {
            Move::Single { destination, .. } => destination != 4,
            Move::Double { destination1, destination2, .. } => destination1 != 4 && destination2 != 4,
        }));
    }

    #[test]
    fn test_pursuer_cannot_use_ferry() {
        let game = simple_game();
        let mv = find_single(&game, Piece::Fugitive, Ticket::Taxi, 1);
        let game = game.advance(&mv).unwrap();

        // Red's only edge is the ferry to 4
        assert!(!game.fugitive_to_move());
        assert!(game.legal_moves().is_empty());
        assert!(game.winner().is_empty());
    }

    #[test]
    fn test_double_moves_respect_ticket_counts() {
        let tickets = Tickets::default().with(Ticket::Taxi, 1).with(Ticket::Double, 1);
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 1, tickets),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default())],
        )
        .unwrap();

        // One taxi ticket: 1 -> 2 works, but no taxi-taxi double
        assert_eq!(game.legal_moves().len(), 1);
        assert!(!game.legal_moves().iter().any(|m| matches!(m, Move::Double { .. })));

        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 1, tickets.with(Ticket::Taxi, 2)),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default())],
        )
        .unwrap();
        let doubles: Vec<&Move> = game
            .legal_moves()
            .iter()
            .filter(|m| matches!(m, Move::Double { .. }))
            .collect();
        // 1 -> 2 -> {1, 3}
        assert_eq!(doubles.len(), 2);
    }

    #[test]
    fn test_no_double_without_two_slots_left() {
        let game = GameState::new(
            simple_setup(vec![false]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default())],
        )
        .unwrap();
        assert!(!game.legal_moves().is_empty());
        assert!(game.legal_moves().iter().all(|m| matches!(m, Move::Single { .. })));
    }

    #[test]
    fn test_fugitive_single_updates_log_and_remaining() {
        let game = GameState::new(
            simple_setup(vec![true, false, false, false]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![
                Player::new(Piece::Red, 5, Tickets::pursuer_default()),
                Player::new(Piece::Blue, 1, Tickets::pursuer_default()),
            ],
        )
        .unwrap();

        let mv = find_single(&game, Piece::Fugitive, Ticket::Bus, 3);
        let next = game.advance(&mv).unwrap();

        assert_eq!(next.log(), &[LogEntry::Revealed { ticket: Ticket::Bus, location: 3 }]);
        assert_eq!(next.fugitive().location, 3);
        assert_eq!(next.fugitive().tickets.bus, 2);
        assert_eq!(next.remaining(), PieceSet::of(&[Piece::Red, Piece::Blue]));
        // Original untouched
        assert_eq!(game.fugitive().location, 2);
        assert!(game.log().is_empty());
    }

    #[test]
    fn test_pursuer_single_transfers_ticket() {
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 4, Tickets::fugitive_default()),
            vec![
                Player::new(Piece::Red, 1, Tickets::pursuer_default()),
                Player::new(Piece::Blue, 3, Tickets::pursuer_default()),
            ],
        )
        .unwrap();
        let game = game.advance(&find_single(&game, Piece::Fugitive, Ticket::Secret, 5)).unwrap();
        assert_eq!(game.log(), &[LogEntry::Hidden { ticket: Ticket::Secret }]);

        let mv = find_single(&game, Piece::Red, Ticket::Taxi, 2);
        let next = game.advance(&mv).unwrap();
        assert_eq!(next.remaining(), PieceSet::of(&[Piece::Blue]));
        assert_eq!(next.fugitive().tickets.taxi, game.fugitive().tickets.taxi + 1);
        assert_eq!(next.player(Piece::Red).unwrap().tickets.taxi, 10);
        // Order of pursuers is stable
        assert_eq!(next.pursuers()[0].piece, Piece::Red);

        let mv = find_single(&next, Piece::Blue, Ticket::Taxi, 4);
        let last = next.advance(&mv).unwrap();
        assert!(last.fugitive_to_move());
        assert_eq!(last.remaining(), PieceSet::of(&[Piece::Fugitive]));
    }

    #[test]
    fn test_double_move_logs_both_legs() {
        let game = simple_game();
        let mv = *game
            .legal_moves()
            .iter()
            .find(|m| {
                matches!(m, Move::Double { ticket1: Ticket::Taxi, destination1: 3, ticket2: Ticket::Taxi, destination2: 4, .. })
            })
            .unwrap();
        let next = game.advance(&mv).unwrap();

        assert_eq!(
            next.log(),
            &[
                LogEntry::Hidden { ticket: Ticket::Taxi },
                LogEntry::Revealed { ticket: Ticket::Taxi, location: 4 },
            ]
        );
        assert_eq!(next.fugitive().location, 4);
        assert_eq!(next.fugitive().tickets.taxi, 2);
        assert_eq!(next.fugitive().tickets.double, 1);
        assert_eq!(next.remaining(), PieceSet::of(&[Piece::Red]));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let game = simple_game();
        let mv = Move::Single { piece: Piece::Red, source: 5, ticket: Ticket::Taxi, destination: 4 };
        assert_eq!(game.advance(&mv).unwrap_err(), GameError::IllegalMove(mv));
    }

    #[test]
    fn test_capture_is_terminal() {
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 3, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 3, Tickets::pursuer_default())],
        )
        .unwrap();
        assert_eq!(game.winner(), PieceSet::of(&[Piece::Red]));
        assert!(game.legal_moves().is_empty());

        // A step that would be legal in a live game is refused
        let step = Move::Single {
            piece: Piece::Fugitive,
            source: 3,
            ticket: Ticket::Taxi,
            destination: 4,
        };
        assert_eq!(game.advance(&step).err(), Some(GameError::IllegalMove(step)));
    }

    #[test]
    fn test_cornered_fugitive_loses() {
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 1, Tickets::default()),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default())],
        )
        .unwrap();
        assert_eq!(game.winner(), PieceSet::of(&[Piece::Red]));
    }

    #[test]
    fn test_fugitive_survives_schedule() {
        let game = GameState::new(
            simple_setup(vec![false]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 5, Tickets::pursuer_default().with(Ticket::Taxi, 0))],
        )
        .unwrap();
        let game = game.advance(&find_single(&game, Piece::Fugitive, Ticket::Taxi, 1)).unwrap();
        // Red cannot use the ferry, so the round never passes back on its own
        assert!(game.winner().is_empty());

        let game = GameState::from_parts(
            Arc::clone(game.setup()),
            PieceSet::of(&[Piece::Fugitive]),
            game.log().to_vec(),
            *game.fugitive(),
            game.pursuers().to_vec(),
        )
        .unwrap();
        assert_eq!(game.winner(), PieceSet::of(&[Piece::Fugitive]));
    }

    #[test]
    fn test_ticketless_pursuers_lose() {
        let game = GameState::new(
            simple_setup(vec![false; 4]),
            Player::new(Piece::Fugitive, 2, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 5, Tickets::default())],
        )
        .unwrap();
        assert_eq!(game.winner(), PieceSet::of(&[Piece::Fugitive]));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_construction_errors() {
        let setup = simple_setup(vec![false; 4]);
        let fugitive = Player::new(Piece::Fugitive, 2, Tickets::fugitive_default());
        let red = Player::new(Piece::Red, 5, Tickets::pursuer_default());

        let err = GameState::new(Arc::clone(&setup), fugitive, vec![red, Player { location: 1, ..red }]);
        assert_eq!(err.unwrap_err(), GameError::DuplicatePiece(Piece::Red));

        let err = GameState::new(Arc::clone(&setup), fugitive, vec![red, Player { piece: Piece::Blue, ..red }]);
        assert_eq!(err.unwrap_err(), GameError::SharedLocation(5));

        let err = GameState::new(
            Arc::clone(&setup),
            fugitive,
            vec![Player { tickets: red.tickets.with(Ticket::Secret, 1), ..red }],
        );
        assert_eq!(
            err.unwrap_err(),
            GameError::ForbiddenTicket { piece: Piece::Red, ticket: Ticket::Secret }
        );

        let err = GameState::new(Arc::clone(&setup), red, vec![]);
        assert_eq!(err.unwrap_err(), GameError::NotFugitive(Piece::Red));

        let err = GameState::new(Arc::clone(&setup), fugitive, vec![Player { location: 9, ..red }]);
        assert_eq!(err.unwrap_err(), GameError::UnknownLocation { piece: Piece::Red, location: 9 });

        let err = GameState::new(simple_setup(vec![]), fugitive, vec![red]);
        assert_eq!(err.unwrap_err(), GameError::EmptySchedule);

        let empty = Arc::new(GameSetup::new(Graph::default(), vec![false]));
        let err = GameState::new(empty, fugitive, vec![red]);
        assert_eq!(err.unwrap_err(), GameError::EmptyGraph);
    }

    #[test]
    fn test_piece_set() {
        let set = PieceSet::of(&[Piece::Blue, Piece::Fugitive]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Piece::Fugitive, Piece::Blue]);
        assert!(set.without(Piece::Blue).contains(Piece::Fugitive));
        assert!(!set.without(Piece::Blue).contains(Piece::Blue));
    }
}
