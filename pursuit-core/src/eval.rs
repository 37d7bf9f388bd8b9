//! Position evaluation from the fugitive's point of view
//!
//! Higher is better for the fugitive. Pursuers minimise the same number.

use crate::distances::DistanceTable;
use crate::game::{GameState, LogEntry, Piece};
use crate::graph::NodeId;

/// Terminal value (effectively infinite)
pub const WIN_VALUE: i32 = 10_000;

/// Subtracted when a pursuer is one hop away
pub const DANGER_PENALTY: i32 = 1_000;

/// Weight of each free neighbouring location
pub const FREEDOM_WEIGHT: i32 = 2;

/// Score for a decided game, `None` while play continues
pub fn terminal_score(state: &GameState) -> Option<i32> {
    let winner = state.winner();
    if winner.is_empty() {
        None
    } else if winner.contains(Piece::Fugitive) {
        Some(WIN_VALUE)
    } else {
        Some(-WIN_VALUE)
    }
}

/// Evaluate `state` with the fugitive standing at `location`
///
/// Terminal states score `±WIN_VALUE` regardless of location.
pub fn evaluate(state: &GameState, distances: &DistanceTable, location: NodeId) -> i32 {
    terminal_score(state).unwrap_or_else(|| heuristic(state, distances, location))
}

/// Distance-and-freedom score, ignoring whether the game is over
pub fn heuristic(state: &GameState, distances: &DistanceTable, location: NodeId) -> i32 {
    let mut total: i32 = 0;
    let mut closest = i32::MAX;
    for pursuer in state.pursuers() {
        let d = distances.distance(location, pursuer.location) as i32;
        total += d;
        closest = closest.min(d);
    }

    // Distance from where the pursuers last saw the fugitive
    if let Some(revealed) = last_revealed_location(state.log()) {
        total += distances.distance(location, revealed) as i32;
    }

    let score = total + FREEDOM_WEIGHT * freedom(state, location);
    if closest == 1 {
        score - DANGER_PENALTY
    } else {
        score
    }
}

/// Neighbours of `location` not held by a pursuer
pub fn freedom(state: &GameState, location: NodeId) -> i32 {
    state
        .graph()
        .adjacent_nodes(location)
        .filter(|&n| !state.is_occupied_by_pursuer(n))
        .count() as i32
}

/// Most recent published fugitive location in the log
pub fn last_revealed_location(log: &[LogEntry]) -> Option<NodeId> {
    log.iter().rev().find_map(LogEntry::location)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameSetup, Player, Tickets};
    use crate::graph::{Graph, Ticket, Transport};
    use std::sync::Arc;

    /// Hub 1 with spokes 2..=5, and a chain 5-6-7-8
    fn star_graph() -> Graph {
        Graph::from_edges(&[
            (1, 2, Transport::Taxi),
            (1, 3, Transport::Taxi),
            (1, 4, Transport::Bus),
            (1, 5, Transport::Underground),
            (5, 6, Transport::Taxi),
            (6, 7, Transport::Taxi),
            (7, 8, Transport::Taxi),
        ])
        .unwrap()
    }

    fn simple_game(fugitive: NodeId, pursuers: &[(Piece, NodeId)]) -> GameState {
        let setup = Arc::new(GameSetup::new(star_graph(), vec![false; 6]));
        GameState::new(
            setup,
            Player::new(Piece::Fugitive, fugitive, Tickets::fugitive_default()),
            pursuers
                .iter()
                .map(|&(piece, at)| Player::new(piece, at, Tickets::pursuer_default()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_heuristic_sums_distance_and_freedom() {
        let game = simple_game(1, &[(Piece::Red, 8)]);
        let table = DistanceTable::build(game.graph());
        // 4 hops to Red, four free spokes
        assert_eq!(evaluate(&game, &table, 1), 4 + 2 * 4);
    }

    #[test]
    fn test_occupied_neighbours_reduce_freedom() {
        let game = simple_game(1, &[(Piece::Red, 7), (Piece::Blue, 3)]);
        let table = DistanceTable::build(game.graph());
        assert_eq!(freedom(&game, 1), 3);
        // Blue is adjacent: 3 + 1 + 2*3 - penalty
        assert_eq!(evaluate(&game, &table, 1), 3 + 1 + 6 - DANGER_PENALTY);
    }

    #[test]
    fn test_terminal_scores() {
        let table = DistanceTable::build(&star_graph());
        let caught = simple_game(2, &[(Piece::Red, 2)]);
        assert_eq!(evaluate(&caught, &table, 2), -WIN_VALUE);

        let setup = Arc::new(GameSetup::new(star_graph(), vec![false; 6]));
        let stranded = GameState::new(
            setup,
            Player::new(Piece::Fugitive, 1, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 8, Tickets::default())],
        )
        .unwrap();
        assert_eq!(terminal_score(&stranded), Some(WIN_VALUE));
        assert_eq!(terminal_score(&simple_game(1, &[(Piece::Red, 8)])), None);
    }

    #[test]
    fn test_last_revealed_location() {
        assert_eq!(last_revealed_location(&[]), None);
        let log = [
            LogEntry::Revealed { ticket: Ticket::Taxi, location: 12 },
            LogEntry::Hidden { ticket: Ticket::Bus },
            LogEntry::Revealed { ticket: Ticket::Secret, location: 30 },
            LogEntry::Hidden { ticket: Ticket::Taxi },
        ];
        assert_eq!(last_revealed_location(&log), Some(30));
        assert_eq!(last_revealed_location(&log[..2]), Some(12));
        assert_eq!(last_revealed_location(&log[1..2]), None);
    }

    #[test]
    fn test_revealed_location_adds_distance() {
        let setup = Arc::new(GameSetup::new(star_graph(), vec![true, false, false]));
        let game = GameState::new(
            setup,
            Player::new(Piece::Fugitive, 6, Tickets::fugitive_default()),
            vec![Player::new(Piece::Red, 2, Tickets::pursuer_default())],
        )
        .unwrap();
        let mv = *game
            .legal_moves()
            .iter()
            .find(|m| m.destination() == 7 && m.tickets() == vec![Ticket::Taxi])
            .unwrap();
        let game = game.advance(&mv).unwrap();
        let table = DistanceTable::build(game.graph());

        // At 8: Red is 5 hops away, the reveal at 7 is 1 hop, one free neighbour
        assert_eq!(evaluate(&game, &table, 8), 5 + 1 + 2);
    }
}
