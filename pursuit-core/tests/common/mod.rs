//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use pursuit_core::{
    standard_schedule, GameSetup, GameState, Graph, NodeId, Piece, Player, Tickets, Transport,
};

const TAXI: &[(NodeId, NodeId)] = &[
    (1, 8), (1, 9), (8, 18), (8, 19), (9, 19), (9, 20), (18, 31), (19, 32), (20, 33),
    (38, 51), (39, 51), (51, 52), (51, 67), (51, 68), (52, 67), (52, 69), (67, 68),
    (67, 84), (66, 67), (68, 85), (62, 79), (63, 79), (79, 93), (93, 94), (94, 95),
    (63, 80), (111, 112), (111, 124), (153, 154), (154, 155), (154, 156), (155, 156),
    (155, 167), (155, 168),
];

const BUS: &[(NodeId, NodeId)] = &[
    (1, 46), (1, 58), (65, 67), (67, 82), (67, 102), (63, 94), (46, 58),
];

const UNDERGROUND: &[(NodeId, NodeId)] = &[
    (1, 46), (46, 79), (67, 79), (67, 89), (67, 111), (79, 111), (79, 93), (111, 153),
];

const FERRY: &[(NodeId, NodeId)] = &[(115, 157)];

/// Part of the London board, node ids 1..=199 (most of them isolated)
pub fn london_fragment() -> Graph {
    let edges = [
        (TAXI, Transport::Taxi),
        (BUS, Transport::Bus),
        (UNDERGROUND, Transport::Underground),
        (FERRY, Transport::Ferry),
    ]
    .into_iter()
    .flat_map(|(pairs, transport)| pairs.iter().map(move |&(a, b)| (a, b, transport)));

    Graph::new(1..=199, edges).unwrap()
}

pub fn standard_setup() -> Arc<GameSetup> {
    Arc::new(GameSetup::new(london_fragment(), standard_schedule()))
}

pub fn pursuer(piece: Piece, location: NodeId) -> Player {
    Player::new(piece, location, Tickets::pursuer_default())
}

/// Fugitive with the standard inventory at `location`
pub fn game_at(location: NodeId, pursuers: &[(Piece, NodeId)]) -> GameState {
    GameState::new(
        standard_setup(),
        Player::new(Piece::Fugitive, location, Tickets::fugitive_default()),
        pursuers.iter().map(|&(piece, at)| pursuer(piece, at)).collect(),
    )
    .unwrap()
}
