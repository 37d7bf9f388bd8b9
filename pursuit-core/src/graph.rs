//! Location graph with typed transport links

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Location id on the board (1-based, 0 is never a node)
pub type NodeId = u16;

// ============================================================================
// TICKETS AND TRANSPORTS
// ============================================================================

/// Consumable ticket kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ticket {
    Taxi,
    Bus,
    Underground,
    Double,
    Secret,
}

pub const ALL_TICKETS: [Ticket; 5] = [
    Ticket::Taxi,
    Ticket::Bus,
    Ticket::Underground,
    Ticket::Double,
    Ticket::Secret,
];

/// Transport modes that label an edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Taxi = 0,
    Bus = 1,
    Underground = 2,
    Ferry = 3,
}

pub const ALL_TRANSPORTS: [Transport; 4] = [
    Transport::Taxi,
    Transport::Bus,
    Transport::Underground,
    Transport::Ferry,
];

impl Transport {
    /// Ticket spent when travelling by this transport
    pub fn required_ticket(self) -> Ticket {
        match self {
            Transport::Taxi => Ticket::Taxi,
            Transport::Bus => Ticket::Bus,
            Transport::Underground => Ticket::Underground,
            Transport::Ferry => Ticket::Secret,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of transports on one edge (bitmask, one bit per transport)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TransportSet(u8);

impl TransportSet {
    pub const EMPTY: TransportSet = TransportSet(0);

    pub fn of(transports: &[Transport]) -> Self {
        transports
            .iter()
            .fold(Self::EMPTY, |set, &t| set.with(t))
    }

    pub fn with(self, transport: Transport) -> Self {
        TransportSet(self.0 | transport.bit())
    }

    pub fn contains(self, transport: Transport) -> bool {
        self.0 & transport.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate in declaration order (taxi, bus, underground, ferry)
    pub fn iter(self) -> impl Iterator<Item = Transport> {
        ALL_TRANSPORTS.into_iter().filter(move |&t| self.contains(t))
    }
}

// ============================================================================
// GRAPH
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node id 0 is reserved")]
    ZeroNode,

    #[error("edge {from}-{to} names undeclared node {node}")]
    UnknownNode { from: NodeId, to: NodeId, node: NodeId },

    #[error("self-loop at node {0}")]
    SelfLoop(NodeId),
}

/// Undirected movement graph
///
/// Adjacency lists are sorted by neighbour id, so every enumeration built on
/// top of the graph is deterministic.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Sorted node ids
    nodes: Vec<NodeId>,
    /// Indexed by node id: (neighbour, transports) sorted by neighbour
    adjacency: Vec<Vec<(NodeId, TransportSet)>>,
}

impl Graph {
    /// Build from an explicit node list and labelled edges.
    ///
    /// Repeated edges between the same pair merge their transports.
    pub fn new(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId, Transport)>,
    ) -> Result<Self, GraphError> {
        let mut nodes: Vec<NodeId> = nodes.into_iter().collect();
        nodes.sort_unstable();
        nodes.dedup();
        if nodes.first() == Some(&0) {
            return Err(GraphError::ZeroNode);
        }

        let size = nodes.last().map_or(0, |&n| n as usize + 1);
        let mut declared = vec![false; size];
        for &n in &nodes {
            declared[n as usize] = true;
        }

        let mut adjacency: Vec<Vec<(NodeId, TransportSet)>> = vec![Vec::new(); size];
        for (from, to, transport) in edges {
            if from == to {
                return Err(GraphError::SelfLoop(from));
            }
            for node in [from, to] {
                if !declared.get(node as usize).copied().unwrap_or(false) {
                    return Err(GraphError::UnknownNode { from, to, node });
                }
            }
            Self::link(&mut adjacency[from as usize], to, transport);
            Self::link(&mut adjacency[to as usize], from, transport);
        }

        for list in &mut adjacency {
            list.sort_unstable_by_key(|&(n, _)| n);
        }

        Ok(Self { nodes, adjacency })
    }

    /// Build from edges alone; the node set is every endpoint mentioned
    pub fn from_edges(edges: &[(NodeId, NodeId, Transport)]) -> Result<Self, GraphError> {
        let nodes = edges.iter().flat_map(|&(a, b, _)| [a, b]);
        Self::new(nodes, edges.iter().copied())
    }

    fn link(list: &mut Vec<(NodeId, TransportSet)>, to: NodeId, transport: Transport) {
        match list.iter_mut().find(|(n, _)| *n == to) {
            Some((_, set)) => *set = set.with(transport),
            None => list.push((to, TransportSet::EMPTY.with(transport))),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest node id (0 for an empty graph)
    pub fn max_node(&self) -> NodeId {
        self.nodes.last().copied().unwrap_or(0)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }

    /// Neighbours of `node` with their transports (empty for unknown nodes)
    pub fn neighbours(&self, node: NodeId) -> &[(NodeId, TransportSet)] {
        self.adjacency
            .get(node as usize)
            .map_or(&[], |list| list.as_slice())
    }

    pub fn adjacent_nodes(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbours(node).iter().map(|&(n, _)| n)
    }

    /// Transports between two nodes, in either direction
    pub fn transports(&self, a: NodeId, b: NodeId) -> TransportSet {
        let list = self.neighbours(a);
        list.binary_search_by_key(&b, |&(n, _)| n)
            .map_or(TransportSet::EMPTY, |i| list[i].1)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Stable hash of the node ids and adjacency
    ///
    /// Transports are left out since hop distances do not depend on them.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.nodes.hash(&mut hasher);
        for &node in &self.nodes {
            node.hash(&mut hasher);
            for adj in self.adjacent_nodes(node) {
                adj.hash(&mut hasher);
            }
            // Separates one adjacency list from the next
            0u16.hash(&mut hasher);
        }
        hasher.finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
