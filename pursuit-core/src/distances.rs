//! All-pairs shortest distances over the movement graph
//!
//! Distances count hops (every edge weighs 1 regardless of transport). The
//! table is built once per graph and shared read-only afterwards.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};

/// Distance reported for pairs in different components
pub const UNREACHABLE: u32 = 99_999;

/// Dense node x node distance matrix indexed by node id
///
/// Row and column 0 are padding so node ids index directly. The graph's
/// fingerprint is kept alongside so a persisted table can be matched to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceTable {
    size: usize,
    #[serde(default)]
    fingerprint: u64,
    cells: Vec<u32>,
}

impl DistanceTable {
    /// Run a single-source search from every node
    pub fn build(graph: &Graph) -> Self {
        let size = graph.max_node() as usize + 1;
        let mut cells = vec![UNREACHABLE; size * size];

        for &source in graph.nodes() {
            let row = shortest_paths(graph, source);
            let start = source as usize * size;
            cells[start..start + size].copy_from_slice(&row);
        }

        Self {
            size,
            fingerprint: graph.fingerprint(),
            cells,
        }
    }

    /// Hop distance, `UNREACHABLE` for ids outside the table
    pub fn distance(&self, from: NodeId, to: NodeId) -> u32 {
        let (from, to) = (from as usize, to as usize);
        if from >= self.size || to >= self.size {
            return UNREACHABLE;
        }
        self.cells[from * self.size + to]
    }

    /// All distances from one node, indexed by destination id
    pub fn row(&self, from: NodeId) -> &[u32] {
        let from = from as usize;
        if from >= self.size {
            return &[];
        }
        &self.cells[from * self.size..(from + 1) * self.size]
    }

    /// Number of rows (highest node id + 1)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fingerprint of the graph the table was built from
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Whether this table was built from `graph`
    ///
    /// Used to reject a persisted table that belongs to another board or to
    /// an edited version of the same one.
    pub fn fits(&self, graph: &Graph) -> bool {
        self.size == graph.max_node() as usize + 1
            && self.cells.len() == self.size * self.size
            && self.fingerprint == graph.fingerprint()
    }
}

/// Priority-queue shortest paths with unit edge weights from `source`
///
/// Returns one entry per id `0..=max_node`, `UNREACHABLE` where no path exists.
pub fn shortest_paths(graph: &Graph, source: NodeId) -> Vec<u32> {
    let size = graph.max_node() as usize + 1;
    let mut dist = vec![UNREACHABLE; size];
    if !graph.contains(source) {
        return dist;
    }

    let mut visited = vec![false; size];
    let mut frontier = BinaryHeap::new();
    dist[source as usize] = 0;
    frontier.push(Reverse((0u32, source)));

    while let Some(Reverse((key, node))) = frontier.pop() {
        let idx = node as usize;
        // Stale entry: a shorter path was found after this one was queued
        if key > dist[idx] || visited[idx] {
            continue;
        }
        visited[idx] = true;

        let next = key + 1;
        for adj in graph.adjacent_nodes(node) {
            let adj_idx = adj as usize;
            if visited[adj_idx] {
                continue;
            }
            if next < dist[adj_idx] {
                dist[adj_idx] = next;
                frontier.push(Reverse((next, adj)));
            }
        }
    }

    dist
}

// ============================================================================
// TESTS
// ============================================================================
