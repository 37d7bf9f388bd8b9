//! Board file - JSON description of a map and its starting positions

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use pursuit_core::{
    standard_schedule, GameSetup, GameState, Graph, NodeId, Piece, Player, Tickets, Transport,
};

/// Highest node id a board may use
///
/// The distance table holds `(id + 1)^2` entries.
pub const MAX_NODE_ID: NodeId = 4_000;

/// Board file contents
#[derive(Clone, Debug, Deserialize)]
pub struct BoardFile {
    #[serde(default)]
    pub name: Option<String>,
    /// Declares nodes `1..=node_count`; otherwise only edge endpoints exist
    #[serde(default)]
    pub node_count: Option<NodeId>,
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub schedule: ScheduleSpec,
    pub fugitive: StartSpec,
    pub pursuers: Vec<PursuerSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
    pub transports: Vec<Transport>,
}

/// `"standard"` or one reveal flag per fugitive move
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ScheduleSpec {
    Named(String),
    Flags(Vec<bool>),
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        ScheduleSpec::Named("standard".to_string())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StartSpec {
    pub location: NodeId,
    /// Replaces the default inventory when present
    #[serde(default)]
    pub tickets: Option<Tickets>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PursuerSpec {
    pub piece: Piece,
    pub location: NodeId,
    #[serde(default)]
    pub tickets: Option<Tickets>,
}

impl BoardFile {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid board file: {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn graph(&self) -> Result<Graph> {
        let highest = self
            .node_count
            .into_iter()
            .chain(self.edges.iter().flat_map(|e| [e.from, e.to]))
            .max()
            .unwrap_or(0);
        if highest > MAX_NODE_ID {
            bail!("Node id {} exceeds the limit of {}", highest, MAX_NODE_ID);
        }

        if let Some(e) = self.edges.iter().find(|e| e.transports.is_empty()) {
            bail!("Edge {}-{} has no transports", e.from, e.to);
        }

        let nodes: Vec<NodeId> = match self.node_count {
            Some(count) => (1..=count).collect(),
            None => self.edges.iter().flat_map(|e| [e.from, e.to]).collect(),
        };

        let edges = self
            .edges
            .iter()
            .flat_map(|e| e.transports.iter().map(move |&t| (e.from, e.to, t)));

        Ok(Graph::new(nodes, edges)?)
    }

    pub fn schedule(&self) -> Result<Vec<bool>> {
        match &self.schedule {
            ScheduleSpec::Named(name) if name == "standard" => Ok(standard_schedule()),
            ScheduleSpec::Named(name) => bail!("Unknown schedule: {name}"),
            ScheduleSpec::Flags(flags) => Ok(flags.clone()),
        }
    }

    pub fn setup(&self) -> Result<Arc<GameSetup>> {
        Ok(Arc::new(GameSetup::new(self.graph()?, self.schedule()?)))
    }

    /// Starting state on `setup`
    pub fn initial_state(&self, setup: Arc<GameSetup>) -> Result<GameState> {
        let fugitive = Player::new(
            Piece::Fugitive,
            self.fugitive.location,
            self.fugitive.tickets.unwrap_or_else(Tickets::fugitive_default),
        );
        let pursuers = self
            .pursuers
            .iter()
            .map(|p| {
                Player::new(
                    p.piece,
                    p.location,
                    p.tickets.unwrap_or_else(Tickets::pursuer_default),
                )
            })
            .collect();

        GameState::new(setup, fugitive, pursuers).context("Invalid starting positions")
    }
}

// ============================================================================
// TESTS
// ============================================================================
