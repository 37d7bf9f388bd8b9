//! Distance table persistence
//!
//! The table is stored as JSON next to the board file and rebuilt when it is
//! missing, unreadable or built from a different graph.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pursuit_core::{DistanceTable, Graph};

/// Where the table for `board` lives unless `--cache` says otherwise
pub fn default_cache_path(board: &Path) -> PathBuf {
    board.with_extension("distances.json")
}

/// How the table was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Cached,
    Built,
}

/// Load the cached table for `graph`, rebuilding and saving it if needed
pub fn load_or_build(graph: &Graph, path: &Path) -> Result<(DistanceTable, Source)> {
    if let Some(table) = load(graph, path) {
        tracing::info!("Loaded distance table from {}", path.display());
        return Ok((table, Source::Cached));
    }

    let table = DistanceTable::build(graph);
    tracing::info!(
        "Built distance table for {} nodes, saving to {}",
        graph.node_count(),
        path.display()
    );
    save(&table, path)?;
    Ok((table, Source::Built))
}

fn load(graph: &Graph, path: &Path) -> Option<DistanceTable> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<DistanceTable>(&content) {
        Ok(table) if table.fits(graph) => Some(table),
        Ok(_) => {
            tracing::warn!("Discarding stale distance table {}", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Discarding unreadable distance table {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save(table: &DistanceTable, path: &Path) -> Result<()> {
    let json = serde_json::to_string(table)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write distance table: {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================
