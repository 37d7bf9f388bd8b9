//! Distances command - build or load the distance table and query it

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use pursuit_core::{DistanceTable, Graph, NodeId, UNREACHABLE};

use crate::board_file::BoardFile;
use crate::distance_cache::{default_cache_path, load_or_build, Source};

#[derive(Args)]
pub struct DistancesArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Distance table cache (default: next to the board file)
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Pairs to look up, written FROM:TO
    #[arg(value_name = "FROM:TO", value_parser = parse_pair)]
    pub pairs: Vec<(NodeId, NodeId)>,
}

pub fn run(args: DistancesArgs) -> Result<()> {
    let board = BoardFile::load(&args.board)?;
    let graph = board.graph()?;
    let cache = args.cache.clone().unwrap_or_else(|| default_cache_path(&args.board));
    let (table, source) = load_or_build(&graph, &cache)?;

    if args.pairs.is_empty() {
        print_summary(&graph, &table, source);
        return Ok(());
    }

    for &(from, to) in &args.pairs {
        for node in [from, to] {
            if !graph.contains(node) {
                bail!("Node {} is not on board {}", node, board.display_name());
            }
        }
        println!("{} -> {}: {}", from, to, format_distance(table.distance(from, to)));
    }
    Ok(())
}

fn print_summary(graph: &Graph, table: &DistanceTable, source: Source) {
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());
    println!("Table: {:?}", source);

    let mut diameter = 0;
    let mut disconnected = 0usize;
    for &a in graph.nodes() {
        for &b in graph.nodes() {
            match table.distance(a, b) {
                UNREACHABLE => disconnected += 1,
                d => diameter = diameter.max(d),
            }
        }
    }
    println!("Diameter: {}", diameter);
    println!("Unreachable pairs: {}", disconnected / 2);
}

fn format_distance(d: u32) -> String {
    if d == UNREACHABLE {
        "unreachable".to_string()
    } else {
        d.to_string()
    }
}

fn parse_pair(s: &str) -> Result<(NodeId, NodeId), String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got {s:?}"))?;
    let node = |part: &str| {
        part.trim()
            .parse::<NodeId>()
            .map_err(|e| format!("bad node id {part:?}: {e}"))
    };
    Ok((node(from)?, node(to)?))
}
