//! State graph construction.
//!
//! Starting from everyone on the start bank with the light, the builder
//! explores breadth-first and records every reachable configuration
//! together with the timed crossings that connect them.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::puzzle::{Configuration, DurationTable, EntityId, PuzzleConfig, Side};

/// A directed, timed crossing from one configuration to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub to: Configuration,
    pub weight: u64,
}

/// Adjacency map from each configuration to its outgoing crossings
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: HashMap<Configuration, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a configuration with no outgoing edges.
    /// Returns `false` if it was already present.
    pub fn add_node(&mut self, config: Configuration) -> bool {
        if self.adjacency.contains_key(&config) {
            return false;
        }
        self.adjacency.insert(config, Vec::new());
        true
    }

    /// Append an edge unless `from` already has one to `to`, or the weight
    /// is zero. Every crossing takes time, so zero-weight edges are refused.
    ///
    /// `from` is inserted if missing; `to` is left alone, so callers building
    /// a graph by hand must add destinations themselves.
    pub fn add_edge(&mut self, from: &Configuration, to: Configuration, weight: u64) -> bool {
        if weight == 0 {
            return false;
        }
        let edges = self.adjacency.entry(from.clone()).or_default();
        if edges.iter().any(|edge| edge.to == to) {
            return false;
        }
        edges.push(Edge { to, weight });
        true
    }

    pub fn contains(&self, config: &Configuration) -> bool {
        self.adjacency.contains_key(config)
    }

    /// Outgoing edges, or `None` if the configuration is not in the graph
    pub fn edges(&self, config: &Configuration) -> Option<&[Edge]> {
        self.adjacency.get(config).map(Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, &[Edge])> {
        self.adjacency
            .iter()
            .map(|(config, edges)| (config, edges.as_slice()))
    }

    /// Configurations in a stable order, for printing
    pub fn sorted_nodes(&self) -> Vec<&Configuration> {
        let mut nodes: Vec<&Configuration> = self.adjacency.keys().collect();
        nodes.sort();
        nodes
    }
}

/// Validate the puzzle and build its full state graph.
pub fn build(puzzle: &PuzzleConfig) -> Result<Graph> {
    let table = puzzle.validate()?;
    Ok(build_from_table(&table))
}

/// Build the state graph for an already validated duration table.
///
/// Terminal configurations (empty start bank) are recorded but not
/// expanded; the queue is always drained completely.
pub fn build_from_table(table: &DurationTable) -> Graph {
    let initial = Configuration::initial(table);
    debug!(entities = table.len(), "building state graph");

    let mut graph = Graph::new();
    let mut queue = VecDeque::new();
    graph.add_node(initial.clone());
    queue.push_back(initial);

    while let Some(current) = queue.pop_front() {
        if current.is_terminal() {
            trace!(config = %current, "terminal configuration");
            continue;
        }

        for (next, weight) in successors(&current, table) {
            if graph.add_node(next.clone()) {
                queue.push_back(next.clone());
            }
            graph.add_edge(&current, next, weight);
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "state graph built"
    );
    graph
}

/// Every configuration one crossing away from `current`, with its time.
///
/// With the light on the start bank, each unordered pair crosses together,
/// or the lone remaining entity crosses by itself. With the light on the
/// far bank, any single entity over there walks it back.
fn successors(current: &Configuration, table: &DurationTable) -> Vec<(Configuration, u64)> {
    match current.light() {
        Side::Start => {
            let on_start: Vec<&EntityId> = current.start_bank().iter().collect();
            if let [only] = on_start.as_slice() {
                return table
                    .crossing_time([*only])
                    .map(|weight| (current.after_departure(&[*only]), weight))
                    .into_iter()
                    .collect();
            }

            let mut moves = Vec::with_capacity(on_start.len() * on_start.len().saturating_sub(1) / 2);
            for (i, first) in on_start.iter().enumerate() {
                for second in &on_start[i + 1..] {
                    let movers = [*first, *second];
                    if let Some(weight) = table.crossing_time(movers) {
                        moves.push((current.after_departure(&movers), weight));
                    }
                }
            }
            moves
        }
        Side::Far => table
            .ids()
            .filter(|id| !current.start_bank().contains(*id))
            .filter_map(|id| Some((current.after_return(id), table.crossing_time([id])?)))
            .collect(),
    }
}
