//! Minimum-time search over a built state graph.
//!
//! Dijkstra with a lazy-deletion frontier: an improved distance pushes a
//! fresh entry and the superseded one is skipped when popped.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::graph::Graph;
use crate::puzzle::{Configuration, EntityId, Side};

/// Result of a shortest-path search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The goal was reached; the path is minimal in total time
    Found(Path),
    /// The goal cannot be reached from the start
    NotFound,
}

impl SolveOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SolveOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SolveOutcome::Found(path) => Some(path),
            SolveOutcome::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SolveOutcome::Found(path) => Some(path),
            SolveOutcome::NotFound => None,
        }
    }
}

/// Ordered configurations from start to goal and the time they take
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    configurations: Vec<Configuration>,
    total_time: u64,
    #[serde(skip)]
    step_times: Vec<u64>,
}

impl Path {
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    /// Number of crossings along the path
    pub fn len(&self) -> usize {
        self.step_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.step_times.is_empty()
    }

    /// One entry per step, naming who moved, where to, and how long it took
    pub fn crossings(&self) -> Vec<Crossing> {
        self.configurations
            .windows(2)
            .zip(&self.step_times)
            .map(|(pair, &duration)| Crossing::between(&pair[0], &pair[1], duration))
            .collect()
    }
}

/// A single step of a path, as seen by whoever prints it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crossing {
    /// Entities that walked, in sorted order
    pub movers: SmallVec<[EntityId; 2]>,
    /// Bank the movers and the light arrive at
    pub direction: Side,
    pub duration: u64,
}

impl Crossing {
    fn between(from: &Configuration, to: &Configuration, duration: u64) -> Self {
        let movers = from
            .start_bank()
            .symmetric_difference(to.start_bank())
            .cloned()
            .collect();
        Self {
            movers,
            direction: to.light(),
            duration,
        }
    }
}

/// Find a minimum-time path from `start` to `goal`.
///
/// A `start` that is not in the graph yields `NotFound`.
///
/// # Panics
///
/// If an edge leads to a configuration that is not a key of the graph and
/// the search tries to expand it. A graph produced by
/// [`build`](crate::graph::build) never has such edges.
pub fn solve(graph: &Graph, start: &Configuration, goal: &Configuration) -> SolveOutcome {
    if !graph.contains(start) {
        debug!(start = %start, "start configuration not in graph");
        return SolveOutcome::NotFound;
    }

    let mut best: HashMap<Configuration, u64> = HashMap::new();
    let mut previous: HashMap<Configuration, Configuration> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    best.insert(start.clone(), 0);
    frontier.push(Reverse((0u64, start.clone())));

    let mut expanded = 0usize;
    while let Some(Reverse((distance, current))) = frontier.pop() {
        if best.get(&current).is_some_and(|&known| distance > known) {
            continue;
        }

        if &current == goal {
            debug!(expanded, total_time = distance, "goal reached");
            return SolveOutcome::Found(reconstruct(&best, &previous, start, goal));
        }

        let Some(edges) = graph.edges(&current) else {
            panic!("configuration {current} is the target of an edge but missing from the graph");
        };
        expanded += 1;

        for edge in edges {
            // A total past u64::MAX can never beat a distance already known
            let Some(candidate) = distance.checked_add(edge.weight) else {
                continue;
            };
            let improves = best
                .get(&edge.to)
                .is_none_or(|&known| candidate < known);
            if improves {
                best.insert(edge.to.clone(), candidate);
                previous.insert(edge.to.clone(), current.clone());
                frontier.push(Reverse((candidate, edge.to.clone())));
            }
        }
    }

    debug!(expanded, "frontier exhausted without reaching goal");
    SolveOutcome::NotFound
}

/// Walk predecessor links back from the goal. Every configuration on the
/// chain has been expanded, so its distance is final and the per-step time
/// is the difference between neighbours.
fn reconstruct(
    best: &HashMap<Configuration, u64>,
    previous: &HashMap<Configuration, Configuration>,
    start: &Configuration,
    goal: &Configuration,
) -> Path {
    let mut configurations = vec![goal.clone()];
    let mut current = goal;
    while current != start {
        current = &previous[current];
        configurations.push(current.clone());
    }
    configurations.reverse();

    let step_times = configurations
        .windows(2)
        .map(|pair| best[&pair[1]] - best[&pair[0]])
        .collect();

    Path {
        total_time: best[goal],
        configurations,
        step_times,
    }
}
