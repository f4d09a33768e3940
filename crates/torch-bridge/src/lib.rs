//! Bridge and torch puzzle solver.
//!
//! This crate finds the fastest way to move every entity across a bridge
//! when a single light must accompany each crossing. It builds the full
//! state graph breadth-first and then runs a shortest-path search over it.

pub mod error;
pub mod graph;
pub mod puzzle;
pub mod solver;

use std::time::Instant;

use tracing::info_span;

// Re-export main types
pub use error::{PuzzleError, Result};
pub use graph::{build, build_from_table, Edge, Graph};
pub use puzzle::{Configuration, DurationTable, Entity, EntityId, PuzzleConfig, Side};
pub use solver::{solve, Crossing, Path, SolveOutcome};

/// Size of the explored state graph and how long the whole solve took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveStats {
    pub nodes: usize,
    pub edges: usize,
    pub time_elapsed_ms: u64,
}

/// A minimum-time crossing plan for a puzzle
#[derive(Debug, Clone)]
pub struct Solution {
    pub path: Path,
    pub stats: SolveStats,
}

/// Validate, build and solve a puzzle from everyone on the start bank to
/// everyone on the far bank.
///
/// Invalid input is rejected before anything is built; a goal that cannot
/// be reached is reported as [`PuzzleError::GoalUnreachable`].
pub fn solve_puzzle(puzzle: &PuzzleConfig) -> Result<Solution> {
    let _span = info_span!("solve_puzzle", entities = puzzle.entities.len()).entered();
    let start_time = Instant::now();

    let table = puzzle.validate()?;
    let graph = build_from_table(&table);
    let outcome = solve(&graph, &Configuration::initial(&table), &Configuration::goal());

    let path = outcome.into_path().ok_or(PuzzleError::GoalUnreachable)?;
    Ok(Solution {
        path,
        stats: SolveStats {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        },
    })
}
