//! Grid search strategies and the dispatch over them.
//!
//! Every strategy is a state machine implementing [`Search`]. [`search`] runs
//! one to completion; [`crate::runner::SearchRunner`] steps one for animation.

pub mod a_star;
pub mod bfs;
pub mod bidirectional;
pub mod common;
pub mod dfs;

pub use common::{Search, SearchResult, Step};

use crate::grid::Grid;
use log::debug;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Bfs,
    Dfs,
    DfsOptimized,
    AStar,
    Bidirectional,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Bfs,
        Strategy::Dfs,
        Strategy::AStar,
        Strategy::DfsOptimized,
        Strategy::Bidirectional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
            Strategy::DfsOptimized => "DFS Optimized",
            Strategy::AStar => "A*",
            Strategy::Bidirectional => "Bi-dir BFS",
        }
    }

    /// Whether a found path is always a shortest one.
    pub fn guarantees_shortest(self) -> bool {
        matches!(self, Strategy::Bfs | Strategy::AStar)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown algorithm {0:?}, expected one of bfs, dfs, dfs_optimized, a_star, bidirectional")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "dfs" => Ok(Strategy::Dfs),
            "dfs_optimized" | "dfs_opt" => Ok(Strategy::DfsOptimized),
            "a_star" | "astar" | "a*" => Ok(Strategy::AStar),
            "bidirectional" | "bfs_bidirectional" | "bfs_bi" => Ok(Strategy::Bidirectional),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Creates the stepping state machine for `strategy`, or `None` when the grid
/// lacks a start or goal.
pub fn process<'g>(strategy: Strategy, grid: &'g Grid) -> Option<Box<dyn Search + 'g>> {
    let (start, goal) = grid.endpoints()?;
    let search: Box<dyn Search + 'g> = match strategy {
        Strategy::Bfs => Box::new(bfs::BreadthFirst::new(grid, start, goal)),
        Strategy::Dfs => Box::new(dfs::DepthFirst::new(grid, start, goal)),
        Strategy::DfsOptimized => Box::new(dfs::DepthFirst::ordered(grid, start, goal)),
        Strategy::AStar => Box::new(a_star::AStar::new(grid, start, goal)),
        Strategy::Bidirectional => Box::new(bidirectional::Bidirectional::new(grid, start, goal)),
    };
    Some(search)
}

/// Runs `strategy` on `grid` until it finds the goal or runs out of frontier.
///
/// A grid without start or goal gives [`SearchResult::empty`]; an unreachable
/// goal gives a result without a path but with the explored data filled in.
pub fn search(strategy: Strategy, grid: &Grid) -> SearchResult {
    let started = Instant::now();
    let Some(mut machine) = process(strategy, grid) else {
        debug!("{}: maze has no start or goal", strategy);
        return SearchResult::empty(strategy);
    };

    let path = loop {
        match machine.advance() {
            Step::Expanded(_) => {}
            Step::Found { path, .. } => break Some(path),
            Step::Exhausted => break None,
        }
    };
    let elapsed = started.elapsed();

    let explored_count = machine.explored_count();
    debug!(
        "{}: explored {} nodes in {:?}, path length {:?}",
        strategy,
        explored_count,
        elapsed,
        path.as_ref().map(Vec::len)
    );

    SearchResult {
        strategy,
        path,
        explored: machine.take_explored(),
        explored_count,
        elapsed,
    }
}
