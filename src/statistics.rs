use crate::algorithms::{search, Strategy};
use crate::grid::{Grid, Position};
use log::{debug, info};
use pathfinding::prelude::bfs;
use rustc_hash::FxHashSet;
use std::fmt;
use std::time::Duration;

/// Aggregate of repeated runs of one strategy on one maze.
#[derive(Debug, Clone)]
pub struct AlgorithmStats {
    pub strategy: Strategy,
    pub runs: usize,
    pub mean_elapsed: Duration,
    pub mean_explored: f64,
    /// Path and explored set of the first run that found a path. Paths are
    /// taken whole from one run, never averaged.
    pub path: Option<Vec<Position>>,
    pub explored: FxHashSet<Position>,
}

impl AlgorithmStats {
    /// Runs `strategy` `runs` times (at least once) on the same grid.
    pub fn collect(strategy: Strategy, grid: &Grid, runs: usize) -> Self {
        let runs = runs.max(1);
        let mut total_elapsed = Duration::ZERO;
        let mut total_explored = 0usize;
        let mut path = None;
        let mut explored = FxHashSet::default();

        for _ in 0..runs {
            let result = search(strategy, grid);
            total_elapsed += result.elapsed;
            total_explored += result.explored_count;
            if path.is_none() && result.path.is_some() {
                path = result.path;
                explored = result.explored;
            }
        }

        AlgorithmStats {
            strategy,
            runs,
            mean_elapsed: total_elapsed / runs as u32,
            mean_explored: total_explored as f64 / runs as f64,
            path,
            explored,
        }
    }

    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Positions on the path, 0 when none was found.
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }

    /// Path length relative to the shortest possible one; 1.0 is optimal.
    pub fn route_efficiency(&self, optimal_len: Option<usize>) -> Option<f64> {
        match (self.path_len(), optimal_len) {
            (len, Some(optimal)) if len > 0 && optimal > 0 => Some(len as f64 / optimal as f64),
            _ => None,
        }
    }
}

/// Length in positions of a shortest start-to-goal path, worked out
/// independently of this crate's own strategies.
pub fn optimal_path_len(grid: &Grid) -> Option<usize> {
    let (start, goal) = grid.endpoints()?;
    bfs(&start, |&p| grid.neighbors(p), |&p| p == goal).map(|path| path.len())
}

#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub rows: usize,
    pub cols: usize,
    pub runs: usize,
    pub optimal_path_len: Option<usize>,
    /// One entry per strategy, in `Strategy::ALL` order.
    pub stats: Vec<AlgorithmStats>,
}

impl ComparisonReport {
    pub fn get(&self, strategy: Strategy) -> Option<&AlgorithmStats> {
        self.stats.iter().find(|s| s.strategy == strategy)
    }

    /// Entries by mean elapsed time, fastest first.
    pub fn ranked(&self) -> Vec<&AlgorithmStats> {
        let mut ranked: Vec<&AlgorithmStats> = self.stats.iter().collect();
        ranked.sort_by_key(|s| s.mean_elapsed);
        ranked
    }

    pub fn fastest(&self) -> Option<&AlgorithmStats> {
        self.stats.iter().min_by_key(|s| s.mean_elapsed)
    }

    pub fn fewest_explored(&self) -> Option<&AlgorithmStats> {
        self.stats
            .iter()
            .min_by(|a, b| a.mean_explored.total_cmp(&b.mean_explored))
    }
}

/// Runs every strategy `runs` times on `grid` and gathers the results.
///
/// The grid is only borrowed, so every run of every strategy sees the same
/// maze.
pub fn compare(grid: &Grid, runs: usize) -> ComparisonReport {
    let runs = runs.max(1);
    info!(
        "comparing {} algorithms on {}x{} maze, {} run(s) each",
        Strategy::ALL.len(),
        grid.rows(),
        grid.cols(),
        runs
    );

    let stats: Vec<AlgorithmStats> = Strategy::ALL
        .iter()
        .map(|&strategy| {
            let stats = AlgorithmStats::collect(strategy, grid, runs);
            debug!(
                "{}: mean {:?}, {:.1} explored, path length {}",
                strategy,
                stats.mean_elapsed,
                stats.mean_explored,
                stats.path_len()
            );
            stats
        })
        .collect();

    ComparisonReport {
        rows: grid.rows(),
        cols: grid.cols(),
        runs,
        optimal_path_len: optimal_path_len(grid),
        stats,
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Maze {}x{} | {} run(s) per algorithm | shortest path: {}",
            self.rows,
            self.cols,
            self.runs,
            self.optimal_path_len
                .map_or_else(|| "none".to_string(), |len| len.to_string())
        )?;
        writeln!(
            f,
            "{:<4} {:<15} {:<7} {:<10} {:<12} {:<14} {:<10}",
            "Rank", "Algorithm", "Found", "Path Len", "Explored", "Avg Time", "Efficiency"
        )?;
        writeln!(f, "{}", "-".repeat(78))?;

        for (rank, stats) in self.ranked().into_iter().enumerate() {
            let found = if stats.found() { "yes" } else { "no" };
            let efficiency = stats
                .route_efficiency(self.optimal_path_len)
                .map_or_else(|| "-".to_string(), |e| format!("{:.3}", e));
            writeln!(
                f,
                "{:<4} {:<15} {:<7} {:<10} {:<12.1} {:<14} {:<10}",
                rank + 1,
                stats.strategy.name(),
                found,
                stats.path_len(),
                stats.mean_explored,
                format!("{:.2?}", stats.mean_elapsed),
                efficiency
            )?;
        }
        Ok(())
    }
}
