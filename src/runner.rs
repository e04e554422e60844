//! Pull-based stepping over a search, one snapshot per processed node.
//!
//! The runner does no work between calls to `next` and keeps no clock; any
//! pacing between snapshots belongs to the caller.

use crate::algorithms::{process, Search, Step, Strategy};
use crate::grid::{Grid, Position};
use rustc_hash::FxHashSet;
use std::iter::FusedIterator;

/// State of a search after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Node just processed; `None` on the final snapshot of a failed search.
    pub current: Option<Position>,
    pub explored: FxHashSet<Position>,
    /// Path to `current` so far, or the full path once the goal is reached.
    pub path: Option<Vec<Position>>,
    pub goal_reached: bool,
}

impl Snapshot {
    fn failed(explored: FxHashSet<Position>) -> Self {
        Snapshot {
            current: None,
            explored,
            path: None,
            goal_reached: false,
        }
    }
}

/// Single-use iterator over the snapshots of one search.
///
/// Yields one snapshot per processed node followed by exactly one terminal
/// snapshot, which has `goal_reached` set on success or no `current` node on
/// failure. A grid without start or goal yields only the terminal snapshot.
/// To search again, build a new runner.
pub struct SearchRunner<'g> {
    strategy: Strategy,
    search: Option<Box<dyn Search + 'g>>,
    finished: bool,
}

impl<'g> SearchRunner<'g> {
    pub fn new(strategy: Strategy, grid: &'g Grid) -> Self {
        SearchRunner {
            strategy,
            search: process(strategy, grid),
            finished: false,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Nodes processed so far.
    pub fn explored_count(&self) -> usize {
        self.search.as_ref().map_or(0, |search| search.explored_count())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for SearchRunner<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.finished {
            return None;
        }

        let Some(search) = self.search.as_mut() else {
            self.finished = true;
            return Some(Snapshot::failed(FxHashSet::default()));
        };

        let snapshot = match search.advance() {
            Step::Expanded(node) => Snapshot {
                current: Some(node),
                explored: search.explored().clone(),
                path: Some(search.trace(node)),
                goal_reached: false,
            },
            Step::Found { node, path } => {
                self.finished = true;
                Snapshot {
                    current: Some(node),
                    explored: search.explored().clone(),
                    path: Some(path),
                    goal_reached: true,
                }
            }
            Step::Exhausted => {
                self.finished = true;
                Snapshot::failed(search.explored().clone())
            }
        };
        Some(snapshot)
    }
}

impl FusedIterator for SearchRunner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::search;

    #[test]
    fn one_snapshot_per_pop_plus_terminal() {
        let grid = Grid::parse("S.#\n..#\n#.G").unwrap();
        for strategy in Strategy::ALL {
            let expected = search(strategy, &grid).explored_count + 1;
            let snapshots: Vec<Snapshot> = SearchRunner::new(strategy, &grid).collect();

            assert_eq!(snapshots.len(), expected, "{}", strategy);
            let last = snapshots.last().unwrap();
            assert!(last.goal_reached);
            assert_eq!(last.path.as_ref().unwrap().len(), 5);
            assert!(snapshots[..snapshots.len() - 1].iter().all(|s| !s.goal_reached));
        }
    }

    #[test]
    fn failed_search_ends_without_current_node() {
        let grid = Grid::parse("S.#G").unwrap();
        let mut runner = SearchRunner::new(Strategy::Bfs, &grid);

        let first = runner.next().unwrap();
        assert_eq!(first.current, Some(Position::new(0, 0)));
        assert_eq!(first.path, Some(vec![Position::new(0, 0)]));

        let second = runner.next().unwrap();
        assert_eq!(second.current, Some(Position::new(0, 1)));
        assert_eq!(second.explored.len(), 2);

        let last = runner.next().unwrap();
        assert_eq!(last.current, None);
        assert_eq!(last.path, None);
        assert!(!last.goal_reached);
        assert_eq!(last.explored.len(), 2);

        assert!(runner.next().is_none());
        assert!(runner.next().is_none());
        assert!(runner.is_finished());
    }

    #[test]
    fn missing_endpoint_yields_single_terminal_snapshot() {
        let grid = Grid::parse("S..").unwrap();
        let snapshots: Vec<Snapshot> = SearchRunner::new(Strategy::AStar, &grid).collect();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].current, None);
        assert!(!snapshots[0].goal_reached);
        assert!(snapshots[0].explored.is_empty());
    }

    #[test]
    fn explored_set_only_grows() {
        let grid = Grid::parse("S....\n.###.\n....G").unwrap();
        let runner = SearchRunner::new(Strategy::Dfs, &grid);
        let sizes: Vec<usize> = runner.map(|s| s.explored.len()).collect();

        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }
}
