use crate::algorithms::Strategy;
use crate::grid::Position;
use rustc_hash::{FxHashMap, FxHashSet};
use std::time::Duration;

/// Predecessor of every discovered node; the seed maps to `None`.
pub type ParentMap = FxHashMap<Position, Option<Position>>;

/// Outcome of a single call to [`Search::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A node was taken off the frontier and processed.
    Expanded(Position),
    /// The search is over and `path` runs from start to goal. `node` is the
    /// goal, or the meeting point for a bidirectional search.
    Found { node: Position, path: Vec<Position> },
    /// The frontier ran dry without reaching the goal.
    Exhausted,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::Expanded(_))
    }
}

/// A search strategy driven one frontier event at a time.
///
/// Every processed node yields one `Expanded` step, including the node that
/// completes the search; the terminal `Found`/`Exhausted` step follows it.
/// Terminal steps are sticky: calling `advance` again repeats them.
pub trait Search {
    fn advance(&mut self) -> Step;

    /// Nodes processed so far.
    fn explored(&self) -> &FxHashSet<Position>;

    fn explored_count(&self) -> usize;

    /// The best known path to `node`, empty if `node` was never discovered.
    fn trace(&self, node: Position) -> Vec<Position>;

    /// Moves the explored set out, leaving an empty one behind.
    fn take_explored(&mut self) -> FxHashSet<Position>;
}

/// Walks parent links back from `target` and returns the chain seed-first.
pub fn reconstruct_path(parents: &ParentMap, target: Position) -> Vec<Position> {
    if !parents.contains_key(&target) {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(&Some(prev)) = parents.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Result of running one strategy to completion.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub strategy: Strategy,
    pub path: Option<Vec<Position>>,
    pub explored: FxHashSet<Position>,
    pub explored_count: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    /// The result reported when the grid lacks a start or goal.
    pub fn empty(strategy: Strategy) -> Self {
        SearchResult {
            strategy,
            path: None,
            explored: FxHashSet::default(),
            explored_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of positions on the path, start and goal included.
    pub fn path_len(&self) -> Option<usize> {
        self.path.as_ref().map(Vec::len)
    }
}
