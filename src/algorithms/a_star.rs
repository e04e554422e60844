use crate::algorithms::common::{reconstruct_path, ParentMap, Search, Step};
use crate::grid::{manhattan, Grid, Position};
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier entry ordered by `f`, then by insertion order.
///
/// `BinaryHeap` is a max-heap, so `Ord` is reversed: the smallest `f` wins,
/// and among equal `f` the entry pushed first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    f: usize,
    order: u64,
    position: Position,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// A* over unit-cost edges with the Manhattan distance as heuristic.
///
/// The heuristic is consistent on a 4-connected grid, so the first time the
/// goal is popped its path is a shortest one. Improved entries are pushed
/// again rather than updated in place; stale copies are dropped when popped.
pub struct AStar<'g> {
    grid: &'g Grid,
    goal: Position,
    open: BinaryHeap<Entry>,
    g_scores: FxHashMap<Position, usize>,
    parents: ParentMap,
    closed: FxHashSet<Position>,
    explored_count: usize,
    counter: u64,
    reached: bool,
}

impl<'g> AStar<'g> {
    pub fn new(grid: &'g Grid, start: Position, goal: Position) -> Self {
        let mut g_scores = FxHashMap::default();
        g_scores.insert(start, 0);
        let mut parents = ParentMap::default();
        parents.insert(start, None);

        let mut open = BinaryHeap::new();
        open.push(Entry {
            f: manhattan(start, goal),
            order: 0,
            position: start,
        });

        AStar {
            grid,
            goal,
            open,
            g_scores,
            parents,
            closed: FxHashSet::default(),
            explored_count: 0,
            counter: 0,
            reached: false,
        }
    }
}

impl Search for AStar<'_> {
    fn advance(&mut self) -> Step {
        if self.reached {
            return Step::Found {
                node: self.goal,
                path: reconstruct_path(&self.parents, self.goal),
            };
        }

        let current = loop {
            let Some(entry) = self.open.pop() else {
                return Step::Exhausted;
            };
            if self.closed.insert(entry.position) {
                break entry.position;
            }
            trace!("dropping stale entry for {}", entry.position);
        };
        self.explored_count += 1;

        if current == self.goal {
            self.reached = true;
            return Step::Expanded(current);
        }

        let tentative = self.g_scores[&current] + 1;
        for neighbor in self.grid.neighbors(current) {
            if self.closed.contains(&neighbor) {
                continue;
            }
            let improves = self
                .g_scores
                .get(&neighbor)
                .map_or(true, |&known| tentative < known);
            if improves {
                self.g_scores.insert(neighbor, tentative);
                self.parents.insert(neighbor, Some(current));
                self.counter += 1;
                self.open.push(Entry {
                    f: tentative + manhattan(neighbor, self.goal),
                    order: self.counter,
                    position: neighbor,
                });
            }
        }
        Step::Expanded(current)
    }

    fn explored(&self) -> &FxHashSet<Position> {
        &self.closed
    }

    fn explored_count(&self) -> usize {
        self.explored_count
    }

    fn trace(&self, node: Position) -> Vec<Position> {
        reconstruct_path(&self.parents, node)
    }

    fn take_explored(&mut self) -> FxHashSet<Position> {
        std::mem::take(&mut self.closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{search, Strategy};

    #[test]
    fn heap_prefers_low_f_then_earlier_insertion() {
        let mut heap = BinaryHeap::new();
        let p = Position::new(0, 0);
        heap.push(Entry { f: 5, order: 1, position: p });
        heap.push(Entry { f: 3, order: 3, position: p });
        heap.push(Entry { f: 3, order: 2, position: p });
        heap.push(Entry { f: 4, order: 0, position: p });

        let orders: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.order)).collect();
        assert_eq!(orders, vec![2, 3, 0, 1]);
    }

    #[test]
    fn straight_corridor_expands_only_the_path() {
        let grid = Grid::parse("S...G").unwrap();
        let result = search(Strategy::AStar, &grid);

        assert_eq!(result.path_len(), Some(5));
        assert_eq!(result.explored_count, 5);
    }

    #[test]
    fn matches_bfs_length_around_obstacles() {
        let grid = Grid::parse(
            "#########\n\
             #S..#...#\n\
             #.#.#.#.#\n\
             #.#...#.#\n\
             #.#####.#\n\
             #......G#\n\
             #########",
        )
        .unwrap();

        let a_star = search(Strategy::AStar, &grid);
        let bfs = search(Strategy::Bfs, &grid);
        assert_eq!(a_star.path_len(), bfs.path_len());
        assert!(a_star.explored_count <= bfs.explored_count);
    }

    #[test]
    fn unreachable_goal_finalizes_every_reachable_cell() {
        let grid = Grid::parse("S.#.\n..#G").unwrap();
        let result = search(Strategy::AStar, &grid);

        assert!(result.path.is_none());
        assert_eq!(result.explored_count, 4);
        assert_eq!(result.explored.len(), 4);
    }
}
