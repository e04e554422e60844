use crate::algorithms::common::{reconstruct_path, ParentMap, Search, Step};
use crate::grid::{Grid, Position};
use rustc_hash::FxHashSet;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;

/// Breadth-first search over a FIFO frontier.
///
/// Nodes are marked when enqueued, so each is queued at most once and the
/// first path to reach the goal is a shortest one by edge count.
pub struct BreadthFirst<'g> {
    grid: &'g Grid,
    goal: Position,
    queue: VecDeque<Position>,
    parents: ParentMap,
    explored: FxHashSet<Position>,
    explored_count: usize,
    reached: bool,
}

impl<'g> BreadthFirst<'g> {
    pub fn new(grid: &'g Grid, start: Position, goal: Position) -> Self {
        let mut parents = ParentMap::default();
        parents.insert(start, None);

        BreadthFirst {
            grid,
            goal,
            queue: VecDeque::from([start]),
            parents,
            explored: FxHashSet::default(),
            explored_count: 0,
            reached: false,
        }
    }
}

impl Search for BreadthFirst<'_> {
    fn advance(&mut self) -> Step {
        if self.reached {
            return Step::Found {
                node: self.goal,
                path: reconstruct_path(&self.parents, self.goal),
            };
        }

        let Some(current) = self.queue.pop_front() else {
            return Step::Exhausted;
        };
        self.explored_count += 1;
        self.explored.insert(current);

        if current == self.goal {
            self.reached = true;
            return Step::Expanded(current);
        }

        for neighbor in self.grid.neighbors(current) {
            if let Entry::Vacant(slot) = self.parents.entry(neighbor) {
                slot.insert(Some(current));
                self.queue.push_back(neighbor);
            }
        }
        Step::Expanded(current)
    }

    fn explored(&self) -> &FxHashSet<Position> {
        &self.explored
    }

    fn explored_count(&self) -> usize {
        self.explored_count
    }

    fn trace(&self, node: Position) -> Vec<Position> {
        reconstruct_path(&self.parents, node)
    }

    fn take_explored(&mut self) -> FxHashSet<Position> {
        std::mem::take(&mut self.explored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{search, Strategy};

    #[test]
    fn finds_shortest_path_in_small_maze() {
        let grid = Grid::parse("S.#\n..#\n#.G").unwrap();
        let result = search(Strategy::Bfs, &grid);

        assert_eq!(
            result.path,
            Some(vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 2),
            ])
        );
        assert_eq!(result.explored_count, 6);
        assert!(result.explored_count <= 9);
    }

    #[test]
    fn steps_then_reports_found() {
        let grid = Grid::parse("SG").unwrap();
        let mut bfs = BreadthFirst::new(&grid, Position::new(0, 0), Position::new(0, 1));

        assert_eq!(bfs.advance(), Step::Expanded(Position::new(0, 0)));
        assert_eq!(bfs.advance(), Step::Expanded(Position::new(0, 1)));
        let found = Step::Found {
            node: Position::new(0, 1),
            path: vec![Position::new(0, 0), Position::new(0, 1)],
        };
        assert_eq!(bfs.advance(), found);
        assert_eq!(bfs.advance(), found);
        assert_eq!(bfs.explored_count(), 2);
    }

    #[test]
    fn exhausts_when_walled_off() {
        let grid = Grid::parse("S.#G").unwrap();
        let mut bfs = BreadthFirst::new(&grid, Position::new(0, 0), Position::new(0, 3));

        let mut expanded = 0;
        while !bfs.advance().is_terminal() {
            expanded += 1;
        }
        assert_eq!(expanded, 2);
        assert_eq!(bfs.advance(), Step::Exhausted);
    }
}
