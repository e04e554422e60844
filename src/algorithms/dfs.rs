use crate::algorithms::common::{reconstruct_path, ParentMap, Search, Step};
use crate::grid::{manhattan, Grid, Position};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::hash_map::Entry;

/// Depth-first search over a LIFO frontier.
///
/// With `ordered` set, the unvisited neighbours of each node are pushed
/// furthest-from-goal first so the closest one is popped next. That greedy
/// bias usually shrinks the explored area but offers no shortest-path
/// guarantee, same as the plain variant.
pub struct DepthFirst<'g> {
    grid: &'g Grid,
    goal: Position,
    ordered: bool,
    stack: Vec<Position>,
    parents: ParentMap,
    explored: FxHashSet<Position>,
    explored_count: usize,
    reached: bool,
}

impl<'g> DepthFirst<'g> {
    pub fn new(grid: &'g Grid, start: Position, goal: Position) -> Self {
        Self::with_ordering(grid, start, goal, false)
    }

    /// The goal-biased variant.
    pub fn ordered(grid: &'g Grid, start: Position, goal: Position) -> Self {
        Self::with_ordering(grid, start, goal, true)
    }

    fn with_ordering(grid: &'g Grid, start: Position, goal: Position, ordered: bool) -> Self {
        let mut parents = ParentMap::default();
        parents.insert(start, None);

        DepthFirst {
            grid,
            goal,
            ordered,
            stack: vec![start],
            parents,
            explored: FxHashSet::default(),
            explored_count: 0,
            reached: false,
        }
    }
}

impl Search for DepthFirst<'_> {
    fn advance(&mut self) -> Step {
        if self.reached {
            return Step::Found {
                node: self.goal,
                path: reconstruct_path(&self.parents, self.goal),
            };
        }

        let Some(current) = self.stack.pop() else {
            return Step::Exhausted;
        };
        self.explored_count += 1;
        self.explored.insert(current);

        if current == self.goal {
            self.reached = true;
            return Step::Expanded(current);
        }

        let mut neighbors = self.grid.neighbors(current);
        if self.ordered {
            // stable: equal distances keep the grid's neighbour order
            let goal = self.goal;
            neighbors.sort_by_key(|&p| Reverse(manhattan(p, goal)));
        }

        for neighbor in neighbors {
            if let Entry::Vacant(slot) = self.parents.entry(neighbor) {
                slot.insert(Some(current));
                self.stack.push(neighbor);
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

    fn expansion_order(mut search: DepthFirst<'_>) -> Vec<Position> {
        let mut order = Vec::new();
        while let Step::Expanded(node) = search.advance() {
            order.push(node);
        }
        order
    }

    #[test]
    fn last_pushed_neighbor_is_expanded_first() {
        let grid = Grid::parse("...\n.S.\n...").unwrap();
        let start = Position::new(1, 1);
        let order = expansion_order(DepthFirst::new(&grid, start, Position::new(2, 2)));

        // N, S, W, E are pushed in that order, so east comes off first
        assert_eq!(order[0], start);
        assert_eq!(order[1], Position::new(1, 2));
    }

    #[test]
    fn ordered_variant_heads_for_the_goal() {
        let grid = Grid::parse(".....\n..S..\n.....\n.....\n....G").unwrap();
        let start = Position::new(1, 2);
        let goal = Position::new(4, 4);

        let plain = expansion_order(DepthFirst::new(&grid, start, goal));
        let ordered = expansion_order(DepthFirst::ordered(&grid, start, goal));

        // south and east tie on distance; east was enumerated last and wins
        assert_eq!(ordered[1], Position::new(1, 3));
        assert_eq!(ordered.last(), Some(&goal));
        assert!(ordered.len() <= plain.len());
    }

    #[test]
    fn path_is_valid_even_if_long() {
        let grid = Grid::parse("S...\n....\n...G").unwrap();
        let mut dfs = DepthFirst::new(&grid, Position::new(0, 0), Position::new(2, 3));
        let path = loop {
            match dfs.advance() {
                Step::Expanded(_) => continue,
                Step::Found { path, .. } => break path,
                Step::Exhausted => panic!("goal is reachable"),
            }
        };

        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(2, 3)));
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1);
        }
    }
}
