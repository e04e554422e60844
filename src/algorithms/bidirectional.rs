use crate::algorithms::common::{reconstruct_path, ParentMap, Search, Step};
use crate::grid::{Grid, Position};
use log::debug;
use rustc_hash::FxHashSet;
use std::collections::hash_map::Entry;
use std::collections::VecDeque;

/// One half of the search: its own FIFO frontier and parent links.
struct Frontier {
    queue: VecDeque<Position>,
    parents: ParentMap,
}

impl Frontier {
    fn seeded(seed: Position) -> Self {
        let mut parents = ParentMap::default();
        parents.insert(seed, None);
        Frontier {
            queue: VecDeque::from([seed]),
            parents,
        }
    }
}

/// Breadth-first search grown from both ends at once.
///
/// The forward half starts at the start cell, the backward half at the goal.
/// Halves take strict turns processing one node each, forward first; once one
/// half runs dry the other keeps going alone. The search stops the moment a
/// half discovers a node the other half has already reached.
pub struct Bidirectional<'g> {
    grid: &'g Grid,
    forward: Frontier,
    backward: Frontier,
    forward_turn: bool,
    explored: FxHashSet<Position>,
    explored_count: usize,
    meeting: Option<Position>,
    reported: bool,
}

impl<'g> Bidirectional<'g> {
    pub fn new(grid: &'g Grid, start: Position, goal: Position) -> Self {
        Bidirectional {
            grid,
            forward: Frontier::seeded(start),
            backward: Frontier::seeded(goal),
            forward_turn: true,
            explored: FxHashSet::default(),
            explored_count: 0,
            meeting: None,
            reported: false,
        }
    }

    /// Node where the two halves met, once they have.
    pub fn meeting_point(&self) -> Option<Position> {
        self.meeting
    }

    /// Start-to-meeting chain from the forward half.
    pub fn forward_chain(&self, node: Position) -> Vec<Position> {
        reconstruct_path(&self.forward.parents, node)
    }

    /// Meeting-to-goal chain from the backward half, `node` included.
    pub fn backward_chain(&self, node: Position) -> Vec<Position> {
        let mut chain = reconstruct_path(&self.backward.parents, node);
        chain.reverse();
        chain
    }

    fn assemble(&self, meeting: Position) -> Vec<Position> {
        let mut path = self.forward_chain(meeting);
        path.extend(self.backward_chain(meeting).into_iter().skip(1));
        path
    }
}

impl Search for Bidirectional<'_> {
    fn advance(&mut self) -> Step {
        if let Some(meeting) = self.meeting {
            if !self.reported {
                debug!("frontiers met at {}", meeting);
                self.reported = true;
            }
            return Step::Found {
                node: meeting,
                path: self.assemble(meeting),
            };
        }

        let use_forward = match (self.forward.queue.is_empty(), self.backward.queue.is_empty()) {
            (true, true) => return Step::Exhausted,
            (false, true) => true,
            (true, false) => false,
            (false, false) => self.forward_turn,
        };
        self.forward_turn = !use_forward;

        let (this, other) = if use_forward {
            (&mut self.forward, &self.backward)
        } else {
            (&mut self.backward, &self.forward)
        };

        let Some(current) = this.queue.pop_front() else {
            return Step::Exhausted;
        };
        self.explored_count += 1;
        self.explored.insert(current);

        for neighbor in self.grid.neighbors(current) {
            if let Entry::Vacant(slot) = this.parents.entry(neighbor) {
                slot.insert(Some(current));
                this.queue.push_back(neighbor);
                if other.parents.contains_key(&neighbor) {
                    self.meeting = Some(neighbor);
                    break;
                }
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

    /// Known chain through `node`: from the start when the forward half has
    /// reached it, otherwise from `node` on to the goal.
    fn trace(&self, node: Position) -> Vec<Position> {
        match self.meeting {
            Some(meeting) if meeting == node => self.assemble(meeting),
            _ if self.forward.parents.contains_key(&node) => self.forward_chain(node),
            _ => self.backward_chain(node),
        }
    }

    fn take_explored(&mut self) -> FxHashSet<Position> {
        std::mem::take(&mut self.explored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::manhattan;

    fn run(search: &mut Bidirectional<'_>) -> Option<Vec<Position>> {
        loop {
            match search.advance() {
                Step::Expanded(_) => continue,
                Step::Found { path, .. } => return Some(path),
                Step::Exhausted => return None,
            }
        }
    }

    #[test]
    fn halves_alternate_starting_forward() {
        let grid = Grid::parse("S.....G").unwrap();
        let start = Position::new(0, 0);
        let goal = Position::new(0, 6);
        let mut search = Bidirectional::new(&grid, start, goal);

        assert_eq!(search.advance(), Step::Expanded(start));
        assert_eq!(search.advance(), Step::Expanded(goal));
        assert_eq!(search.advance(), Step::Expanded(Position::new(0, 1)));
        assert_eq!(search.advance(), Step::Expanded(Position::new(0, 5)));
    }

    #[test]
    fn joins_both_chains_at_meeting_point() {
        let grid = Grid::parse("S.....G").unwrap();
        let start = Position::new(0, 0);
        let goal = Position::new(0, 6);
        let mut search = Bidirectional::new(&grid, start, goal);

        let path = run(&mut search).unwrap();
        let meeting = search.meeting_point().unwrap();

        assert_eq!(path.len(), 7);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.iter().filter(|&&p| p == meeting).count(), 1);
        assert_eq!(search.forward_chain(meeting).last(), Some(&meeting));
        assert_eq!(search.backward_chain(meeting).first(), Some(&meeting));
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn adjacent_endpoints_meet_at_goal() {
        let grid = Grid::parse("SG").unwrap();
        let mut search = Bidirectional::new(&grid, Position::new(0, 0), Position::new(0, 1));

        let path = run(&mut search).unwrap();
        assert_eq!(path, vec![Position::new(0, 0), Position::new(0, 1)]);
        assert_eq!(search.meeting_point(), Some(Position::new(0, 1)));
        assert_eq!(search.explored_count(), 1);
    }

    #[test]
    fn both_halves_drain_before_giving_up() {
        let grid = Grid::parse("S..#.G").unwrap();
        let mut search = Bidirectional::new(&grid, Position::new(0, 0), Position::new(0, 5));

        assert!(run(&mut search).is_none());
        assert_eq!(search.explored_count(), 5);
        assert!(search.meeting_point().is_none());
    }
}
