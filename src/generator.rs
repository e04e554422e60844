//! Maze generators. All of them wall off the border and place the start in
//! the top-left interior corner.

use crate::grid::{Cell, Grid, GridError, Position};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Smallest side length any generator accepts.
pub const MIN_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Independent random walls at a given density.
    Random,
    /// A perfect maze carved by depth-first backtracking.
    Backtracking,
    /// Border walls only.
    Empty,
}

impl GeneratorKind {
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Random => "random",
            GeneratorKind::Backtracking => "backtracking",
            GeneratorKind::Empty => "empty",
        }
    }

    pub fn generate<R: Rng>(
        self,
        rows: usize,
        cols: usize,
        wall_density: f64,
        rng: &mut R,
    ) -> Result<Grid, GridError> {
        match self {
            GeneratorKind::Random => random_fill(rows, cols, wall_density, rng),
            GeneratorKind::Backtracking => recursive_backtracking(rows, cols, rng),
            GeneratorKind::Empty => empty(rows, cols),
        }
    }
}

fn check_size(rows: usize, cols: usize) -> Result<(), GridError> {
    if rows < MIN_SIZE || cols < MIN_SIZE {
        return Err(GridError::TooSmall {
            rows,
            cols,
            min: MIN_SIZE,
        });
    }
    Ok(())
}

fn walled(rows: usize, cols: usize) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for row in 0..rows {
        grid.set_cell(Position::new(row, 0), Cell::Wall);
        grid.set_cell(Position::new(row, cols - 1), Cell::Wall);
    }
    for col in 0..cols {
        grid.set_cell(Position::new(0, col), Cell::Wall);
        grid.set_cell(Position::new(rows - 1, col), Cell::Wall);
    }
    grid
}

/// Border walls, then every interior cell becomes a wall with probability
/// `wall_density`. Start sits at (1,1) and goal at the opposite interior
/// corner; nothing guarantees a path between them.
pub fn random_fill<R: Rng>(
    rows: usize,
    cols: usize,
    wall_density: f64,
    rng: &mut R,
) -> Result<Grid, GridError> {
    check_size(rows, cols)?;
    let density = wall_density.clamp(0.0, 1.0);

    let mut grid = walled(rows, cols);
    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            if rng.gen_bool(density) {
                grid.set_cell(Position::new(row, col), Cell::Wall);
            }
        }
    }
    grid.set_cell(Position::new(1, 1), Cell::Start);
    grid.set_cell(Position::new(rows - 2, cols - 2), Cell::Goal);

    debug!("random maze {}x{} at density {:.2}", rows, cols, density);
    Ok(grid)
}

/// Carves a perfect maze (exactly one route between any two open cells).
///
/// Even dimensions grow by one so passages land on odd coordinates. Carving
/// starts at (1,1) and jumps two cells at a time in shuffled order, knocking
/// out the wall in between. The goal goes on the last open cell found
/// scanning backwards from the bottom-right interior corner.
pub fn recursive_backtracking<R: Rng>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Grid, GridError> {
    check_size(rows, cols)?;
    let rows = rows | 1;
    let cols = cols | 1;

    let mut grid = Grid::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            grid.set_cell(Position::new(row, col), Cell::Wall);
        }
    }

    let shuffled = |rng: &mut R| {
        let mut dirs: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];
        dirs.shuffle(rng);
        dirs
    };

    let origin = Position::new(1, 1);
    grid.set_cell(origin, Cell::Open);
    // each frame: cell, its shuffled directions, next direction to try
    let mut stack = vec![(origin, shuffled(rng), 0usize)];

    while let Some(frame) = stack.last_mut() {
        let (pos, dirs, next) = *frame;
        if next == dirs.len() {
            stack.pop();
            continue;
        }
        frame.2 += 1;

        let (dr, dc) = dirs[next];
        let nr = pos.row as isize + dr;
        let nc = pos.col as isize + dc;
        if nr < 1 || nc < 1 || nr as usize >= rows - 1 || nc as usize >= cols - 1 {
            continue;
        }
        let target = Position::new(nr as usize, nc as usize);
        if grid.cell(target) != Some(Cell::Wall) {
            continue;
        }

        let between = Position::new(
            (pos.row as isize + dr / 2) as usize,
            (pos.col as isize + dc / 2) as usize,
        );
        grid.set_cell(between, Cell::Open);
        grid.set_cell(target, Cell::Open);
        stack.push((target, shuffled(rng), 0));
    }

    grid.set_cell(origin, Cell::Start);
    let goal = (1..rows - 1)
        .rev()
        .flat_map(|row| (1..cols - 1).rev().map(move |col| Position::new(row, col)))
        .find(|&pos| grid.cell(pos) == Some(Cell::Open));
    if let Some(goal) = goal {
        grid.set_cell(goal, Cell::Goal);
    }

    debug!("backtracking maze {}x{}, goal {:?}", rows, cols, goal);
    Ok(grid)
}

/// Border walls only, start at (1,1), goal at the opposite interior corner.
/// Meant as a blank canvas for editing.
pub fn empty(rows: usize, cols: usize) -> Result<Grid, GridError> {
    check_size(rows, cols)?;
    let mut grid = walled(rows, cols);
    grid.set_cell(Position::new(1, 1), Cell::Start);
    grid.set_cell(Position::new(rows - 2, cols - 2), Cell::Goal);
    Ok(grid)
}
