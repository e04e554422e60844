use log::debug;
use rustc_hash::FxHashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Manhattan distance between two positions.
pub fn manhattan(a: Position, b: Position) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Open,
    Start,
    Goal,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Open),
            'S' => Some(Cell::Start),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Open => '.',
            Cell::Start => 'S',
            Cell::Goal => 'G',
        }
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("maze text is empty")]
    Empty,

    #[error("line {line} has {found} cells, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell {found:?} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, found: char },

    #[error("second start cell at {second}, first at {first}")]
    DuplicateStart { first: Position, second: Position },

    #[error("second goal cell at {second}, first at {first}")]
    DuplicateGoal { first: Position, second: Position },

    #[error("maze of {rows}x{cols} is too small, need at least {min}x{min}")]
    TooSmall { rows: usize, cols: usize, min: usize },

    #[error("failed to access maze file: {0}")]
    Io(#[from] std::io::Error),
}

/// Which extra markers `Grid::render` draws over the terrain.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overlay<'a> {
    pub explored: Option<&'a FxHashSet<Position>>,
    pub path: Option<&'a [Position]>,
    pub current: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Option<Position>,
    goal: Option<Position>,
}

impl Grid {
    /// An all-open grid without start or goal.
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            cells: vec![Cell::Open; rows * cols],
            start: None,
            goal: None,
        }
    }

    /// Builds a grid from text where `#` is a wall, `.` open floor, `S` the
    /// start and `G` the goal.
    ///
    /// A single trailing newline and `\r\n` line endings are accepted, so files
    /// written by ordinary editors load as expected.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return Err(GridError::Empty);
        }

        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let rows = lines.len();
        let cols = lines[0].chars().count();
        if cols == 0 {
            return Err(GridError::Empty);
        }

        let mut grid = Grid::new(rows, cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::Ragged {
                    line: row,
                    expected: cols,
                    found,
                });
            }

            for (col, c) in line.chars().enumerate() {
                let pos = Position { row, col };
                let cell = Cell::from_char(c).ok_or(GridError::UnknownCell { row, col, found: c })?;
                match cell {
                    Cell::Start => {
                        if let Some(first) = grid.start {
                            return Err(GridError::DuplicateStart { first, second: pos });
                        }
                        grid.start = Some(pos);
                    }
                    Cell::Goal => {
                        if let Some(first) = grid.goal {
                            return Err(GridError::DuplicateGoal { first, second: pos });
                        }
                        grid.goal = Some(pos);
                    }
                    Cell::Wall | Cell::Open => {}
                }
                grid.cells[row * cols + col] = cell;
            }
        }

        debug!(
            "parsed {}x{} maze, start {:?}, goal {:?}",
            rows, cols, grid.start, grid.goal
        );
        Ok(grid)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let text = fs::read_to_string(path)?;
        Grid::parse(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GridError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Serialises the grid back into its text form, rows joined by `\n` with
    /// no trailing newline.
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    /// Both endpoints, or `None` when either is missing.
    pub fn endpoints(&self) -> Option<(Position, Position)> {
        Some((self.start?, self.goal?))
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    pub fn is_open(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(cell) if cell != Cell::Wall)
    }

    /// Overwrites one cell.
    ///
    /// Placing a start or goal demotes the previous one to open floor, so the
    /// grid never holds two of either. Overwriting the current start or goal
    /// with anything else clears it. Out-of-bounds positions are ignored.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        if !self.in_bounds(pos) {
            return;
        }

        if self.start == Some(pos) {
            self.start = None;
        }
        if self.goal == Some(pos) {
            self.goal = None;
        }

        match cell {
            Cell::Start => {
                if let Some(old) = self.start.replace(pos) {
                    self.cells[old.row * self.cols + old.col] = Cell::Open;
                }
            }
            Cell::Goal => {
                if let Some(old) = self.goal.replace(pos) {
                    self.cells[old.row * self.cols + old.col] = Cell::Open;
                }
            }
            Cell::Wall | Cell::Open => {}
        }
        self.cells[pos.row * self.cols + pos.col] = cell;
    }

    /// Traversable cardinal neighbours, always in north, south, west, east
    /// order.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(4);
        let (row, col) = (pos.row as isize, pos.col as isize);

        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let nr = row + dr;
            let nc = col + dc;
            if nr < 0 || nc < 0 {
                continue;
            }
            let next_pos = Position {
                row: nr as usize,
                col: nc as usize,
            };
            if self.is_open(next_pos) {
                neighbors.push(next_pos);
            }
        }
        neighbors
    }

    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Wall).count()
    }

    /// Draws the grid for a terminal, marking the current node `@`, path cells
    /// `*` and explored cells `o`. Start and goal are always shown as `S`/`G`.
    pub fn render(&self, overlay: Overlay<'_>) -> String {
        let on_path: FxHashSet<Position> = overlay
            .path
            .map(|path| path.iter().copied().collect())
            .unwrap_or_default();

        let mut out = String::with_capacity(self.rows * (self.cols * 2 + 1));
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position { row, col };
                let cell = self.cells[row * self.cols + col];
                let c = match cell {
                    Cell::Start | Cell::Goal | Cell::Wall => cell.to_char(),
                    Cell::Open if overlay.current == Some(pos) => '@',
                    Cell::Open if on_path.contains(&pos) => '*',
                    Cell::Open if overlay.explored.is_some_and(|e| e.contains(&pos)) => 'o',
                    Cell::Open => '.',
                };
                out.push(c);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::parse(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
