//! Bordered square grid with cells, moves and region classification
//!
//! The full grid is `playable_size + 2 * border_width` cells on a side. The
//! border band is the goal region: entering it ends the episode. The inner
//! square is where the agent starts and where obstacles may be placed.

use std::fmt;

use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::obstacles::ObstacleSet;

/// A grid location as (row, column)
///
/// Coordinates are signed so that a move off the edge of the grid produces a
/// representable cell that can be classified rather than wrapped or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Row index, growing downwards
    pub row: i32,
    /// Column index, growing rightwards
    pub col: i32,
}

impl Cell {
    /// Create a cell from its row and column
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Number of moves between two cells ignoring obstacles
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four compass moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Action {
    /// Every action in the fixed order used for tie-breaking and fallback search
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Row and column delta applied by this action
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Single-character arrow used in text renderings
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }

    /// The single move that leads from one cell to an adjacent one
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|&action| next_cell(from, action) == to)
    }

    /// The remaining three actions, in fixed order
    pub fn others(self) -> [Self; 3] {
        let mut others = [self; 3];
        for (slot, action) in others
            .iter_mut()
            .zip(Self::ALL.into_iter().filter(|&action| action != self))
        {
            *slot = action;
        }
        others
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        };
        f.write_str(name)
    }
}

/// Apply an action's delta to a cell
///
/// No bounds check is made; classify the result with [`GridWorld`].
pub const fn next_cell(cell: Cell, action: Action) -> Cell {
    let (d_row, d_col) = action.delta();
    Cell::new(cell.row + d_row, cell.col + d_col)
}

/// Dimensions of a bordered square grid
///
/// Cheap to copy; every region query is O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWorld {
    playable_size: usize,
    border_width: usize,
}

impl GridWorld {
    /// Create a grid with the given playable side length and goal band width
    ///
    /// # Errors
    ///
    /// Returns an error if the playable size is zero or the full grid would
    /// exceed [`MAX_GRID_DIMENSION`]
    pub fn new(playable_size: usize, border_width: usize) -> Result<Self> {
        if playable_size == 0 {
            return Err(invalid_parameter(
                "playable_size",
                &playable_size,
                &"must be greater than zero",
            ));
        }

        let fits = border_width
            .checked_mul(2)
            .and_then(|band| band.checked_add(playable_size))
            .is_some_and(|total| total <= MAX_GRID_DIMENSION);
        if !fits {
            return Err(invalid_parameter(
                "border_width",
                &border_width,
                &format!("full grid side must not exceed {MAX_GRID_DIMENSION}"),
            ));
        }

        Ok(Self {
            playable_size,
            border_width,
        })
    }

    /// Side length of the inner playable square
    pub const fn playable_size(&self) -> usize {
        self.playable_size
    }

    /// Width of the goal band
    pub const fn border_width(&self) -> usize {
        self.border_width
    }

    /// Side length of the full grid including the goal band
    pub const fn total_size(&self) -> usize {
        self.playable_size + 2 * self.border_width
    }

    /// Number of cells in the full grid
    pub const fn cell_count(&self) -> usize {
        self.total_size() * self.total_size()
    }

    /// Centre of the playable square, where every episode starts
    pub const fn start_cell(&self) -> Cell {
        let centre = (self.border_width + self.playable_size / 2) as i32;
        Cell::new(centre, centre)
    }

    /// Whether the cell lies anywhere on the full grid
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        let total = self.total_size() as i32;
        cell.row >= 0 && cell.row < total && cell.col >= 0 && cell.col < total
    }

    /// Whether the cell lies in the inner playable square
    pub const fn is_playable(&self, cell: Cell) -> bool {
        let low = self.border_width as i32;
        let high = low + self.playable_size as i32;
        cell.row >= low && cell.row < high && cell.col >= low && cell.col < high
    }

    /// Whether the cell lies in the goal band
    pub const fn is_goal(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_playable(cell)
    }

    /// Whether the agent may stand on the cell
    pub fn is_legal(&self, cell: Cell, obstacles: &ObstacleSet) -> bool {
        self.is_playable(cell) && !obstacles.contains(cell)
    }

    /// Array index of the cell, if it is on the grid
    pub const fn index_of(&self, cell: Cell) -> Option<[usize; 2]> {
        if self.in_bounds(cell) {
            Some([cell.row as usize, cell.col as usize])
        } else {
            None
        }
    }

    /// Row-major position of the cell, if it is on the grid
    pub const fn linear_index(&self, cell: Cell) -> Option<usize> {
        match self.index_of(cell) {
            Some([row, col]) => Some(row * self.total_size() + col),
            None => None,
        }
    }

    /// Cell at a row-major position
    pub const fn cell_at(&self, index: usize) -> Option<Cell> {
        if index < self.cell_count() {
            let total = self.total_size();
            Some(Cell::new((index / total) as i32, (index % total) as i32))
        } else {
            None
        }
    }

    /// Every cell of the full grid in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let total = self.total_size() as i32;
        (0..total).flat_map(move |row| (0..total).map(move |col| Cell::new(row, col)))
    }

    /// Every playable cell in row-major order
    pub fn playable_cells(&self) -> impl Iterator<Item = Cell> {
        let world = *self;
        self.cells().filter(move |&cell| world.is_playable(cell))
    }
}
