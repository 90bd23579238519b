//! Bitmap-backed obstacle set over the full grid

use bitvec::prelude::*;
use std::fmt;

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::{Cell, GridWorld};

/// Set of impassable playable cells
///
/// One bit per cell of the full grid gives O(1) membership tests, which the
/// solver performs several times per backup. Cells outside the grid are never
/// members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleSet {
    world: GridWorld,
    bits: BitVec,
}

impl ObstacleSet {
    /// Create an empty set sized for the given grid
    pub fn new(world: GridWorld) -> Self {
        Self {
            world,
            bits: bitvec![0; world.cell_count()],
        }
    }

    /// Build a set from a list of playable cells
    ///
    /// Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any cell lies outside the playable region
    pub fn from_cells(world: GridWorld, cells: impl IntoIterator<Item = Cell>) -> Result<Self> {
        let mut set = Self::new(world);
        for cell in cells {
            set.insert(cell)?;
        }
        Ok(set)
    }

    /// Grid this set is sized for
    pub const fn world(&self) -> GridWorld {
        self.world
    }

    /// Add an obstacle, returning whether it was newly inserted
    ///
    /// # Errors
    ///
    /// Returns an error if the cell lies outside the playable region
    pub fn insert(&mut self, cell: Cell) -> Result<bool> {
        if !self.world.is_playable(cell) {
            return Err(AlgorithmError::InvalidPlacement {
                cell,
                reason: "outside the playable region",
            });
        }

        let Some(index) = self.world.linear_index(cell) else {
            return Err(AlgorithmError::InvalidPlacement {
                cell,
                reason: "outside the grid",
            });
        };

        let inserted = !self.contains(cell);
        self.bits.set(index, true);
        Ok(inserted)
    }

    /// Test obstacle membership
    pub fn contains(&self, cell: Cell) -> bool {
        self.world
            .linear_index(cell)
            .is_some_and(|index| self.bits.get(index).as_deref() == Some(&true))
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test if no obstacles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Remove every obstacle
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Obstacle cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.bits
            .iter_ones()
            .filter_map(|index| self.world.cell_at(index))
    }
}

impl fmt::Display for ObstacleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObstacleSet({} cells:", self.len())?;
        for cell in self.iter() {
            write!(f, " {cell}")?;
        }
        f.write_str(")")
    }
}
