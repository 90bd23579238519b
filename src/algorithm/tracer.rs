//! Deterministic greedy path tracing for diagnostics
//!
//! The tracer ignores all noise and follows the raw policy lookup. It stops on
//! the first goal cell, the first repeated cell, or the first cell without an
//! action, and never runs longer than the number of cells in the grid.

use bitvec::prelude::*;
use std::fmt;

use crate::algorithm::solver::Policy;
use crate::spatial::grid::{Action, Cell, GridWorld, next_cell};

/// Why a trace stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceOutcome {
    /// The final cell is in the goal band
    ReachedGoal,
    /// The final cell was already visited; the policy loops
    Cycle,
    /// The final cell has no policy action
    DeadEnd,
    /// The iteration cap was hit before any other stop condition
    Capped,
}

impl fmt::Display for TraceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReachedGoal => "reached goal",
            Self::Cycle => "cycle",
            Self::DeadEnd => "dead end",
            Self::Capped => "step cap",
        };
        f.write_str(label)
    }
}

/// Lazy walk along the policy from a start cell
///
/// Yields every visited cell including the one that ends the walk. Once the
/// iterator is exhausted, [`PathTrace::outcome`] reports why.
#[derive(Debug, Clone)]
pub struct PathTrace<'a> {
    policy: &'a Policy,
    world: GridWorld,
    current: Option<Cell>,
    visited: BitVec,
    emitted: usize,
    cap: usize,
    outcome: Option<TraceOutcome>,
}

impl<'a> PathTrace<'a> {
    /// Start a walk at `start`
    pub fn new(start: Cell, policy: &'a Policy) -> Self {
        let world = policy.world();
        Self {
            policy,
            world,
            current: Some(start),
            visited: bitvec![0; world.cell_count()],
            emitted: 0,
            cap: world.cell_count(),
            outcome: None,
        }
    }

    /// Stop condition, available once the walk has ended
    pub const fn outcome(&self) -> Option<TraceOutcome> {
        self.outcome
    }

    /// Mark a cell visited, returning whether it had been seen before
    fn revisit(&mut self, cell: Cell) -> bool {
        let Some(index) = self.world.linear_index(cell) else {
            return false;
        };
        let seen = self.visited.get(index).as_deref() == Some(&true);
        self.visited.set(index, true);
        seen
    }

    fn finish(&mut self, cell: Cell, outcome: TraceOutcome) -> Option<Cell> {
        self.outcome = Some(outcome);
        Some(cell)
    }
}

impl Iterator for PathTrace<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let cell = self.current.take()?;

        if self.emitted >= self.cap {
            self.outcome = Some(TraceOutcome::Capped);
            return None;
        }
        self.emitted += 1;

        if self.world.is_goal(cell) {
            return self.finish(cell, TraceOutcome::ReachedGoal);
        }
        if self.revisit(cell) {
            return self.finish(cell, TraceOutcome::Cycle);
        }

        match self.policy.get(cell) {
            Some(action) => {
                self.current = Some(next_cell(cell, action));
                Some(cell)
            }
            None => self.finish(cell, TraceOutcome::DeadEnd),
        }
    }
}

/// Walk the policy from `start`
pub fn trace_path(start: Cell, policy: &Policy) -> PathTrace<'_> {
    PathTrace::new(start, policy)
}

/// A fully collected walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Visited cells, starting with the start cell
    pub cells: Vec<Cell>,
    /// Why the walk stopped
    pub outcome: TraceOutcome,
}

impl Trace {
    /// Walk the policy from `start` and collect every cell
    pub fn follow(start: Cell, policy: &Policy) -> Self {
        let mut walk = trace_path(start, policy);
        let cells: Vec<Cell> = walk.by_ref().collect();
        Self {
            cells,
            outcome: walk.outcome().unwrap_or(TraceOutcome::Capped),
        }
    }

    /// Number of moves taken
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Final cell of the walk
    pub fn end(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Consecutive cell pairs with the move that joins them
    pub fn moves(&self) -> impl Iterator<Item = (Cell, Option<Action>, Cell)> + '_ {
        self.cells
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some((*from, Action::between(*from, *to), *to)),
                _ => None,
            })
    }
}
