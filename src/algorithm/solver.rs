//! Synchronous value iteration over the grid MDP
//!
//! Each sweep backs up every decision state from the previous sweep's values,
//! so the result does not depend on the order cells are visited. Actions are
//! always tried in [`Action::ALL`] order and only a strictly larger expected
//! return replaces the incumbent, which makes tie-breaking reproducible.

use ndarray::Array2;
use tracing::{debug, trace};

use crate::algorithm::model::GridMdp;
use crate::io::configuration::{DEFAULT_DISCOUNT, DEFAULT_MAX_SWEEPS, DEFAULT_THRESHOLD};
use crate::io::error::{AlgorithmError, Result, computation_error, invalid_parameter};
use crate::math::probability::NoiseProfile;
use crate::spatial::grid::{Action, Cell, GridWorld};
use crate::spatial::obstacles::ObstacleSet;

/// Discounting, convergence and noise parameters for value iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    discount: f64,
    threshold: f64,
    noise: NoiseProfile,
    max_sweeps: usize,
}

impl SolverConfig {
    /// Create a validated configuration with the default sweep cap
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < discount < 1`, `threshold > 0` and
    /// `0 < main_probability <= 1`
    pub fn new(discount: f64, threshold: f64, main_probability: f64) -> Result<Self> {
        if discount.is_nan() || discount <= 0.0 || discount >= 1.0 {
            return Err(invalid_parameter(
                "discount",
                &discount,
                &"must lie in (0, 1)",
            ));
        }
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(invalid_parameter(
                "threshold",
                &threshold,
                &"must be greater than zero",
            ));
        }

        Ok(Self {
            discount,
            threshold,
            noise: NoiseProfile::new(main_probability)?,
            max_sweeps: DEFAULT_MAX_SWEEPS,
        })
    }

    /// Replace the sweep cap
    ///
    /// # Errors
    ///
    /// Returns an error if the cap is zero
    pub fn with_max_sweeps(self, max_sweeps: usize) -> Result<Self> {
        if max_sweeps == 0 {
            return Err(invalid_parameter(
                "max_sweeps",
                &max_sweeps,
                &"must be greater than zero",
            ));
        }
        Ok(Self { max_sweeps, ..self })
    }

    /// Discount factor γ
    pub const fn discount(&self) -> f64 {
        self.discount
    }

    /// Convergence threshold θ
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Transition noise of the modelled agent
    pub const fn noise(&self) -> NoiseProfile {
        self.noise
    }

    /// Sweeps allowed before reporting non-convergence
    pub const fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            threshold: DEFAULT_THRESHOLD,
            noise: NoiseProfile::default(),
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

/// Expected discounted return from every cell of the full grid
///
/// Goal cells hold exactly 0 and obstacle cells hold negative infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFunction {
    world: GridWorld,
    values: Array2<f64>,
}

impl ValueFunction {
    /// Starting estimate for a solve
    ///
    /// Decision states take the previous solve's value when one is given and
    /// finite there, otherwise 0.
    fn initial(world: GridWorld, obstacles: &ObstacleSet, warm_start: Option<&Self>) -> Self {
        let total = world.total_size();
        let mut values = Array2::zeros((total, total));

        for cell in world.cells() {
            let Some(slot) = world.index_of(cell).and_then(|index| values.get_mut(index)) else {
                continue;
            };
            *slot = if obstacles.contains(cell) {
                f64::NEG_INFINITY
            } else if world.is_goal(cell) {
                0.0
            } else {
                warm_start
                    .and_then(|previous| previous.get(cell))
                    .filter(|value| value.is_finite())
                    .unwrap_or(0.0)
            };
        }

        Self { world, values }
    }

    /// Value of a cell, if it is on the grid
    pub fn get(&self, cell: Cell) -> Option<f64> {
        self.world
            .index_of(cell)
            .and_then(|index| self.values.get(index))
            .copied()
    }

    /// Grid this value function covers
    pub const fn world(&self) -> GridWorld {
        self.world
    }

    /// Smallest and largest finite value
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((low, high)) => Some((low.min(value), high.max(value))),
            })
    }
}

/// Chosen action for every decision cell
///
/// Goal and obstacle cells carry no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    world: GridWorld,
    actions: Array2<Option<Action>>,
}

impl Policy {
    /// Create a policy with no actions assigned
    pub fn empty(world: GridWorld) -> Self {
        let total = world.total_size();
        Self {
            world,
            actions: Array2::from_elem((total, total), None),
        }
    }

    /// Grid this policy covers
    pub const fn world(&self) -> GridWorld {
        self.world
    }

    /// Action for a cell; `None` when unset or off the grid
    pub fn get(&self, cell: Cell) -> Option<Action> {
        self.world
            .index_of(cell)
            .and_then(|index| self.actions.get(index).copied().flatten())
    }

    /// Action for a cell that must lie on the grid
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::NoPolicyForCell`] if the cell is off the grid
    pub fn action(&self, cell: Cell) -> Result<Option<Action>> {
        self.world
            .index_of(cell)
            .and_then(|index| self.actions.get(index).copied())
            .ok_or(AlgorithmError::NoPolicyForCell {
                cell,
                grid_size: self.world.total_size(),
            })
    }

    /// Assign or clear the action for a cell
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::NoPolicyForCell`] if the cell is off the grid
    pub fn set(&mut self, cell: Cell, action: Option<Action>) -> Result<()> {
        let slot = self
            .world
            .index_of(cell)
            .and_then(|index| self.actions.get_mut(index))
            .ok_or(AlgorithmError::NoPolicyForCell {
                cell,
                grid_size: self.world.total_size(),
            })?;
        *slot = action;
        Ok(())
    }

    /// Number of cells with an action
    pub fn assigned_count(&self) -> usize {
        self.actions.iter().filter(|action| action.is_some()).count()
    }
}

/// Output of one value-iteration solve
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Converged value function
    pub values: ValueFunction,
    /// Greedy policy of the final sweep
    pub policy: Policy,
    /// Sweeps performed
    pub sweeps: usize,
    /// Largest value change in the final sweep
    pub residual: f64,
}

/// Value-iteration solver for one grid geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIteration {
    world: GridWorld,
    config: SolverConfig,
}

impl ValueIteration {
    /// Create a solver for the given grid and parameters
    pub const fn new(world: GridWorld, config: SolverConfig) -> Self {
        Self { world, config }
    }

    /// Grid geometry
    pub const fn world(&self) -> GridWorld {
        self.world
    }

    /// Solver parameters
    pub const fn config(&self) -> SolverConfig {
        self.config
    }

    /// Solve from scratch for the given obstacles
    ///
    /// # Errors
    ///
    /// Returns an error if the obstacle set belongs to a different grid or the
    /// sweep cap is exceeded
    pub fn compute_policy(&self, obstacles: &ObstacleSet) -> Result<Solution> {
        self.solve(obstacles, None)
    }

    /// Solve again after the obstacles changed, starting from earlier values
    ///
    /// Uses the same stopping rule as [`Self::compute_policy`], so both approach
    /// the same fixed point; a warm start usually needs fewer sweeps.
    ///
    /// # Errors
    ///
    /// Returns an error if the obstacle set belongs to a different grid or the
    /// sweep cap is exceeded
    pub fn resolve(&self, obstacles: &ObstacleSet, previous: &ValueFunction) -> Result<Solution> {
        let warm_start = (previous.world() == self.world).then_some(previous);
        self.solve(obstacles, warm_start)
    }

    fn solve(&self, obstacles: &ObstacleSet, warm_start: Option<&ValueFunction>) -> Result<Solution> {
        if obstacles.world() != self.world {
            return Err(invalid_parameter(
                "obstacles",
                &obstacles.world().total_size(),
                &format!(
                    "obstacle set is sized for a different grid (expected side {})",
                    self.world.total_size()
                ),
            ));
        }

        trace!(warm = warm_start.is_some(), obstacles = obstacles.len(), "starting value iteration");

        let mdp = GridMdp::new(self.world, obstacles, self.config.noise);
        let decision_cells: Vec<Cell> = self
            .world
            .playable_cells()
            .filter(|&cell| mdp.is_decision_state(cell))
            .collect();

        let mut values = ValueFunction::initial(self.world, obstacles, warm_start);
        let mut policy = Policy::empty(self.world);
        let mut residual = f64::INFINITY;

        for sweep in 1..=self.config.max_sweeps {
            let mut next = values.values.clone();
            residual = 0.0;

            for &cell in &decision_cells {
                let (action, best) = greedy_action(&mdp, cell, self.config.discount, &values);
                if !best.is_finite() {
                    return Err(computation_error(
                        "value iteration",
                        &format!("backup at {cell} produced {best}"),
                    ));
                }
                let previous = values.get(cell).unwrap_or(0.0);

                if let Some(index) = self.world.index_of(cell)
                    && let Some(slot) = next.get_mut(index)
                {
                    *slot = best;
                }
                policy.set(cell, Some(action))?;

                residual = residual.max((best - previous).abs());
            }

            values.values = next;
            trace!(sweep, residual, "value iteration sweep");

            if residual < self.config.threshold {
                debug!(sweeps = sweep, residual, "value iteration converged");
                return Ok(Solution {
                    values,
                    policy,
                    sweeps: sweep,
                    residual,
                });
            }
        }

        Err(AlgorithmError::NonConvergence {
            sweeps: self.config.max_sweeps,
            residual,
        })
    }
}

/// Best action and its expected return under the given values
///
/// Actions are tried in [`Action::ALL`] order; the first maximum wins.
pub fn greedy_action(
    mdp: &GridMdp<'_>,
    cell: Cell,
    discount: f64,
    values: &ValueFunction,
) -> (Action, f64) {
    let value_of = |other: Cell| values.get(other).unwrap_or(0.0);

    let mut best_action = Action::Up;
    let mut best_value = f64::NEG_INFINITY;
    for action in Action::ALL {
        let expected = mdp.expected_return(cell, action, discount, &value_of);
        if expected > best_value {
            best_action = action;
            best_value = expected;
        }
    }
    (best_action, best_value)
}
