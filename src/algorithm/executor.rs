//! Execution of validated actions and the planner entry points
//!
//! Execution adds its own exploration noise on top of the validated action:
//! with the main probability the validated action is taken, otherwise one of
//! the other three is drawn uniformly. This is independent of the noise model
//! the solver plans against.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::algorithm::solver::{Policy, Solution, SolverConfig, ValueIteration};
use crate::algorithm::tracer::{PathTrace, trace_path};
use crate::algorithm::validator::validate;
use crate::io::error::Result;
use crate::math::probability::{NoiseProfile, weighted_choice};
use crate::spatial::grid::{Action, Cell, GridWorld, next_cell};
use crate::spatial::obstacles::ObstacleSet;

/// What happened during one execution step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The policy holds no action for the cell; nothing was attempted
    NoPolicy,
    /// Validation found no safe move; the agent is trapped
    NoSafeMove,
    /// An action was executed
    Executed {
        /// Action after validation
        validated: Action,
        /// Action actually executed
        taken: Action,
        /// Whether `taken` came from the exploration branch
        explored: bool,
        /// Whether the destination could be entered; if not the agent stayed
        moved: bool,
    },
}

/// Result of one execution step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Cell the agent started from
    pub from: Cell,
    /// Cell the agent ends on
    pub to: Cell,
    /// How the destination was chosen
    pub kind: StepKind,
}

/// Samples actual moves from validated policy actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Executor {
    world: GridWorld,
    exploration: NoiseProfile,
}

impl Executor {
    /// Create an executor; `exploration` gives the chance of taking the validated action
    pub const fn new(world: GridWorld, exploration: NoiseProfile) -> Self {
        Self { world, exploration }
    }

    /// Exploration profile
    pub const fn exploration(&self) -> NoiseProfile {
        self.exploration
    }

    /// Take one step from `cell` using the injected random source
    ///
    /// # Errors
    ///
    /// Returns an error if `cell` lies outside the grid the policy covers
    pub fn step<R: Rng + ?Sized>(
        &self,
        cell: Cell,
        policy: &Policy,
        obstacles: &ObstacleSet,
        rng: &mut R,
    ) -> Result<Step> {
        let stay = |kind| Step {
            from: cell,
            to: cell,
            kind,
        };

        let Some(proposed) = policy.action(cell)? else {
            return Ok(stay(StepKind::NoPolicy));
        };
        let Some(validated) = validate(&self.world, cell, proposed, obstacles) else {
            return Ok(stay(StepKind::NoSafeMove));
        };

        let alternatives = validated.others();
        let choice = weighted_choice(rng, &self.exploration.sampling_weights());
        let (taken, explored) = match choice.checked_sub(1).and_then(|i| alternatives.get(i)) {
            Some(&alternative) => (alternative, true),
            None => (validated, false),
        };

        let target = next_cell(cell, taken);
        let moved = self.world.is_legal(target, obstacles) || self.world.is_goal(target);
        if explored {
            debug!(%cell, %validated, %taken, moved, "exploration branch");
        }

        Ok(Step {
            from: cell,
            to: if moved { target } else { cell },
            kind: StepKind::Executed {
                validated,
                taken,
                explored,
                moved,
            },
        })
    }

    /// Take one step with a random source seeded from `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if `current` lies outside the grid the policy covers
    pub fn choose_next_cell(
        &self,
        current: Cell,
        policy: &Policy,
        obstacles: &ObstacleSet,
        seed: u64,
    ) -> Result<Cell> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.step(current, policy, obstacles, &mut rng)
            .map(|step| step.to)
    }
}

/// Solver, executor and tracer behind the four planner entry points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapePlanner {
    solver: ValueIteration,
    executor: Executor,
}

impl EscapePlanner {
    /// Create a planner from validated parts
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < exploration_probability <= 1`
    pub fn new(
        world: GridWorld,
        solver_config: SolverConfig,
        exploration_probability: f64,
    ) -> Result<Self> {
        Ok(Self {
            solver: ValueIteration::new(world, solver_config),
            executor: Executor::new(world, NoiseProfile::new(exploration_probability)?),
        })
    }

    /// Grid geometry
    pub const fn world(&self) -> GridWorld {
        self.solver.world()
    }

    /// Underlying value-iteration solver
    pub const fn solver(&self) -> &ValueIteration {
        &self.solver
    }

    /// Underlying executor
    pub const fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Full solve, returning values as well as the policy
    ///
    /// # Errors
    ///
    /// Returns an error if the solve does not converge
    pub fn solve(&self, obstacles: &ObstacleSet) -> Result<Solution> {
        self.solver.compute_policy(obstacles)
    }

    /// Full solve, returning only the policy
    ///
    /// # Errors
    ///
    /// Returns an error if the solve does not converge
    pub fn compute_policy(&self, obstacles: &ObstacleSet) -> Result<Policy> {
        self.solve(obstacles).map(|solution| solution.policy)
    }

    /// One execution step with a seeded random source
    ///
    /// # Errors
    ///
    /// Returns an error if `current` lies outside the grid
    pub fn choose_next_cell(
        &self,
        current: Cell,
        policy: &Policy,
        obstacles: &ObstacleSet,
        seed: u64,
    ) -> Result<Cell> {
        self.executor
            .choose_next_cell(current, policy, obstacles, seed)
    }

    /// Deterministic greedy walk from `start`
    pub fn trace_path<'a>(&self, start: Cell, policy: &'a Policy) -> PathTrace<'a> {
        trace_path(start, policy)
    }
}
