//! Headless game session driving the planner turn by turn
//!
//! Each turn an obstacle is placed, the policy is re-solved (warm-started from
//! the previous values) and the agent takes one execution step. The episode
//! ends when the agent reaches the goal band or has no safe move left.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::VecDeque;
use std::fmt;
use tracing::{info, warn};

use crate::algorithm::executor::{EscapePlanner, Step};
use crate::algorithm::solver::{Policy, Solution, ValueFunction};
use crate::algorithm::tracer::Trace;
use crate::algorithm::validator::is_trapped;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::{Cell, GridWorld};
use crate::spatial::obstacles::ObstacleSet;

/// State of an episode after the latest turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeStatus {
    /// The agent can still move
    Ongoing,
    /// The agent reached the goal band
    Escaped,
    /// Every move out of the agent's cell is blocked
    Trapped,
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ongoing => "ongoing",
            Self::Escaped => "escaped",
            Self::Trapped => "trapped",
        };
        f.write_str(label)
    }
}

/// One obstacle placement and the move that followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// 1-based turn number
    pub number: usize,
    /// Cell that became an obstacle
    pub obstacle: Cell,
    /// Execution step taken after re-planning
    pub step: Step,
    /// Sweeps the re-solve needed
    pub sweeps: usize,
    /// Status after the step
    pub status: EpisodeStatus,
}

/// A single game from the start cell until escape or capture
#[derive(Debug, Clone)]
pub struct Episode {
    planner: EscapePlanner,
    obstacles: ObstacleSet,
    agent: Cell,
    solution: Solution,
    status: EpisodeStatus,
    rng: StdRng,
    seed: u64,
    turns: usize,
}

impl Episode {
    /// Start an episode with the agent at the centre and no obstacles
    ///
    /// # Errors
    ///
    /// Returns an error if the initial solve does not converge
    pub fn new(planner: EscapePlanner, seed: u64) -> Result<Self> {
        let world = planner.world();
        let obstacles = ObstacleSet::new(world);
        let solution = planner.solve(&obstacles)?;

        Ok(Self {
            planner,
            obstacles,
            agent: world.start_cell(),
            solution,
            status: EpisodeStatus::Ongoing,
            rng: StdRng::seed_from_u64(seed),
            seed,
            turns: 0,
        })
    }

    /// Return to the start cell with no obstacles and the original seed
    ///
    /// # Errors
    ///
    /// Returns an error if the fresh solve does not converge
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::new(self.planner, self.seed)?;
        Ok(())
    }

    /// Grid geometry
    pub const fn world(&self) -> GridWorld {
        self.planner.world()
    }

    /// Planner used for every turn
    pub const fn planner(&self) -> &EscapePlanner {
        &self.planner
    }

    /// Current agent cell
    pub const fn agent(&self) -> Cell {
        self.agent
    }

    /// Obstacles placed so far
    pub const fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Latest solve
    pub const fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Latest policy
    pub const fn policy(&self) -> &Policy {
        &self.solution.policy
    }

    /// Latest value function
    pub const fn values(&self) -> &ValueFunction {
        &self.solution.values
    }

    /// Current status
    pub const fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Turns played so far
    pub const fn turns(&self) -> usize {
        self.turns
    }

    /// Greedy walk from the agent's cell under the latest policy
    pub fn trace(&self) -> Trace {
        Trace::follow(self.agent, &self.solution.policy)
    }

    /// Why an obstacle may not go on `cell`, if anything
    pub fn placement_error(&self, cell: Cell) -> Option<&'static str> {
        if self.status != EpisodeStatus::Ongoing {
            Some("the episode is over")
        } else if !self.world().is_playable(cell) {
            Some("outside the playable region")
        } else if cell == self.agent {
            Some("occupied by the agent")
        } else if self.obstacles.contains(cell) {
            Some("already an obstacle")
        } else {
            None
        }
    }

    /// Whether an obstacle may go on `cell`
    pub fn accepts(&self, cell: Cell) -> bool {
        self.placement_error(cell).is_none()
    }

    /// Place an obstacle, re-plan and move the agent once
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::InvalidPlacement`] if the cell cannot take an
    /// obstacle, or a solver error if re-planning fails; the episode is left
    /// unchanged in both cases
    pub fn place_obstacle(&mut self, cell: Cell) -> Result<Turn> {
        if let Some(reason) = self.placement_error(cell) {
            warn!(%cell, reason, "rejected obstacle placement");
            return Err(AlgorithmError::InvalidPlacement { cell, reason });
        }

        // The episode only changes once the re-solve succeeds
        let mut obstacles = self.obstacles.clone();
        obstacles.insert(cell)?;
        let solution = self
            .planner
            .solver()
            .resolve(&obstacles, &self.solution.values)?;
        self.obstacles = obstacles;
        self.solution = solution;

        let step = self.planner.executor().step(
            self.agent,
            &self.solution.policy,
            &self.obstacles,
            &mut self.rng,
        )?;
        self.agent = step.to;
        self.turns += 1;
        self.status = self.evaluate_status();

        info!(
            turn = self.turns,
            obstacle = %cell,
            from = %step.from,
            to = %step.to,
            status = %self.status,
            "turn complete"
        );

        Ok(Turn {
            number: self.turns,
            obstacle: cell,
            step,
            sweeps: self.solution.sweeps,
            status: self.status,
        })
    }

    /// Let a trapper place obstacles until the episode ends
    ///
    /// Stops early after `max_turns` placements or when the trapper has no
    /// placement left, leaving the status [`EpisodeStatus::Ongoing`].
    ///
    /// # Errors
    ///
    /// Returns a solver error if re-planning fails
    pub fn play(
        &mut self,
        trapper: &mut Trapper,
        max_turns: usize,
        mut on_turn: impl FnMut(&Turn),
    ) -> Result<EpisodeStatus> {
        while self.status == EpisodeStatus::Ongoing && self.turns < max_turns {
            let Some(cell) = trapper.next_placement(self) else {
                break;
            };
            let turn = self.place_obstacle(cell)?;
            on_turn(&turn);
        }

        if self.status != EpisodeStatus::Ongoing {
            info!(status = %self.status, turns = self.turns, "episode finished");
        }
        Ok(self.status)
    }

    fn evaluate_status(&self) -> EpisodeStatus {
        let world = self.world();
        if world.is_goal(self.agent) {
            EpisodeStatus::Escaped
        } else if is_trapped(&world, self.agent, &self.obstacles) {
            EpisodeStatus::Trapped
        } else {
            EpisodeStatus::Ongoing
        }
    }
}

/// How a trapper picks cells once its scripted placements run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapperStrategy {
    /// Block the next cell of the agent's greedy trace, else a random cell
    BlockPath,
    /// Any free playable cell, uniformly
    Random,
}

/// Source of obstacle placements for headless episodes
///
/// Scripted cells are used first, in order; ones the episode would reject are
/// skipped.
#[derive(Debug, Clone)]
pub struct Trapper {
    scripted: VecDeque<Cell>,
    strategy: TrapperStrategy,
    rng: StdRng,
}

impl Trapper {
    /// Create a trapper with scripted placements and a fallback strategy
    pub fn new(scripted: impl IntoIterator<Item = Cell>, strategy: TrapperStrategy, seed: u64) -> Self {
        Self {
            scripted: scripted.into_iter().collect(),
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Scripted placements not yet used
    pub fn remaining_scripted(&self) -> usize {
        self.scripted.len()
    }

    /// Next cell to turn into an obstacle, if any is available
    pub fn next_placement(&mut self, episode: &Episode) -> Option<Cell> {
        while let Some(cell) = self.scripted.pop_front() {
            if let Some(reason) = episode.placement_error(cell) {
                warn!(%cell, reason, "skipping scripted placement");
                continue;
            }
            return Some(cell);
        }

        match self.strategy {
            TrapperStrategy::BlockPath => episode
                .trace()
                .cells
                .get(1)
                .copied()
                .filter(|&cell| episode.accepts(cell))
                .or_else(|| random_free_cell(episode, &mut self.rng)),
            TrapperStrategy::Random => random_free_cell(episode, &mut self.rng),
        }
    }
}

fn random_free_cell<R: Rng + ?Sized>(episode: &Episode, rng: &mut R) -> Option<Cell> {
    let free: Vec<Cell> = episode
        .world()
        .playable_cells()
        .filter(|&cell| episode.accepts(cell))
        .collect();

    if free.is_empty() {
        return None;
    }
    free.get(rng.random_range(0..free.len())).copied()
}
