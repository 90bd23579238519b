//! The bordered grid viewed as a finite Markov decision process
//!
//! States are the cells of the full grid. Goal cells are absorbing with zero
//! future value, obstacle cells are excluded, and every other playable cell is
//! a decision state with the four compass actions. Executing an action is
//! noisy: the intended move happens with the main probability and each other
//! move with the side probability.

use crate::io::configuration::{GOAL_REWARD, OBSTACLE_PENALTY, STEP_COST};
use crate::math::probability::NoiseProfile;
use crate::spatial::grid::{Action, Cell, GridWorld, next_cell};
use crate::spatial::obstacles::ObstacleSet;

/// Where the agent ends up after one executed action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Entered the goal band; no further value accrues
    Goal,
    /// Bumped into an obstacle or the grid edge and stayed put
    Blocked,
    /// Moved to another unobstructed playable cell
    Open(Cell),
}

impl Landing {
    /// Immediate reward for this landing
    pub const fn reward(self) -> f64 {
        match self {
            Self::Goal => GOAL_REWARD,
            Self::Blocked => OBSTACLE_PENALTY,
            Self::Open(_) => STEP_COST,
        }
    }
}

/// One branch of the transition kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Action actually executed
    pub action: Action,
    /// Probability of executing it
    pub probability: f64,
    /// Result of executing it
    pub landing: Landing,
}

/// Grid world, obstacle snapshot and noise profile bundled as an MDP
///
/// Pure: every method is a function of the borrowed snapshot only.
#[derive(Debug, Clone, Copy)]
pub struct GridMdp<'a> {
    world: GridWorld,
    obstacles: &'a ObstacleSet,
    noise: NoiseProfile,
}

impl<'a> GridMdp<'a> {
    /// Bundle a grid, its obstacles and a noise profile
    pub const fn new(world: GridWorld, obstacles: &'a ObstacleSet, noise: NoiseProfile) -> Self {
        Self {
            world,
            obstacles,
            noise,
        }
    }

    /// Grid geometry
    pub const fn world(&self) -> GridWorld {
        self.world
    }

    /// Obstacle snapshot
    pub const fn obstacles(&self) -> &'a ObstacleSet {
        self.obstacles
    }

    /// Noise profile of the transition kernel
    pub const fn noise(&self) -> NoiseProfile {
        self.noise
    }

    /// Whether the cell needs a value and an action
    pub fn is_decision_state(&self, cell: Cell) -> bool {
        self.world.is_legal(cell, self.obstacles)
    }

    /// Classify the result of executing `actual` from `cell`
    pub fn landing(&self, cell: Cell, actual: Action) -> Landing {
        let next = next_cell(cell, actual);
        if self.world.is_goal(next) {
            Landing::Goal
        } else if self.world.is_legal(next, self.obstacles) {
            Landing::Open(next)
        } else {
            // Obstacles, and defensively anything off the grid
            Landing::Blocked
        }
    }

    /// All four outcomes of committing to `intended`, in fixed action order
    pub fn transitions(&self, cell: Cell, intended: Action) -> [Transition; 4] {
        self.noise
            .kernel(intended)
            .map(|(action, probability)| Transition {
                action,
                probability,
                landing: self.landing(cell, action),
            })
    }

    /// Bellman backup of one state-action pair
    ///
    /// `value_of` supplies the current estimate for a cell. Blocked outcomes
    /// continue from `cell` itself; goal outcomes have zero continuation.
    pub fn expected_return(
        &self,
        cell: Cell,
        intended: Action,
        discount: f64,
        value_of: &impl Fn(Cell) -> f64,
    ) -> f64 {
        let stay = value_of(cell);
        self.transitions(cell, intended)
            .iter()
            .fold(0.0, |total, transition| {
                let continuation = match transition.landing {
                    Landing::Goal => 0.0,
                    Landing::Blocked => stay,
                    Landing::Open(next) => value_of(next),
                };
                total + transition.probability * (transition.landing.reward() + discount * continuation)
            })
    }
}
