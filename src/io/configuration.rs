//! Planner constants and runtime configuration defaults

// Board layout used by the game this planner drives
/// Side length of the inner playable square
pub const DEFAULT_PLAYABLE_SIZE: usize = 10;
/// Width of the goal band surrounding the playable square
pub const DEFAULT_BORDER_WIDTH: usize = 2;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed side length of the full grid
pub const MAX_GRID_DIMENSION: usize = 1_000;

// Value iteration parameters
/// Discount factor applied to continuation values
pub const DEFAULT_DISCOUNT: f64 = 0.9;
/// Sweeps stop once the largest value change falls below this
pub const DEFAULT_THRESHOLD: f64 = 1e-4;
/// Probability that the intended action is the one executed
pub const DEFAULT_MAIN_PROBABILITY: f64 = 0.8;
/// Sweep cap; exceeding it is reported as non-convergence
pub const DEFAULT_MAX_SWEEPS: usize = 5_000;

// Execution-time exploration, independent of the solver's noise model
/// Probability the executor takes the validated action rather than exploring
pub const DEFAULT_EXPLORATION_PROBABILITY: f64 = 0.8;

// Reward structure of the grid MDP
/// Reward for stepping into the goal band
pub const GOAL_REWARD: f64 = 100.0;
/// Reward for bumping into an obstacle or the grid edge
pub const OBSTACLE_PENALTY: f64 = -10.0;
/// Reward for an ordinary move between playable cells
pub const STEP_COST: f64 = -1.0;

// Default values for headless runs
/// Fixed seed for reproducible episodes
pub const DEFAULT_SEED: u64 = 42;
/// Number of episodes run by the CLI
pub const DEFAULT_EPISODES: usize = 1;
/// Obstacle placements allowed before an episode is abandoned
pub const DEFAULT_MAX_TURNS: usize = 100;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Decimal places in printed value tables
pub const VALUE_PRECISION: usize = 2;
/// Side length in pixels of one grid cell in heat-map exports
pub const HEATMAP_CELL_PIXELS: u32 = 16;
