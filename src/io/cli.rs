//! Command-line interface for running headless escape episodes

use crate::algorithm::episode::{Episode, EpisodeStatus, Trapper, TrapperStrategy};
use crate::algorithm::executor::EscapePlanner;
use crate::algorithm::solver::SolverConfig;
use crate::io::configuration::{
    DEFAULT_BORDER_WIDTH, DEFAULT_DISCOUNT, DEFAULT_EPISODES, DEFAULT_EXPLORATION_PROBABILITY,
    DEFAULT_MAIN_PROBABILITY, DEFAULT_MAX_SWEEPS, DEFAULT_MAX_TURNS, DEFAULT_PLAYABLE_SIZE,
    DEFAULT_SEED, DEFAULT_THRESHOLD, HEATMAP_CELL_PIXELS, VALUE_PRECISION,
};
use crate::io::error::Result;
use crate::io::image::export_value_heatmap;
use crate::io::progress::ProgressManager;
use crate::io::visualization::{render_board, render_policy, render_trace, render_values};
use crate::spatial::distance::escape_distance;
use crate::spatial::grid::{Cell, GridWorld};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Placement strategy once scripted obstacles run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Block the next cell of the agent's greedy path
    Block,
    /// Uniformly random free cell
    Random,
}

impl From<StrategyArg> for TrapperStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Block => Self::BlockPath,
            StrategyArg::Random => Self::Random,
        }
    }
}

/// Parse a `row,col` pair into a cell
///
/// # Errors
///
/// Returns a message if the text is not two comma-separated integers
pub fn parse_cell(text: &str) -> std::result::Result<Cell, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{text}'"))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid row in '{text}': {e}"))?;
    let col = col
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid column in '{text}': {e}"))?;
    Ok(Cell::new(row, col))
}

#[derive(Parser)]
#[command(name = "swampescape")]
#[command(
    author,
    version,
    about = "Plan and play grid escapes with value iteration"
)]
/// Command-line arguments for headless episodes
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Side length of the playable square
    #[arg(long, default_value_t = DEFAULT_PLAYABLE_SIZE)]
    pub size: usize,

    /// Width of the goal band around the playable square
    #[arg(long, default_value_t = DEFAULT_BORDER_WIDTH)]
    pub border: usize,

    /// Discount factor for value iteration
    #[arg(long, default_value_t = DEFAULT_DISCOUNT)]
    pub discount: f64,

    /// Convergence threshold for value iteration
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Probability the solver assumes the intended action is executed
    #[arg(long, default_value_t = DEFAULT_MAIN_PROBABILITY)]
    pub main_probability: f64,

    /// Probability the executor takes the validated action
    #[arg(long, default_value_t = DEFAULT_EXPLORATION_PROBABILITY)]
    pub exploration: f64,

    /// Sweep cap before the solver reports non-convergence
    #[arg(long, default_value_t = DEFAULT_MAX_SWEEPS)]
    pub max_sweeps: usize,

    /// Random seed; episode `i` uses `seed + i`
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of episodes to play
    #[arg(short, long, default_value_t = DEFAULT_EPISODES)]
    pub episodes: usize,

    /// Obstacle placements allowed per episode
    #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: usize,

    /// Scripted obstacle placement as ROW,COL (repeatable)
    #[arg(short, long = "obstacle", value_name = "ROW,COL", value_parser = parse_cell)]
    pub obstacles: Vec<Cell>,

    /// Placement strategy after the scripted obstacles
    #[arg(long, value_enum, default_value_t = StrategyArg::Block)]
    pub strategy: StrategyArg,

    /// Export a PNG heat map of the final value function
    #[arg(long, value_name = "PATH")]
    pub heatmap: Option<PathBuf>,

    /// Print the final policy as an arrow map
    #[arg(short = 'p', long)]
    pub show_policy: bool,

    /// Print the final board with the greedy path marked
    #[arg(short = 'b', long)]
    pub show_board: bool,

    /// Print the final value function as a table
    #[arg(long)]
    pub show_values: bool,

    /// Raise diagnostic logging to info when `RUST_LOG` is unset
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Seed for the episode at `index`
    pub const fn episode_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }

    /// Validate the flags into a planner
    ///
    /// # Errors
    ///
    /// Returns an error if any grid, solver or exploration parameter is out of range
    pub fn build_planner(&self) -> Result<EscapePlanner> {
        let world = GridWorld::new(self.size, self.border)?;
        let config = SolverConfig::new(self.discount, self.threshold, self.main_probability)?
            .with_max_sweeps(self.max_sweeps)?;
        EscapePlanner::new(world, config, self.exploration)
    }

    /// Heat-map path for the episode at `index`
    ///
    /// A single episode writes to the given path; batches add the episode
    /// number to the file stem.
    pub fn heatmap_path(&self, index: usize) -> Option<PathBuf> {
        let path = self.heatmap.as_deref()?;
        if self.episodes <= 1 {
            return Some(path.to_path_buf());
        }
        Some(numbered_path(path, index + 1))
    }
}

fn numbered_path(path: &Path, number: usize) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let name = match path.extension() {
        Some(extension) => format!(
            "{}_{number}.{}",
            stem.to_string_lossy(),
            extension.to_string_lossy()
        ),
        None => format!("{}_{number}", stem.to_string_lossy()),
    };

    if let Some(parent) = path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Final state of one episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    /// Zero-based episode index
    pub index: usize,
    /// Seed the episode ran with
    pub seed: u64,
    /// Status when the episode stopped
    pub status: EpisodeStatus,
    /// Turns played
    pub turns: usize,
    /// Agent cell at the end
    pub agent: Cell,
    /// Obstacles on the board at the end
    pub obstacles: usize,
    /// Rendered greedy trace from the final agent cell
    pub trace: String,
    /// Shortest obstacle-free escape from the final agent cell
    pub shortest_escape: Option<usize>,
}

/// Orchestrates headless episodes with progress tracking
pub struct EpisodeRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl EpisodeRunner {
    /// Create a new runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Play every episode and print the results
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are invalid, a solve fails or the
    /// heat map cannot be written
    // Allow print for episode results on stdout
    #[allow(clippy::print_stdout)]
    pub fn run(&mut self) -> Result<Vec<EpisodeSummary>> {
        let planner = self.cli.build_planner()?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(self.cli.episodes);
        }

        let mut summaries = Vec::with_capacity(self.cli.episodes);
        for index in 0..self.cli.episodes {
            let summary = self.run_episode(planner, index)?;
            summaries.push(summary);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        for summary in &summaries {
            println!(
                "episode {} (seed {}): {} after {} turns at {} with {} obstacles",
                summary.index + 1,
                summary.seed,
                summary.status,
                summary.turns,
                summary.agent,
                summary.obstacles
            );
            println!("  path: {}", summary.trace);
            match summary.shortest_escape {
                Some(distance) => println!("  shortest escape: {distance} moves"),
                None => println!("  shortest escape: none"),
            }
        }

        if summaries.len() > 1 {
            let count = |status: EpisodeStatus| summaries.iter().filter(|s| s.status == status).count();
            println!(
                "escaped {}, trapped {}, unfinished {}",
                count(EpisodeStatus::Escaped),
                count(EpisodeStatus::Trapped),
                count(EpisodeStatus::Ongoing)
            );
        }

        Ok(summaries)
    }

    // Allow print for optional policy, board and value output
    #[allow(clippy::print_stdout)]
    fn run_episode(&mut self, planner: EscapePlanner, index: usize) -> Result<EpisodeSummary> {
        let seed = self.cli.episode_seed(index);
        let mut episode = Episode::new(planner, seed)?;
        let mut trapper = Trapper::new(
            self.cli.obstacles.iter().copied(),
            self.cli.strategy.into(),
            seed,
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_episode(index, self.cli.max_turns);
        }

        let progress = &mut self.progress_manager;
        let status = episode.play(&mut trapper, self.cli.max_turns, |turn| {
            if let Some(pm) = progress.as_mut() {
                pm.update_turn(index, turn.number);
            }
        })?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_episode(index, status);
        }

        let trace = episode.trace();

        if self.cli.show_policy {
            println!("policy after episode {}:", index + 1);
            print!(
                "{}",
                render_policy(episode.policy(), episode.obstacles(), Some(episode.agent()))
            );
        }
        if self.cli.show_board {
            println!("board after episode {}:", index + 1);
            print!(
                "{}",
                render_board(
                    &episode.world(),
                    episode.obstacles(),
                    episode.agent(),
                    Some(&trace)
                )
            );
        }
        if self.cli.show_values {
            println!("values after episode {}:", index + 1);
            print!("{}", render_values(episode.values(), VALUE_PRECISION));
        }

        if let Some(path) = self.cli.heatmap_path(index) {
            export_value_heatmap(
                episode.values(),
                episode.obstacles(),
                Some(episode.agent()),
                HEATMAP_CELL_PIXELS,
                &path,
            )?;
        }

        Ok(EpisodeSummary {
            index,
            seed,
            status,
            turns: episode.turns(),
            agent: episode.agent(),
            obstacles: episode.obstacles().len(),
            trace: render_trace(&trace),
            shortest_escape: escape_distance(&episode.world(), episode.obstacles(), episode.agent()),
        })
    }
}
