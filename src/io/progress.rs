//! Multi-episode progress tracking with automatic batching for large runs

use crate::algorithm::episode::EpisodeStatus;
use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display for batches of episodes
///
/// Switches between individual turn bars (for small batches) and a single
/// batch bar (for large batches) based on episode count
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    episode_bars: Vec<ProgressBar>,
    episode_count: usize,
    /// Stores (`label`, `current_turn`, `max_turns`) for rolling window display
    episode_states: Vec<(String, usize, usize)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static TURN_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Episodes: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            episode_bars: Vec::new(),
            episode_count: 0,
            episode_states: Vec::new(),
        }
    }

    /// Number of episodes announced by [`Self::initialize`]
    pub const fn episode_count(&self) -> usize {
        self.episode_count
    }

    /// Initialize progress bars based on episode count
    pub fn initialize(&mut self, episode_count: usize) {
        self.episode_count = episode_count;

        // Batch mode keeps large runs to a single line
        if episode_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(episode_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = episode_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(TURN_STYLE.clone());
            self.episode_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure the bar for a new episode
    pub fn start_episode(&mut self, index: usize, max_turns: usize) {
        if index >= self.episode_states.len() {
            self.episode_states.resize(index + 1, (String::new(), 0, 0));
        }
        if let Some(state) = self.episode_states.get_mut(index) {
            *state = (format!("episode {}", index + 1), 0, max_turns);
        }
        self.update_bars();
    }

    /// Report the number of turns played so far
    pub fn update_turn(&mut self, index: usize, turn: usize) {
        if let Some(state) = self.episode_states.get_mut(index) {
            state.1 = turn;
        }
        self.update_bars();
    }

    /// Mark an episode as finished and update batch progress
    pub fn complete_episode(&mut self, index: usize, status: EpisodeStatus) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.episode_states.get_mut(index) {
            state.0 = format!("{} {status}", state.0);
            state.2 = state.1;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All episodes played");
        }
        let _ = self.multi_progress.clear();
    }

    /// Show the last N episodes that have started
    fn update_bars(&self) {
        let active: Vec<&(String, usize, usize)> = self
            .episode_states
            .iter()
            .filter(|(label, _, _)| !label.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (label, current, max)) in visible.iter().enumerate() {
            if let Some(bar) = self.episode_bars.get(bar_idx) {
                bar.set_length(*max as u64);
                bar.set_position(*current as u64);
                let max_width = max.to_string().len();
                bar.set_message(format!("{current:>max_width$}/{max}"));
                bar.set_prefix(label.clone());
            }
        }

        for bar_idx in visible.len()..self.episode_bars.len() {
            if let Some(bar) = self.episode_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
