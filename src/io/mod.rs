/// Command-line interface and episode runner
pub mod cli;
/// Planner constants and runtime defaults
pub mod configuration;
/// Error types for planner operations
pub mod error;
/// PNG heat-map export
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress bars for batches of episodes
pub mod progress;
/// Text rendering of traces, policies and boards
pub mod visualization;
