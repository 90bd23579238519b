//! Diagnostic tracing for the planner binary
//!
//! Solver, validator and episode events are emitted through `tracing`. They
//! go to stderr and are filtered by `RUST_LOG`; traces and summaries printed
//! by the CLI go to stdout and are not affected.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `RUST_LOG`, falling back to `fallback`
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the tracing subscriber for diagnostic logging
///
/// Output: stderr, compact format. Calling this more than once is harmless;
/// later calls leave the first subscriber in place.
///
/// # Example
/// ```bash
/// RUST_LOG=swampescape=debug swampescape --episodes 3
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "swampescape=info" } else { DEFAULT_FILTER };

    let _ = tracing_subscriber::registry()
        .with(env_filter(fallback))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
