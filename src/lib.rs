//! Escape planning on a bordered grid under action noise
//!
//! A value-iteration solver turns the current obstacle layout into a greedy
//! policy. Each proposed move passes a safety check with ordered fallback
//! before it is executed with exploration noise, and a deterministic tracer
//! exposes the intended path for diagnostics.

#![forbid(unsafe_code)]

/// Grid MDP, value iteration, validation, execution and episodes
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Noise profiles and weighted sampling
pub mod math;
/// Cells, grid geometry, obstacles and escape distances
pub mod spatial;

pub use io::error::{AlgorithmError, Result};
