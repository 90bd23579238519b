//! Spatial data structures for the bordered grid
//!
//! This module contains spatial-related functionality including:
//! - Cells, compass actions and region classification
//! - The obstacle bitmap
//! - Breadth-first escape distances

/// Breadth-first escape distance computation
pub mod distance;
/// Cells, actions and bordered grid geometry
pub mod grid;
/// Bitmap-backed obstacle set
pub mod obstacles;

pub use grid::{Action, Cell, GridWorld, next_cell};
pub use obstacles::ObstacleSet;
