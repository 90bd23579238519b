//! Error types and context management for planner operations

use std::fmt;
use std::path::PathBuf;

use crate::spatial::grid::Cell;

/// Main error type for all planner operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Construction parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Strict policy lookup for a cell outside the grid
    ///
    /// The solver assigns an entry to every cell of the full grid, so this only
    /// happens when a caller mixes cells from a differently sized world.
    NoPolicyForCell {
        /// The cell that was looked up
        cell: Cell,
        /// Side length of the grid the policy covers
        grid_size: usize,
    },

    /// Value iteration hit its sweep cap before the residual fell below threshold
    NonConvergence {
        /// Number of sweeps performed
        sweeps: usize,
        /// Largest value change observed in the final sweep
        residual: f64,
    },

    /// Obstacle placement rejected by the episode
    InvalidPlacement {
        /// Cell where placement was attempted
        cell: Cell,
        /// Why the placement is not allowed
        reason: &'static str,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NoPolicyForCell { cell, grid_size } => {
                write!(
                    f,
                    "No policy entry for cell {cell} (grid size {grid_size}x{grid_size})"
                )
            }
            Self::NonConvergence { sweeps, residual } => {
                write!(
                    f,
                    "Value iteration did not converge after {sweeps} sweeps (residual {residual:e})"
                )
            }
            Self::InvalidPlacement { cell, reason } => {
                write!(f, "Cannot place obstacle at {cell}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for planner results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
