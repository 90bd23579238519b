//! PNG heat-map export of a value function

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::algorithm::solver::ValueFunction;
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::Cell;
use crate::spatial::obstacles::ObstacleSet;

// Palette of the board the planner was built for
const GOAL_COLOR: [u8; 4] = [10, 100, 32, 255];
const OBSTACLE_COLOR: [u8; 4] = [255, 90, 0, 255];
const AGENT_COLOR: [u8; 4] = [255, 255, 255, 255];
const LOW_VALUE_COLOR: [u8; 4] = [8, 16, 64, 255];
const HIGH_VALUE_COLOR: [u8; 4] = [30, 100, 250, 255];

// Linear blend between the low and high value colours
fn shade(fraction: f64) -> Rgba<u8> {
    let t = fraction.clamp(0.0, 1.0);
    let mut channels = [0u8; 4];
    for ((out, &low), &high) in channels
        .iter_mut()
        .zip(LOW_VALUE_COLOR.iter())
        .zip(HIGH_VALUE_COLOR.iter())
    {
        *out = (f64::from(low) + (f64::from(high) - f64::from(low)) * t).round() as u8;
    }
    Rgba(channels)
}

/// Export the value function as a PNG heat map
///
/// Every grid cell becomes a `cell_pixels` square. Playable cells shade from
/// dark (lowest finite value) to bright blue (highest); goal cells are green,
/// obstacles orange and the agent, if given, white.
///
/// # Errors
///
/// Returns an error if:
/// - `cell_pixels` is zero
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_value_heatmap(
    values: &ValueFunction,
    obstacles: &ObstacleSet,
    agent: Option<Cell>,
    cell_pixels: u32,
    output_path: &Path,
) -> Result<()> {
    if cell_pixels == 0 {
        return Err(crate::io::error::invalid_parameter(
            "cell_pixels",
            &cell_pixels,
            &"must be greater than zero",
        ));
    }

    let world = values.world();
    let side = world.total_size() as u32 * cell_pixels;
    let (low, high) = values.finite_range().unwrap_or((0.0, 0.0));
    let span = high - low;

    let mut img = ImageBuffer::new(side, side);

    for cell in world.cells() {
        let color = if Some(cell) == agent {
            Rgba(AGENT_COLOR)
        } else if obstacles.contains(cell) {
            Rgba(OBSTACLE_COLOR)
        } else if world.is_goal(cell) {
            Rgba(GOAL_COLOR)
        } else {
            let value = values.get(cell).unwrap_or(low);
            let fraction = if span > 0.0 { (value - low) / span } else { 1.0 };
            shade(fraction)
        };

        let origin_x = cell.col as u32 * cell_pixels;
        let origin_y = cell.row as u32 * cell_pixels;
        for dy in 0..cell_pixels {
            for dx in 0..cell_pixels {
                img.put_pixel(origin_x + dx, origin_y + dy, color);
            }
        }
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
