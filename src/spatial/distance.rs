//! Breadth-first escape distances through the unobstructed playable region

use ndarray::Array2;
use std::collections::VecDeque;

use crate::spatial::grid::{Action, Cell, GridWorld, next_cell};
use crate::spatial::obstacles::ObstacleSet;

/// Minimum number of moves from every cell to the goal band
///
/// Goal cells have distance 0. Obstacles and cells walled off from the goal
/// have no distance. Moves are the four compass actions without noise, so
/// this is a lower bound on what any policy can achieve.
pub fn escape_distances(world: &GridWorld, obstacles: &ObstacleSet) -> Array2<Option<usize>> {
    let total = world.total_size();
    let mut distances = Array2::from_elem((total, total), None);
    let mut frontier = VecDeque::new();

    for cell in world.cells().filter(|&cell| world.is_goal(cell)) {
        if let Some(slot) = world.index_of(cell).and_then(|index| distances.get_mut(index)) {
            *slot = Some(0);
            frontier.push_back((cell, 0));
        }
    }

    while let Some((cell, distance)) = frontier.pop_front() {
        for action in Action::ALL {
            let neighbour = next_cell(cell, action);
            if !world.is_legal(neighbour, obstacles) {
                continue;
            }
            let Some(slot) = world
                .index_of(neighbour)
                .and_then(|index| distances.get_mut(index))
            else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(distance + 1);
                frontier.push_back((neighbour, distance + 1));
            }
        }
    }

    distances
}

/// Minimum number of moves from one cell to the goal band
pub fn escape_distance(world: &GridWorld, obstacles: &ObstacleSet, cell: Cell) -> Option<usize> {
    let distances = escape_distances(world, obstacles);
    world
        .index_of(cell)
        .and_then(|index| distances.get(index).copied().flatten())
}
