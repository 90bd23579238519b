//! Safety and reachability checks applied to policy actions before moving
//!
//! The safety predicate forbids entering an obstacle. The reachability
//! predicate is deliberately weak: it accepts every cell, and the goal band
//! explicitly. A rejected action is replaced by the first action in
//! [`Action::ALL`] order that is safe and lands on a legal or goal cell.

use tracing::{debug, info};

use crate::spatial::grid::{Action, Cell, GridWorld, next_cell};
use crate::spatial::obstacles::ObstacleSet;

/// Whether moving to `target` avoids every obstacle
pub fn is_safe(target: Cell, obstacles: &ObstacleSet) -> bool {
    !obstacles.contains(target)
}

/// Whether the goal stays reachable after moving to `target`
///
/// Goal cells trivially qualify. Anything else is currently accepted too; no
/// graph search is performed. Safety is checked separately by [`is_safe`].
pub const fn keeps_goal_reachable(_world: &GridWorld, _target: Cell) -> bool {
    true
}

/// Whether `target` is an acceptable fallback destination
fn is_fallback_target(world: &GridWorld, target: Cell, obstacles: &ObstacleSet) -> bool {
    is_safe(target, obstacles) && (world.is_legal(target, obstacles) || world.is_goal(target))
}

/// Check a proposed action and substitute a fallback if it fails
///
/// Returns the proposed action unchanged when it passes both predicates,
/// otherwise the first acceptable action in fixed order, or `None` when every
/// move is blocked (the agent is trapped).
pub fn validate(
    world: &GridWorld,
    cell: Cell,
    proposed: Action,
    obstacles: &ObstacleSet,
) -> Option<Action> {
    let target = next_cell(cell, proposed);
    if is_safe(target, obstacles) && keeps_goal_reachable(world, target) {
        return Some(proposed);
    }

    let fallback = Action::ALL
        .into_iter()
        .find(|&action| is_fallback_target(world, next_cell(cell, action), obstacles));

    match fallback {
        Some(action) => debug!(%cell, %proposed, %action, "replaced unsafe action"),
        None => info!(%cell, "no safe move available"),
    }
    fallback
}

/// Whether no action out of `cell` is acceptable
pub fn is_trapped(world: &GridWorld, cell: Cell, obstacles: &ObstacleSet) -> bool {
    !Action::ALL
        .into_iter()
        .any(|action| is_fallback_target(world, next_cell(cell, action), obstacles))
}
