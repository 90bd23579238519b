//! Text renderings of traces, policies and boards for terminals and logs
//!
//! Symbols: `~` goal band, `#` obstacle, `@` agent, `.` open cell, `*` cell on
//! a traced path, `?` decision cell without an action.

use crate::algorithm::solver::{Policy, ValueFunction};
use crate::algorithm::tracer::Trace;
use crate::spatial::grid::{Cell, GridWorld};
use crate::spatial::obstacles::ObstacleSet;

const GOAL_SYMBOL: char = '~';
const OBSTACLE_SYMBOL: char = '#';
const AGENT_SYMBOL: char = '@';
const OPEN_SYMBOL: char = '.';
const PATH_SYMBOL: char = '*';
const UNSET_SYMBOL: char = '?';

/// Render a trace as cells joined by their move labels
///
/// ```
/// use swampescape::algorithm::tracer::{Trace, TraceOutcome};
/// use swampescape::io::visualization::render_trace;
/// use swampescape::spatial::Cell;
///
/// let trace = Trace {
///     cells: vec![Cell::new(2, 2), Cell::new(1, 2)],
///     outcome: TraceOutcome::ReachedGoal,
/// };
/// assert_eq!(render_trace(&trace), "(2, 2) -Up-> (1, 2) [reached goal]");
/// ```
pub fn render_trace(trace: &Trace) -> String {
    let mut rendered = String::new();

    if let Some(start) = trace.cells.first() {
        rendered.push_str(&start.to_string());
    }
    for (_, action, to) in trace.moves() {
        let label = action.map_or_else(|| UNSET_SYMBOL.to_string(), |action| action.to_string());
        rendered.push_str(&format!(" -{label}-> {to}"));
    }

    rendered.push_str(&format!(" [{}]", trace.outcome));
    rendered
}

/// Render the policy as a grid of arrows, one character per cell
pub fn render_policy(policy: &Policy, obstacles: &ObstacleSet, agent: Option<Cell>) -> String {
    let world = policy.world();
    render_cells(&world, |cell| {
        if Some(cell) == agent {
            AGENT_SYMBOL
        } else if obstacles.contains(cell) {
            OBSTACLE_SYMBOL
        } else if world.is_goal(cell) {
            GOAL_SYMBOL
        } else {
            policy.get(cell).map_or(UNSET_SYMBOL, |action| action.arrow())
        }
    })
}

/// Render the board, optionally marking the cells of a trace
pub fn render_board(
    world: &GridWorld,
    obstacles: &ObstacleSet,
    agent: Cell,
    trace: Option<&Trace>,
) -> String {
    render_cells(world, |cell| {
        if cell == agent {
            AGENT_SYMBOL
        } else if obstacles.contains(cell) {
            OBSTACLE_SYMBOL
        } else if trace.is_some_and(|trace| trace.cells.contains(&cell)) {
            PATH_SYMBOL
        } else if world.is_goal(cell) {
            GOAL_SYMBOL
        } else {
            OPEN_SYMBOL
        }
    })
}

/// Render values in fixed-width columns
///
/// Obstacles show as `#` and goal cells as `~`, right-aligned.
pub fn render_values(values: &ValueFunction, precision: usize) -> String {
    let world = values.world();
    let width = precision + 6;
    let mut rendered = String::new();

    for row in 0..world.total_size() as i32 {
        let line: Vec<String> = (0..world.total_size() as i32)
            .map(|col| {
                let cell = Cell::new(row, col);
                match values.get(cell) {
                    _ if world.is_goal(cell) => format!("{GOAL_SYMBOL:>width$}"),
                    Some(value) if value.is_finite() => format!("{value:>width$.precision$}"),
                    _ => format!("{OBSTACLE_SYMBOL:>width$}"),
                }
            })
            .collect();
        rendered.push_str(line.join(" ").trim_end());
        rendered.push('\n');
    }

    rendered
}

fn render_cells(world: &GridWorld, symbol: impl Fn(Cell) -> char) -> String {
    let total = world.total_size();
    let mut rendered = String::with_capacity(total * (total + 1));

    for row in 0..total as i32 {
        for col in 0..total as i32 {
            rendered.push(symbol(Cell::new(row, col)));
        }
        rendered.push('\n');
    }

    rendered
}
