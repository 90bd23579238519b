/// Headless game session and obstacle placement strategies
pub mod episode;
/// Action execution with exploration and the planner entry points
pub mod executor;
/// Grid MDP transition kernel and rewards
pub mod model;
/// Value iteration producing values and a greedy policy
pub mod solver;
/// Deterministic greedy path tracing
pub mod tracer;
/// Safety and reachability checks with ordered fallback
pub mod validator;
