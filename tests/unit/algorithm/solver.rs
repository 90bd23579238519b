//! Tests for value iteration, value functions and policies

#[cfg(test)]
mod tests {
    use swampescape::AlgorithmError;
    use swampescape::algorithm::model::GridMdp;
    use swampescape::algorithm::solver::{
        Policy, SolverConfig, ValueIteration, greedy_action,
    };
    use swampescape::spatial::grid::{Action, Cell, GridWorld};
    use swampescape::spatial::obstacles::ObstacleSet;

    fn default_solver() -> ValueIteration {
        let world = GridWorld::new(10, 2).expect("valid grid");
        ValueIteration::new(world, SolverConfig::default())
    }

    // Tests configuration validation for each parameter
    // Verified by accepting a discount of one
    #[test]
    fn test_solver_config_validation() {
        assert!(SolverConfig::new(0.9, 1e-4, 0.8).is_ok());

        for (discount, threshold, main, parameter) in [
            (0.0, 1e-4, 0.8, "discount"),
            (1.0, 1e-4, 0.8, "discount"),
            (f64::NAN, 1e-4, 0.8, "discount"),
            (0.9, 0.0, 0.8, "threshold"),
            (0.9, -1.0, 0.8, "threshold"),
            (0.9, 1e-4, 0.0, "main_probability"),
            (0.9, 1e-4, 1.5, "main_probability"),
        ] {
            let result = SolverConfig::new(discount, threshold, main);
            assert!(
                matches!(result, Err(AlgorithmError::InvalidParameter { parameter: p, .. }) if p == parameter),
                "expected {parameter} to be rejected"
            );
        }

        let config = SolverConfig::default();
        assert!(config.with_max_sweeps(0).is_err());
        assert_eq!(config.with_max_sweeps(7).expect("valid cap").max_sweeps(), 7);
        assert!((config.discount() - 0.9).abs() < f64::EPSILON);
        assert!((config.threshold() - 1e-4).abs() < f64::EPSILON);
    }

    // Tests goal cells hold zero, obstacles negative infinity and every
    // decision cell an action
    // Verified by leaving obstacle values at zero
    #[test]
    fn test_solution_structure() {
        let solver = default_solver();
        let world = solver.world();
        let obstacles =
            ObstacleSet::from_cells(world, [Cell::new(6, 7), Cell::new(3, 3)]).expect("valid");
        let solution = solver.compute_policy(&obstacles).expect("converges");

        for cell in world.cells() {
            let value = solution.values.get(cell).expect("on grid");
            if world.is_goal(cell) {
                assert!(value.abs() < f64::EPSILON, "goal {cell} has {value}");
                assert_eq!(solution.policy.get(cell), None);
            } else if obstacles.contains(cell) {
                assert!(value == f64::NEG_INFINITY, "obstacle {cell} has {value}");
                assert_eq!(solution.policy.get(cell), None);
            } else {
                assert!(value.is_finite());
                assert!(solution.policy.get(cell).is_some(), "{cell} has no action");
            }
        }

        assert_eq!(solution.policy.assigned_count(), 98);
        assert!(solution.residual < SolverConfig::default().threshold());
        assert!(solution.sweeps >= 2);
    }

    // Tests values fall off towards the centre of the open board
    // Verified by inverting the step cost sign
    #[test]
    fn test_values_decrease_away_from_goal() {
        let solver = default_solver();
        let solution = solver
            .compute_policy(&ObstacleSet::new(solver.world()))
            .expect("converges");

        let edge = solution.values.get(Cell::new(2, 7)).expect("on grid");
        let centre = solution.values.get(Cell::new(7, 7)).expect("on grid");
        assert!(edge > centre, "edge {edge} should exceed centre {centre}");

        let (low, high) = solution.values.finite_range().expect("finite values");
        assert!(low <= centre && edge <= high);
        assert!(high <= 100.0);
    }

    // Tests exact values and the Up tie-break on a single-cell board
    // Verified by preferring the last maximal action
    #[test]
    fn test_single_cell_board() {
        let world = GridWorld::new(1, 1).expect("valid grid");
        let config = SolverConfig::new(0.9, 1e-4, 1.0).expect("valid config");
        let solution = ValueIteration::new(world, config)
            .compute_policy(&ObstacleSet::new(world))
            .expect("converges");

        let centre = Cell::new(1, 1);
        let value = solution.values.get(centre).expect("on grid");
        assert!((value - 100.0).abs() < 1e-12);
        assert_eq!(solution.policy.get(centre), Some(Action::Up));
        assert_eq!(solution.sweeps, 2);
    }

    // Tests a fully enclosed cell still converges to the stay-put value
    // Verified by skipping backups of enclosed cells
    #[test]
    fn test_enclosed_cell_converges() {
        let solver = default_solver();
        let world = solver.world();
        let centre = Cell::new(7, 7);
        let obstacles = ObstacleSet::from_cells(
            world,
            [Cell::new(6, 7), Cell::new(8, 7), Cell::new(7, 6), Cell::new(7, 8)],
        )
        .expect("valid");
        let solution = solver.compute_policy(&obstacles).expect("converges");

        // -10 / (1 - 0.9)
        let value = solution.values.get(centre).expect("on grid");
        assert!((value - (-100.0)).abs() < 1e-2, "got {value}");
        assert!(solution.policy.get(centre).is_some());
    }

    // Tests the sweep cap is reported as non-convergence
    // Verified by returning the unconverged solution
    #[test]
    fn test_non_convergence() {
        let world = GridWorld::new(10, 2).expect("valid grid");
        let config = SolverConfig::new(0.999_999, 1e-12, 0.8)
            .and_then(|config| config.with_max_sweeps(5))
            .expect("valid config");
        let result = ValueIteration::new(world, config).compute_policy(&ObstacleSet::new(world));

        assert!(matches!(
            result,
            Err(AlgorithmError::NonConvergence { sweeps: 5, residual }) if residual > 1e-12
        ));
    }

    // Tests obstacles sized for another grid are rejected
    // Verified by indexing the foreign obstacle set directly
    #[test]
    fn test_mismatched_obstacle_grid() {
        let solver = default_solver();
        let other = GridWorld::new(5, 2).expect("valid grid");

        assert!(matches!(
            solver.compute_policy(&ObstacleSet::new(other)),
            Err(AlgorithmError::InvalidParameter {
                parameter: "obstacles",
                ..
            })
        ));
    }

    // Tests repeated solves are bit-identical
    // Verified by iterating cells in hash order
    #[test]
    fn test_compute_policy_is_deterministic() {
        let solver = default_solver();
        let obstacles = ObstacleSet::from_cells(
            solver.world(),
            [Cell::new(5, 5), Cell::new(5, 6), Cell::new(9, 3)],
        )
        .expect("valid");

        let first = solver.compute_policy(&obstacles).expect("converges");
        let second = solver.compute_policy(&obstacles).expect("converges");
        assert_eq!(first, second);
    }

    // Tests a warm start lands on the cold solution within the stopping error
    // Verified by ignoring the previous values
    #[test]
    fn test_warm_resolve_matches_cold_solve() {
        let solver = default_solver();
        let world = solver.world();
        let before = solver
            .compute_policy(&ObstacleSet::new(world))
            .expect("converges");

        let obstacles = ObstacleSet::from_cells(world, [Cell::new(6, 7)]).expect("valid");
        let cold = solver.compute_policy(&obstacles).expect("converges");
        let warm = solver.resolve(&obstacles, &before.values).expect("converges");

        assert!(warm.residual < solver.config().threshold());
        for cell in world.cells() {
            let cold_value = cold.values.get(cell).expect("on grid");
            let warm_value = warm.values.get(cell).expect("on grid");
            if cold_value.is_finite() {
                assert!((cold_value - warm_value).abs() < 1e-2, "{cell}");
            } else {
                assert!(warm_value == f64::NEG_INFINITY);
            }
        }
    }

    // Tests the greedy choice keeps the first maximum
    // Verified by using a non-strict comparison
    #[test]
    fn test_greedy_action_tie_break() {
        let world = GridWorld::new(1, 1).expect("valid grid");
        let obstacles = ObstacleSet::new(world);
        let config = SolverConfig::new(0.9, 1e-4, 1.0).expect("valid config");
        let mdp = GridMdp::new(world, &obstacles, config.noise());
        let solution = ValueIteration::new(world, config)
            .compute_policy(&obstacles)
            .expect("converges");

        let (action, value) = greedy_action(&mdp, Cell::new(1, 1), 0.9, &solution.values);
        assert_eq!(action, Action::Up);
        assert!((value - 100.0).abs() < 1e-12);
    }

    // Tests strict and lenient policy lookups off the grid
    // Verified by returning an empty action for off-grid cells
    #[test]
    fn test_policy_lookup_and_assignment() {
        let world = GridWorld::new(3, 1).expect("valid grid");
        let mut policy = Policy::empty(world);

        assert_eq!(policy.action(Cell::new(2, 2)).expect("on grid"), None);
        policy.set(Cell::new(2, 2), Some(Action::Left)).expect("on grid");
        assert_eq!(policy.get(Cell::new(2, 2)), Some(Action::Left));
        assert_eq!(policy.assigned_count(), 1);

        assert_eq!(policy.get(Cell::new(-1, 2)), None);
        assert!(matches!(
            policy.action(Cell::new(-1, 2)),
            Err(AlgorithmError::NoPolicyForCell { grid_size: 5, .. })
        ));
        assert!(policy.set(Cell::new(5, 0), Some(Action::Up)).is_err());
    }
}
