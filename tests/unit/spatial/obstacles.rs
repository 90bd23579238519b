//! Tests for the bitmap-backed obstacle set

#[cfg(test)]
mod tests {
    use swampescape::AlgorithmError;
    use swampescape::spatial::grid::{Cell, GridWorld};
    use swampescape::spatial::obstacles::ObstacleSet;

    fn world() -> GridWorld {
        GridWorld::new(4, 1).expect("valid grid")
    }

    // Tests insertion, duplicate detection and membership
    // Verified by always reporting a new insertion
    #[test]
    fn test_insert_and_contains() {
        let mut obstacles = ObstacleSet::new(world());
        assert!(obstacles.is_empty());

        assert!(obstacles.insert(Cell::new(2, 3)).expect("playable cell"));
        assert!(!obstacles.insert(Cell::new(2, 3)).expect("playable cell"));

        assert!(obstacles.contains(Cell::new(2, 3)));
        assert!(!obstacles.contains(Cell::new(3, 2)));
        assert!(!obstacles.contains(Cell::new(-1, 3)));
        assert_eq!(obstacles.len(), 1);
        assert!(!obstacles.is_empty());
    }

    // Tests that goal and off-grid cells cannot hold obstacles
    // Verified by allowing placement on the goal band
    #[test]
    fn test_insert_rejects_non_playable_cells() {
        let mut obstacles = ObstacleSet::new(world());

        for cell in [Cell::new(0, 2), Cell::new(5, 5), Cell::new(-1, 2), Cell::new(9, 9)] {
            let result = obstacles.insert(cell);
            assert!(
                matches!(result, Err(AlgorithmError::InvalidPlacement { cell: c, .. }) if c == cell),
                "{cell} should be rejected"
            );
        }
        assert!(obstacles.is_empty());
    }

    // Tests building from a list with duplicates and row-major iteration
    // Verified by iterating in insertion order
    #[test]
    fn test_from_cells_and_iteration_order() {
        let obstacles = ObstacleSet::from_cells(
            world(),
            [Cell::new(4, 1), Cell::new(1, 3), Cell::new(4, 1), Cell::new(2, 2)],
        )
        .expect("playable cells");

        let cells: Vec<Cell> = obstacles.iter().collect();
        assert_eq!(cells, vec![Cell::new(1, 3), Cell::new(2, 2), Cell::new(4, 1)]);
        assert_eq!(obstacles.world(), world());
    }

    // Tests that one bad cell fails the whole construction
    // Verified by skipping invalid cells
    #[test]
    fn test_from_cells_rejects_goal_cell() {
        let result = ObstacleSet::from_cells(world(), [Cell::new(1, 1), Cell::new(0, 0)]);
        assert!(result.is_err());
    }

    // Tests clearing and the display summary
    // Verified by leaving bits set after clear
    #[test]
    fn test_clear_and_display() {
        let mut obstacles =
            ObstacleSet::from_cells(world(), [Cell::new(1, 1), Cell::new(3, 4)]).expect("valid");
        assert_eq!(obstacles.to_string(), "ObstacleSet(2 cells: (1, 1) (3, 4))");

        obstacles.clear();
        assert!(obstacles.is_empty());
        assert_eq!(obstacles.iter().count(), 0);
        assert_eq!(obstacles.to_string(), "ObstacleSet(0 cells:)");
    }
}
