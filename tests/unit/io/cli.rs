//! Tests for command-line parsing and the episode runner

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;
    use swampescape::AlgorithmError;
    use swampescape::algorithm::episode::{EpisodeStatus, TrapperStrategy};
    use swampescape::io::cli::{Cli, EpisodeRunner, StrategyArg, parse_cell};
    use swampescape::io::configuration::{
        DEFAULT_BORDER_WIDTH, DEFAULT_EPISODES, DEFAULT_EXPLORATION_PROBABILITY, DEFAULT_MAX_TURNS,
        DEFAULT_PLAYABLE_SIZE, DEFAULT_SEED,
    };
    use swampescape::spatial::grid::Cell;

    // Tests parsing with no arguments uses the defaults
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["program"]);

        assert_eq!(cli.size, DEFAULT_PLAYABLE_SIZE);
        assert_eq!(cli.border, DEFAULT_BORDER_WIDTH);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.episodes, DEFAULT_EPISODES);
        assert_eq!(cli.max_turns, DEFAULT_MAX_TURNS);
        assert!(cli.obstacles.is_empty());
        assert_eq!(cli.strategy, StrategyArg::Block);
        assert!(cli.heatmap.is_none());
        assert!((cli.exploration - DEFAULT_EXPLORATION_PROBABILITY).abs() < f64::EPSILON);
        assert!(!cli.show_values);
        assert!(!cli.quiet);
        assert!(cli.should_show_progress());
        assert!(cli.build_planner().is_ok());
    }

    // Tests parsing with every flag set
    // Verified by dropping repeated obstacle flags
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "--size",
            "6",
            "--border",
            "1",
            "--discount",
            "0.8",
            "--threshold",
            "0.001",
            "--main-probability",
            "0.7",
            "--exploration",
            "0.9",
            "--max-sweeps",
            "300",
            "--seed",
            "123",
            "--episodes",
            "3",
            "--max-turns",
            "12",
            "--obstacle",
            "2,3",
            "-o",
            " 4, 5",
            "--strategy",
            "random",
            "--heatmap",
            "out/heat.png",
            "--show-policy",
            "--show-board",
            "--show-values",
            "--verbose",
            "--quiet",
        ]);

        assert_eq!(cli.size, 6);
        assert_eq!(cli.border, 1);
        assert!((cli.discount - 0.8).abs() < f64::EPSILON);
        assert!((cli.exploration - 0.9).abs() < f64::EPSILON);
        assert_eq!(cli.max_sweeps, 300);
        assert_eq!(cli.seed, 123);
        assert_eq!(cli.episodes, 3);
        assert_eq!(cli.max_turns, 12);
        assert_eq!(cli.obstacles, vec![Cell::new(2, 3), Cell::new(4, 5)]);
        assert_eq!(TrapperStrategy::from(cli.strategy), TrapperStrategy::Random);
        assert_eq!(cli.heatmap, Some(PathBuf::from("out/heat.png")));
        assert!(cli.show_policy && cli.show_board && cli.show_values);
        assert!(cli.verbose && cli.quiet);
        assert!(!cli.should_show_progress());

        let planner = cli.build_planner().expect("valid flags");
        assert_eq!(planner.world().total_size(), 8);
        assert_eq!(planner.solver().config().max_sweeps(), 300);
    }

    // Tests cell parsing accepts signed pairs and rejects malformed text
    // Verified by splitting on whitespace
    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("3,4"), Ok(Cell::new(3, 4)));
        assert_eq!(parse_cell(" -1 , 7 "), Ok(Cell::new(-1, 7)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("a,4").is_err());
        assert!(parse_cell("3,4,5").is_err());
        assert!(Cli::try_parse_from(["program", "--obstacle", "x"]).is_err());
    }

    // Tests invalid numeric flags are reported as parameter errors
    // Verified by skipping solver validation
    #[test]
    fn test_build_planner_rejects_invalid_parameters() {
        let cli = Cli::parse_from(["program", "--discount", "1.0"]);
        assert!(matches!(
            cli.build_planner(),
            Err(AlgorithmError::InvalidParameter {
                parameter: "discount",
                ..
            })
        ));

        let cli = Cli::parse_from(["program", "--size", "0"]);
        assert!(cli.build_planner().is_err());

        let cli = Cli::parse_from(["program", "--exploration", "0"]);
        assert!(cli.build_planner().is_err());
    }

    // Tests per-episode seeds and heat-map paths
    // Verified by numbering a single-episode heat map
    #[test]
    fn test_episode_seeds_and_heatmap_paths() {
        let single = Cli::parse_from(["program", "--seed", "10", "--heatmap", "maps/v.png"]);
        assert_eq!(single.episode_seed(0), 10);
        assert_eq!(single.heatmap_path(0), Some(PathBuf::from("maps/v.png")));

        let batch = Cli::parse_from([
            "program",
            "--seed",
            "18446744073709551615",
            "--episodes",
            "2",
            "--heatmap",
            "maps/v.png",
        ]);
        assert_eq!(batch.episode_seed(1), 0);
        assert_eq!(batch.heatmap_path(1), Some(PathBuf::from("maps/v_2.png")));

        let none = Cli::parse_from(["program"]);
        assert_eq!(none.heatmap_path(0), None);
    }

    // Tests a quiet batch run reports one summary per episode and writes heat maps
    // Verified by reusing the first seed for every episode
    #[test]
    fn test_runner_plays_episodes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let heatmap = dir.path().join("value.png");
        let cli = Cli::parse_from([
            "program",
            "--size",
            "5",
            "--border",
            "1",
            "--episodes",
            "2",
            "--max-turns",
            "6",
            "--seed",
            "5",
            "--show-policy",
            "--show-board",
            "--show-values",
            "--quiet",
            "--heatmap",
            heatmap.to_str().expect("utf-8 temp path"),
        ]);

        let summaries = EpisodeRunner::new(cli).run().expect("episodes run");

        assert_eq!(summaries.len(), 2);
        for (index, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.index, index);
            assert_eq!(summary.seed, 5 + index as u64);
            assert!(summary.turns <= 6);
            assert!(summary.status != EpisodeStatus::Ongoing || summary.turns == 6);
            assert!(summary.trace.starts_with(&summary.agent.to_string()));
            if summary.status == EpisodeStatus::Escaped {
                assert_eq!(summary.shortest_escape, Some(0));
            }
        }
        assert!(dir.path().join("value_1.png").exists());
        assert!(dir.path().join("value_2.png").exists());
    }
}
