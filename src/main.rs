//! CLI entry point for headless escape episodes

use clap::Parser;
use swampescape::io::cli::{Cli, EpisodeRunner};

fn main() -> swampescape::Result<()> {
    let cli = Cli::parse();
    swampescape::io::logging::init(cli.verbose);
    let mut runner = EpisodeRunner::new(cli);
    runner.run().map(|_| ())
}
