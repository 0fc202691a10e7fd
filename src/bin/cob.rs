use std::{io, process};

use clap::Parser;
use cob::{CobError, CommandLineConfig, GitWorktree, RunConfig, SubprocessHarness, run_pipeline};

const EXIT_DEGRESSION: i32 = 1;
const EXIT_FAILURE: i32 = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match CommandLineConfig::try_parse() {
        Ok(cli) => cli.into_run_config(),
        Err(err) => err.exit(),
    };
    let config = match config {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(EXIT_FAILURE);
        }
    };

    match run(&config) {
        Ok(false) => {}
        Ok(true) => {
            eprintln!("This commit makes benchmarks worse");
            process::exit(EXIT_DEGRESSION);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(config: &RunConfig) -> Result<bool, CobError> {
    let worktree = GitWorktree::open(&config.repo)?;
    if !worktree.is_clean()? {
        log::warn!("working tree has uncommitted changes; they will be discarded");
    }
    let harness = SubprocessHarness::new(config.harness.as_str()).in_dir(&config.repo);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run_pipeline(&worktree, &harness, config, &mut out)?;
    Ok(result.degression_detected())
}
