//! Run configuration and the command-line surface that builds it.

use std::path::PathBuf;

use clap::Parser;

use crate::CobError;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_BENCH: &str = ".";
pub const DEFAULT_BENCH_TIME: &str = "1s";
pub const DEFAULT_HARNESS: &str = "go";

/// Immutable settings for one comparison run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Benchmark name filter handed to the harness (`-bench`).
    pub bench: String,
    /// Per-benchmark duration handed to the harness (`-benchtime`).
    pub bench_time: String,
    /// Request allocation statistics and compare `B/op` as well.
    pub bench_mem: bool,
    /// Relative slowdown above which a benchmark counts as a degression.
    pub threshold: f64,
    /// Render only degressions in the comparison table.
    pub only_degression: bool,
    /// Passed through to the harness after the generated flags.
    pub extra_args: Vec<String>,
    pub harness: String,
    pub repo: PathBuf,
    pub json: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bench: DEFAULT_BENCH.to_string(),
            bench_time: DEFAULT_BENCH_TIME.to_string(),
            bench_mem: false,
            threshold: DEFAULT_THRESHOLD,
            only_degression: false,
            extra_args: Vec::new(),
            harness: DEFAULT_HARNESS.to_string(),
            repo: PathBuf::from("."),
            json: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), CobError> {
        if !self.threshold.is_finite() {
            return Err(CobError::invalid_config(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if self.bench_time.trim().is_empty() {
            return Err(CobError::invalid_config("benchtime must not be empty"));
        }
        if self.harness.trim().is_empty() {
            return Err(CobError::invalid_config("harness program must not be empty"));
        }
        Ok(())
    }
}

#[derive(Parser, Clone, Debug, PartialEq)]
#[command(
    name = "cob",
    version,
    about = "Continuous benchmark: run benchmarks on HEAD and HEAD~1 and fail on degressions"
)]
pub struct CommandLineConfig {
    /// Show only benchmarks with worse score
    #[arg(long)]
    pub only_degression: bool,

    /// The program fails if the benchmark gets worse than the threshold
    #[arg(long, env = "COB_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Run only those benchmarks matching a regular expression
    #[arg(long, default_value = DEFAULT_BENCH)]
    pub bench: String,

    /// Print memory allocation statistics for benchmarks
    #[arg(long)]
    pub benchmem: bool,

    /// Run enough iterations of each benchmark to take this duration (for example 1h30s)
    #[arg(long, default_value = DEFAULT_BENCH_TIME)]
    pub benchtime: String,

    /// Benchmark harness program
    #[arg(long, default_value = DEFAULT_HARNESS)]
    pub harness: String,

    /// Repository to benchmark
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Also write the comparison as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Extra arguments passed to the harness
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        Self::try_parse_from(args).map_err(|e| e.to_string())
    }

    pub fn into_run_config(self) -> Result<RunConfig, CobError> {
        let config = RunConfig {
            bench: self.bench,
            bench_time: self.benchtime,
            bench_mem: self.benchmem,
            threshold: self.threshold,
            only_degression: self.only_degression,
            extra_args: self.extra_args,
            harness: self.harness,
            repo: self.repo,
            json: self.json,
        };
        config.validate()?;
        Ok(config)
    }
}
