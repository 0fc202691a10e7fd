//! Runs the benchmark harness once and parses what it prints.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{
    CobError,
    config::RunConfig,
    parse::{BenchmarkSet, parse_set},
};

const STDERR_TAIL_LINES: usize = 20;

/// Something that executes a benchmark suite and returns its raw stdout.
///
/// Output is kept as bytes; the parser decides what to do with lines that
/// are not valid UTF-8.
pub trait Harness {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, CobError>;
}

/// Harness backed by an external program, `go` by default.
#[derive(Clone, Debug)]
pub struct SubprocessHarness {
    program: String,
    leading_args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl SubprocessHarness {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            current_dir: None,
        }
    }

    /// Arguments placed before the generated ones, e.g. `sh -c <script>`.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Directory the harness runs in; the repository root for `go test`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Harness for SubprocessHarness {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, CobError> {
        log::debug!("exec: {} {:?} {:?}", self.program, self.leading_args, args);
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args).args(args).stdin(Stdio::null());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        let output = command
            .output()
            .map_err(|e| CobError::harness(format!("unable to start '{}': {e}", self.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CobError::harness(format!(
                "'{}' exited with {}{}",
                self.program,
                output.status,
                stderr_tail(&stderr)
            )));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            log::debug!("harness: {line}");
        }
        Ok(output.stdout)
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    format!(": {}", lines[start..].join("\n"))
}

/// Builds the harness argument list for `go test`.
pub fn bench_args(config: &RunConfig) -> Vec<String> {
    let mut args = vec![
        "test".to_string(),
        "-benchtime".to_string(),
        config.bench_time.clone(),
        "-bench".to_string(),
        config.bench.clone(),
    ];
    if config.bench_mem {
        args.push("-benchmem".to_string());
    }
    args.extend(config.extra_args.iter().cloned());
    args
}

/// Runs the harness once. No retry: a failed run aborts the comparison.
pub fn run_benchmark<H: Harness + ?Sized>(
    harness: &H,
    args: &[String],
) -> Result<BenchmarkSet, CobError> {
    let output = harness.run(args)?;
    let set = parse_set(output.as_slice())?;
    log::info!("parsed {} benchmarks", set.len());
    Ok(set)
}
