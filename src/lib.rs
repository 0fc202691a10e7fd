//! Continuous benchmarking for Go projects.
//!
//! cob runs the benchmark suite on the commit before `HEAD` and on `HEAD`,
//! compares time and allocation per operation, and reports a degression when
//! either grows past a threshold.
//!
//! The working tree is hard-reset twice during a run, so it must be clean and
//! no other run may use the same repository concurrently.

pub mod compare;
pub mod config;
pub mod errors;
pub mod gate;
pub mod orchestrator;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod worktree;

pub use crate::compare::{BenchComparison, compare_sets, relative_change};
pub use crate::config::{CommandLineConfig, RunConfig};
pub use crate::errors::CobError;
pub use crate::gate::{BenchGate, GateConfig, GateReport};
pub use crate::parse::{BenchmarkRecord, BenchmarkSet, parse_set, parse_str};
pub use crate::pipeline::{PipelineResult, run_pipeline};
pub use crate::runner::{Harness, SubprocessHarness};
pub use crate::worktree::{GitWorktree, RevisionId, Worktree};
