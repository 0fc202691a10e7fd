//! Runs the benchmark once on `HEAD~1` and once on `HEAD`.
//!
//! The working tree is borrowed for the whole run: after the first reset a
//! restore to the original revision is attempted on every exit path.

use crate::{
    CobError,
    parse::BenchmarkSet,
    runner::{Harness, run_benchmark},
    worktree::{RevisionId, Worktree},
};

pub const BASELINE_REV: &str = "HEAD~1";
pub const BASELINE_LABEL: &str = "HEAD@{1}";
pub const CANDIDATE_LABEL: &str = "HEAD";

#[derive(Clone, Debug)]
pub struct RevisionRuns {
    pub baseline_id: RevisionId,
    pub candidate_id: RevisionId,
    pub baseline: BenchmarkSet,
    pub candidate: BenchmarkSet,
}

pub fn run_revisions<W, H>(
    worktree: &W,
    harness: &H,
    args: &[String],
) -> Result<RevisionRuns, CobError>
where
    W: Worktree + ?Sized,
    H: Harness + ?Sized,
{
    let candidate_id = worktree.head()?;
    let baseline_id = worktree.resolve(BASELINE_REV)?;

    let result: Result<(BenchmarkSet, BenchmarkSet), CobError> = (|| {
        worktree.reset_hard(&baseline_id)?;
        log::info!("Run Benchmark: {baseline_id} {BASELINE_LABEL}");
        let baseline = run_benchmark(harness, args)?;

        worktree.reset_hard(&candidate_id)?;
        log::info!("Run Benchmark: {candidate_id} {CANDIDATE_LABEL}");
        let candidate = run_benchmark(harness, args)?;
        Ok((baseline, candidate))
    })();

    match result {
        Ok((baseline, candidate)) => Ok(RevisionRuns {
            baseline_id,
            candidate_id,
            baseline,
            candidate,
        }),
        Err(err) => {
            restore(worktree, &candidate_id);
            Err(err)
        }
    }
}

// Best effort: the error that triggered the restore is the one reported.
fn restore<W: Worktree + ?Sized>(worktree: &W, original: &RevisionId) {
    match worktree.reset_hard(original) {
        Ok(()) => log::warn!("restored working tree to {original} after failure"),
        Err(err) => log::error!("working tree left away from {original}: {err}"),
    }
}
