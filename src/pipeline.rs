use std::io::Write;

use crate::{
    CobError,
    compare::{BenchComparison, compare_sets},
    config::RunConfig,
    gate::{BenchGate, GateConfig, GateReport},
    orchestrator::run_revisions,
    report::{JsonSummary, render_report, write_json_summary},
    runner::{Harness, bench_args},
    worktree::Worktree,
};

#[derive(Clone, Debug)]
pub struct PipelineResult {
    pub comparisons: Vec<BenchComparison>,
    pub gate: GateReport,
}

impl PipelineResult {
    pub fn degression_detected(&self) -> bool {
        self.gate.degression_detected
    }
}

/// Benchmarks both revisions, compares them, renders the report and applies
/// the gate.
pub fn run_pipeline<W, H, O>(
    worktree: &W,
    harness: &H,
    config: &RunConfig,
    out: &mut O,
) -> Result<PipelineResult, CobError>
where
    W: Worktree + ?Sized,
    H: Harness + ?Sized,
    O: Write,
{
    let args = bench_args(config);
    let runs = run_revisions(worktree, harness, &args)?;
    let comparisons = compare_sets(&runs.baseline, &runs.candidate);
    log::info!(
        "compared {} benchmarks ({} baseline, {} candidate)",
        comparisons.len(),
        runs.baseline.len(),
        runs.candidate.len()
    );

    let gate = BenchGate::new(GateConfig::from(config)).evaluate(&comparisons);
    render_report(out, &comparisons, &gate, config.bench_mem)?;

    if let Some(path) = &config.json {
        write_json_summary(
            path,
            &JsonSummary {
                threshold: config.threshold,
                bench_mem: config.bench_mem,
                degression_detected: gate.degression_detected,
                reasons: &gate.reasons,
                results: &comparisons,
            },
        )?;
    }
    for reason in &gate.reasons {
        log::warn!("degression: {reason}");
    }
    Ok(PipelineResult { comparisons, gate })
}
