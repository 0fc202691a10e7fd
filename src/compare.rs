use serde::Serialize;

use crate::parse::{BenchmarkRecord, BenchmarkSet};

/// Relative change of one benchmark between baseline and candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchComparison {
    pub name: String,
    pub baseline: BenchmarkRecord,
    pub candidate: BenchmarkRecord,
    pub ratio_ns_per_op: f64,
    pub ratio_bytes_per_op: f64,
}

/// `(candidate - baseline) / baseline`, or 0 when the baseline is zero.
pub fn relative_change(baseline: f64, candidate: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    let ratio = (candidate - baseline) / baseline;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Matches benchmarks present in both sets and computes their ratios.
///
/// Only the first sample under each name is compared. The result is sorted
/// by name.
pub fn compare_sets(baseline: &BenchmarkSet, candidate: &BenchmarkSet) -> Vec<BenchComparison> {
    let mut results: Vec<BenchComparison> = candidate
        .names()
        .filter_map(|name| {
            let head = candidate.first(name)?;
            let prev = baseline.first(name)?;
            Some(compare_records(name, prev, head))
        })
        .collect();
    results.sort_by(|a, b| a.name.cmp(&b.name));
    results
}

fn compare_records(
    name: &str,
    baseline: &BenchmarkRecord,
    candidate: &BenchmarkRecord,
) -> BenchComparison {
    let ratio_bytes_per_op = match (baseline.alloced_bytes_per_op, candidate.alloced_bytes_per_op) {
        (Some(prev), Some(head)) => relative_change(prev as f64, head as f64),
        _ => 0.0,
    };
    BenchComparison {
        name: name.to_string(),
        baseline: baseline.clone(),
        candidate: candidate.clone(),
        ratio_ns_per_op: relative_change(baseline.ns_per_op, candidate.ns_per_op),
        ratio_bytes_per_op,
    }
}
