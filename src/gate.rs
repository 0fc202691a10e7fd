use serde::Serialize;

use crate::{compare::BenchComparison, config::RunConfig};

#[derive(Clone, Debug, PartialEq)]
pub struct GateConfig {
    pub threshold: f64,
    /// Also treat a `B/op` increase above the threshold as a degression.
    pub bench_mem: bool,
    pub only_degression: bool,
}

impl From<&RunConfig> for GateConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            threshold: config.threshold,
            bench_mem: config.bench_mem,
            only_degression: config.only_degression,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GateReport {
    /// Rows to show in the comparison table.
    pub rows: Vec<BenchComparison>,
    pub degression_detected: bool,
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct BenchGate {
    config: GateConfig,
}

impl BenchGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Raw ratios are compared; display rounding never hides a degression.
    pub fn is_degression(&self, result: &BenchComparison) -> bool {
        result.ratio_ns_per_op > self.config.threshold
            || (self.config.bench_mem && result.ratio_bytes_per_op > self.config.threshold)
    }

    pub fn evaluate(&self, results: &[BenchComparison]) -> GateReport {
        let mut rows = Vec::with_capacity(results.len());
        let mut reasons = Vec::new();
        for result in results {
            let degraded = self.is_degression(result);
            if degraded {
                reasons.push(self.reason(result));
            } else if self.config.only_degression {
                continue;
            }
            rows.push(result.clone());
        }
        GateReport {
            rows,
            degression_detected: !reasons.is_empty(),
            reasons,
        }
    }

    fn reason(&self, result: &BenchComparison) -> String {
        let mut reason = format!(
            "{} ns/op {:+.2}% (threshold {:.2}%)",
            result.name,
            result.ratio_ns_per_op * 100.0,
            self.config.threshold * 100.0
        );
        if self.config.bench_mem {
            reason.push_str(&format!(
                ", B/op {:+.2}%",
                result.ratio_bytes_per_op * 100.0
            ));
        }
        reason
    }
}
