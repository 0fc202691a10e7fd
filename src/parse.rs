//! Parser for Go-style benchmark harness output.
//!
//! A result line looks like
//! `BenchmarkDecode-8   500000   2412 ns/op   768 B/op   12 allocs/op`.
//! Everything else the harness prints (`PASS`, `ok ...`, log lines) is skipped.

use std::io::BufRead;

use ahash::AHashMap;
use serde::Serialize;

use crate::CobError;

const NAME_PREFIX: &str = "Benchmark";

/// One parsed harness line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub name: String,
    pub iterations: u64,
    pub ns_per_op: f64,
    /// Present only when the harness ran with memory statistics.
    pub alloced_bytes_per_op: Option<u64>,
    pub allocs_per_op: Option<u64>,
    pub mb_per_s: Option<f64>,
}

impl BenchmarkRecord {
    pub fn new(name: impl Into<String>, ns_per_op: f64) -> Self {
        Self {
            name: name.into(),
            iterations: 1,
            ns_per_op,
            alloced_bytes_per_op: None,
            allocs_per_op: None,
            mb_per_s: None,
        }
    }

    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.alloced_bytes_per_op = Some(bytes);
        self
    }

    fn apply_measurement(&mut self, value: &str, unit: &str) {
        match unit {
            "ns/op" => {
                if let Ok(v) = value.parse::<f64>() {
                    self.ns_per_op = v;
                }
            }
            "MB/s" => {
                if let Ok(v) = value.parse::<f64>() {
                    self.mb_per_s = Some(v);
                }
            }
            "B/op" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.alloced_bytes_per_op = Some(v);
                }
            }
            "allocs/op" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.allocs_per_op = Some(v);
                }
            }
            _ => {}
        }
    }
}

/// Records of one harness invocation, keyed by benchmark name.
///
/// Samples under a name keep emission order, and names keep the order in
/// which they first appeared.
#[derive(Clone, Debug, Default)]
pub struct BenchmarkSet {
    records: AHashMap<String, Vec<BenchmarkRecord>>,
    order: Vec<String>,
}

impl BenchmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: BenchmarkRecord) {
        match self.records.get_mut(&record.name) {
            Some(samples) => samples.push(record),
            None => {
                self.order.push(record.name.clone());
                self.records.insert(record.name.clone(), vec![record]);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[BenchmarkRecord]> {
        self.records.get(name).map(Vec::as_slice)
    }

    /// First sample for `name`; later duplicates are never compared.
    pub fn first(&self, name: &str) -> Option<&BenchmarkRecord> {
        self.records.get(name).and_then(|samples| samples.first())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<BenchmarkRecord> for BenchmarkSet {
    fn from_iter<I: IntoIterator<Item = BenchmarkRecord>>(iter: I) -> Self {
        let mut set = BenchmarkSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Parses a single line, returning `None` when it is not a benchmark result.
pub fn parse_line(line: &str) -> Option<BenchmarkRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 || !fields[0].starts_with(NAME_PREFIX) {
        return None;
    }
    let iterations = fields[1].parse::<u64>().ok()?;
    let mut record = BenchmarkRecord {
        name: fields[0].to_string(),
        iterations,
        ns_per_op: 0.0,
        alloced_bytes_per_op: None,
        allocs_per_op: None,
        mb_per_s: None,
    };
    for pair in fields[2..].chunks_exact(2) {
        record.apply_measurement(pair[0], pair[1]);
    }
    Some(record)
}

/// Parses harness output, skipping unrelated lines.
///
/// Lines that are not valid UTF-8 are decoded lossily and then skipped like
/// any other noise. Fails only when the reader itself fails.
pub fn parse_set<R: BufRead>(mut reader: R) -> Result<BenchmarkSet, CobError> {
    let mut set = BenchmarkSet::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| CobError::parse(e.to_string()))?;
        if read == 0 {
            break;
        }
        if let Some(record) = parse_line(&String::from_utf8_lossy(&buf)) {
            set.insert(record);
        }
    }
    Ok(set)
}

pub fn parse_str(output: &str) -> Result<BenchmarkSet, CobError> {
    parse_set(output.as_bytes())
}
