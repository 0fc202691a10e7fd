use cob::{
    compare::BenchComparison,
    gate::{BenchGate, GateConfig},
    parse::BenchmarkRecord,
    report::{
        JsonSummary, RatioTone, format_ratio, ratio_table, render_report, write_json_summary,
    },
};

fn comparison(name: &str, prev: f64, head: f64, prev_bytes: u64, head_bytes: u64) -> BenchComparison {
    BenchComparison {
        name: name.into(),
        baseline: BenchmarkRecord::new(name, prev).with_bytes(prev_bytes),
        candidate: BenchmarkRecord::new(name, head).with_bytes(head_bytes),
        ratio_ns_per_op: cob::relative_change(prev, head),
        ratio_bytes_per_op: cob::relative_change(prev_bytes as f64, head_bytes as f64),
    }
}

#[test]
fn test_format_ratio_suppresses_noise() {
    assert_eq!(format_ratio(0.00005), "0.00%");
    assert_eq!(format_ratio(-0.00005), "0.00%");
    assert_eq!(format_ratio(0.0), "0.00%");
}

#[test]
fn test_format_ratio_prints_magnitude_only() {
    assert_eq!(format_ratio(-0.25), "25.00%");
    assert_eq!(format_ratio(0.25), "25.00%");
    assert_eq!(format_ratio(1.5), "150.00%");
    assert_eq!(format_ratio(0.12345), "12.35%");
}

#[test]
fn test_ratio_tone() {
    assert_eq!(RatioTone::of(0.25), RatioTone::Degression);
    assert_eq!(RatioTone::of(-0.25), RatioTone::Improvement);
    assert_eq!(RatioTone::of(0.0), RatioTone::Improvement);
}

#[test]
fn test_report_contains_both_tables() {
    let results = vec![
        comparison("BenchmarkA", 100.0, 125.0, 64, 64),
        comparison("BenchmarkB", 200.0, 150.0, 128, 96),
    ];
    let gate = BenchGate::new(GateConfig {
        threshold: 0.1,
        bench_mem: true,
        only_degression: false,
    })
    .evaluate(&results);
    let mut out = Vec::new();
    render_report(&mut out, &results, &gate, true).unwrap();
    let text = String::from_utf8(out).unwrap();

    let result_at = text.find("Result\n======").expect("result title");
    let comparison_at = text.find("Comparison\n==========").expect("comparison title");
    assert!(result_at < comparison_at);

    for header in ["Name", "Commit", "NsPerOp", "AllocedBytesPerOp"] {
        assert!(text[..comparison_at].contains(header), "{header}");
    }
    assert!(text.contains("125.00 ns/op"));
    assert!(text.contains("100.00 ns/op"));
    assert!(text.contains("96 B/op"));
    assert!(text.contains("HEAD@{1}"));
    assert!(text[comparison_at..].contains("25.00%"));
    assert!(text[comparison_at..].contains("0.00%"));
    assert!(!text[comparison_at..].contains('-'));
}

#[test]
fn test_report_without_memstats_has_no_bytes_column() {
    let results = vec![comparison("BenchmarkA", 100.0, 90.0, 0, 0)];
    let gate = BenchGate::new(GateConfig {
        threshold: 0.1,
        bench_mem: false,
        only_degression: true,
    })
    .evaluate(&results);
    let mut out = Vec::new();
    render_report(&mut out, &results, &gate, false).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("AllocedBytesPerOp"));
    let comparison_at = text.find("Comparison").unwrap();
    assert!(!text[comparison_at..].contains("BenchmarkA"));
}

#[test]
fn test_json_summary_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    let results = vec![comparison("BenchmarkA", 100.0, 120.0, 0, 0)];
    let reasons = vec!["BenchmarkA slower".to_string()];
    write_json_summary(
        &path,
        &JsonSummary {
            threshold: 0.1,
            bench_mem: false,
            degression_detected: true,
            reasons: &reasons,
            results: &results,
        },
    )
    .unwrap();
    let value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["degression_detected"], true);
    assert_eq!(value["results"][0]["name"], "BenchmarkA");
    assert_eq!(value["results"][0]["candidate"]["ns_per_op"], 120.0);
}

#[test]
fn test_ratio_cells_are_coloured_by_direction() {
    let results = vec![
        comparison("BenchmarkSlow", 100.0, 125.0, 0, 0),
        comparison("BenchmarkFast", 200.0, 150.0, 0, 0),
    ];
    let mut out = Vec::new();
    ratio_table(&results, false)
        .color(true)
        .render(&mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    let worse = RatioTone::Degression
        .style()
        .apply_to("25.00%")
        .force_styling(true)
        .to_string();
    let better = RatioTone::Improvement
        .style()
        .apply_to("25.00%")
        .force_styling(true)
        .to_string();
    assert_ne!(worse, better);
    assert!(worse.contains("\u{1b}[1m"), "{worse:?}");
    assert!(better.contains("\u{1b}[1m"), "{better:?}");
    assert!(better.contains("\u{1b}[34m"), "{better:?}");
    assert!(!worse.contains("\u{1b}[34m"), "{worse:?}");

    let slow = text.lines().find(|l| l.contains("BenchmarkSlow")).unwrap();
    let fast = text.lines().find(|l| l.contains("BenchmarkFast")).unwrap();
    assert!(slow.contains(&worse), "{slow:?}");
    assert!(fast.contains(&better), "{fast:?}");
    assert!(!slow.contains('-') && !fast.contains('-'));
}
