//! Console report: raw measurements and the ratio summary.

use std::{
    ffi::OsStr,
    fs,
    io::{self, Write},
    path::Path,
};

use console::Style;
use serde::Serialize;

use crate::{
    CobError,
    compare::BenchComparison,
    gate::GateReport,
    orchestrator::{BASELINE_LABEL, CANDIDATE_LABEL},
    parse::BenchmarkRecord,
};

/// Ratios closer to zero than this are shown as `0.00%`.
pub const DISPLAY_EPSILON: f64 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioTone {
    Degression,
    Improvement,
}

impl RatioTone {
    pub fn of(ratio: f64) -> Self {
        if ratio > 0.0 {
            RatioTone::Degression
        } else {
            RatioTone::Improvement
        }
    }

    pub fn style(self) -> Style {
        match self {
            RatioTone::Degression => Style::new().bold().red().bright(),
            RatioTone::Improvement => Style::new().bold().blue(),
        }
    }
}

/// Colour is on unless `NO_COLOR` is set, whether or not stdout is a terminal.
pub fn color_default(no_color: Option<&OsStr>) -> bool {
    no_color.is_none()
}

/// Magnitude of `ratio` as a percentage; direction is carried by colour only.
pub fn format_ratio(ratio: f64) -> String {
    let shown = if ratio.abs() < DISPLAY_EPSILON { 0.0 } else { ratio };
    format!("{:.2}%", shown.abs() * 100.0)
}

#[derive(Clone, Debug)]
pub struct Cell {
    text: String,
    style: Option<Style>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }

    fn width(&self) -> usize {
        console::measure_text_width(&self.text)
    }
}

/// Box-drawn table with centred cells and a rule between rows.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    column_widths: Vec<usize>,
    merge_first_column: bool,
    use_color: bool,
}

impl TableBuilder {
    pub fn new(headers: Vec<String>) -> Self {
        let use_color = color_default(std::env::var_os("NO_COLOR").as_deref());
        let column_widths = headers.iter().map(|h| console::measure_text_width(h)).collect();
        Self {
            headers,
            rows: Vec::new(),
            column_widths,
            merge_first_column: false,
            use_color,
        }
    }

    /// Blank out a first-column cell that repeats the row above.
    pub fn merge_first_column(mut self, merge: bool) -> Self {
        self.merge_first_column = merge;
        self
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.use_color = enabled;
        self
    }

    pub fn add_row(&mut self, mut row: Vec<Cell>) {
        if self.merge_first_column {
            let repeated = match (self.last_named_row(), row.first()) {
                (Some(prev), Some(cell)) => prev == cell.text,
                _ => false,
            };
            if repeated {
                row[0].text.clear();
            }
        }
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = self.column_widths.get_mut(i) {
                *width = (*width).max(cell.width());
            }
        }
        self.rows.push(row);
    }

    fn last_named_row(&self) -> Option<&str> {
        self.rows
            .iter()
            .rev()
            .filter_map(|row| row.first())
            .map(|cell| cell.text.as_str())
            .find(|text| !text.is_empty())
    }

    pub fn render<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_border(writer, '┌', '┬', '┐', false)?;
        let headers: Vec<Cell> = self.headers.iter().map(Cell::plain).collect();
        self.write_row(writer, &headers)?;
        self.write_border(writer, '├', '┼', '┤', false)?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                let merged = self.merge_first_column
                    && row.first().is_some_and(|cell| cell.text.is_empty());
                self.write_border(writer, '├', '┼', '┤', merged)?;
            }
            self.write_row(writer, row)?;
        }
        self.write_border(writer, '└', '┴', '┘', false)
    }

    fn write_border<W: Write>(
        &self,
        writer: &mut W,
        left: char,
        mid: char,
        right: char,
        open_first: bool,
    ) -> io::Result<()> {
        for (i, width) in self.column_widths.iter().enumerate() {
            let fill = if i == 0 && open_first { " " } else { "─" };
            let lead = match (i, open_first) {
                (0, true) => '│',
                (0, false) => left,
                (1, true) => '├',
                _ => mid,
            };
            write!(writer, "{lead}{}", fill.repeat(width + 2))?;
        }
        writeln!(writer, "{right}")
    }

    fn write_row<W: Write>(&self, writer: &mut W, row: &[Cell]) -> io::Result<()> {
        for (i, width) in self.column_widths.iter().enumerate() {
            let empty = Cell::plain("");
            let cell = row.get(i).unwrap_or(&empty);
            let gap = width.saturating_sub(cell.width());
            let left = gap / 2;
            let right = gap - left;
            let text = match (&cell.style, self.use_color) {
                (Some(style), true) => style.apply_to(&cell.text).force_styling(true).to_string(),
                _ => cell.text.clone(),
            };
            write!(
                writer,
                "│ {}{}{} ",
                " ".repeat(left),
                text,
                " ".repeat(right)
            )?;
        }
        writeln!(writer, "│")
    }
}

fn measurement_row(label: &str, record: &BenchmarkRecord, bench_mem: bool) -> Vec<Cell> {
    let mut row = vec![
        Cell::plain(record.name.as_str()),
        Cell::plain(label),
        Cell::plain(format!("{:.2} ns/op", record.ns_per_op)),
    ];
    if bench_mem {
        let bytes = record.alloced_bytes_per_op.unwrap_or(0);
        row.push(Cell::plain(format!("{bytes} B/op")));
    }
    row
}

pub fn results_table(results: &[BenchComparison], bench_mem: bool) -> TableBuilder {
    let mut headers = vec!["Name".to_string(), "Commit".to_string(), "NsPerOp".to_string()];
    if bench_mem {
        headers.push("AllocedBytesPerOp".to_string());
    }
    let mut table = TableBuilder::new(headers).merge_first_column(true);
    for result in results {
        table.add_row(measurement_row(CANDIDATE_LABEL, &result.candidate, bench_mem));
        table.add_row(measurement_row(BASELINE_LABEL, &result.baseline, bench_mem));
    }
    table
}

fn ratio_cell(ratio: f64) -> Cell {
    Cell::styled(format_ratio(ratio), RatioTone::of(ratio).style())
}

pub fn ratio_table(rows: &[BenchComparison], bench_mem: bool) -> TableBuilder {
    let mut headers = vec!["Name".to_string(), "NsPerOp".to_string()];
    if bench_mem {
        headers.push("AllocedBytesPerOp".to_string());
    }
    let mut table = TableBuilder::new(headers);
    for result in rows {
        let mut row = vec![
            Cell::plain(result.name.as_str()),
            ratio_cell(result.ratio_ns_per_op),
        ];
        if bench_mem {
            row.push(ratio_cell(result.ratio_bytes_per_op));
        }
        table.add_row(row);
    }
    table
}

fn write_title<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    writeln!(writer, "\n{title}")?;
    writeln!(writer, "{}\n", "=".repeat(title.len()))
}

/// Writes the raw table, then the comparison table for the gate's rows.
pub fn render_report<W: Write>(
    writer: &mut W,
    results: &[BenchComparison],
    gate: &GateReport,
    bench_mem: bool,
) -> Result<(), CobError> {
    let render = |writer: &mut W| -> io::Result<()> {
        write_title(writer, "Result")?;
        results_table(results, bench_mem).render(writer)?;
        write_title(writer, "Comparison")?;
        ratio_table(&gate.rows, bench_mem).render(writer)?;
        writeln!(writer)
    };
    render(writer).map_err(|e| CobError::report(e.to_string()))
}

#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub threshold: f64,
    pub bench_mem: bool,
    pub degression_detected: bool,
    pub reasons: &'a [String],
    pub results: &'a [BenchComparison],
}

pub fn write_json_summary(path: &Path, summary: &JsonSummary<'_>) -> Result<(), CobError> {
    let data =
        serde_json::to_vec_pretty(summary).map_err(|e| CobError::report(e.to_string()))?;
    fs::write(path, data).map_err(|e| CobError::report(format!("{}: {e}", path.display())))
}
