//! Table detection from text positions.
//!
//! Tables are found without ruling lines: spans are grouped into rows by
//! baseline, column edges are the left edges that line up across rows, and
//! runs of aligned rows become a [`RawTable`] grid. Cells with no text are
//! `None`, so sparse rows survive for the serializer to judge.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::spans::TextSpan;
use crate::model::{RawCell, RawTable};

/// Width of the buckets left edges are snapped to.
const EDGE_BUCKET: f32 = 5.0;

/// How far a span may sit from a column edge and still be aligned with it.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Spans sharing a baseline.
#[derive(Debug, Clone)]
struct SpanRow {
    y: f32,
    spans: Vec<TextSpan>,
}

/// Detects tables in the spans of one page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables, top of page first.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<RawTable> {
        let cfg = &self.config;
        if spans.len() < cfg.min_rows * cfg.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < cfg.min_rows {
            return Vec::new();
        }

        let columns = self.detect_columns(&rows);
        log::debug!("{} rows, column edges {:?}", rows.len(), columns);
        if columns.len() < cfg.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < cfg.min_columns {
                continue;
            }
            if region_columns.len() > cfg.max_columns {
                log::debug!(
                    "skipping region: too many columns ({} > {})",
                    region_columns.len(),
                    cfg.max_columns
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("skipping region: list pattern");
                continue;
            }

            tables.push(to_grid(region, &region_columns));
        }
        tables
    }

    /// Group spans into rows, top to bottom, each sorted left to right.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut anchor: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match anchor {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(close_row(std::mem::take(&mut current)));
                    }
                    anchor = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(close_row(current));
        }
        rows
    }

    /// Column edges: snapped left edges seen in enough rows, merged when
    /// closer than the minimum gap.
    ///
    /// Rows with a single span are ignored when enough multi-span rows exist;
    /// otherwise every span counts.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let (counted, once_per_row): (Vec<&SpanRow>, bool) = if multi.len() >= self.config.min_rows {
            (multi, true)
        } else {
            (rows.iter().collect(), false)
        };
        if counted.is_empty() {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &counted {
            let buckets = row.spans.iter().map(|s| (s.x / EDGE_BUCKET).round() as i32);
            if once_per_row {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_hits = ((counted.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);
        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_hits)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Runs of consecutive aligned rows at least `min_rows` long.
    fn find_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }
        regions
    }
}

fn close_row(spans: Vec<TextSpan>) -> SpanRow {
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    SpanRow { y, spans }
}

/// Share of a row's spans that start on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Lay the region's spans out on the column grid.
fn to_grid(rows: &[SpanRow], columns: &[f32]) -> RawTable {
    let right = rows
        .iter()
        .flat_map(|r| r.spans.iter().map(TextSpan::right))
        .fold(f32::MIN, f32::max);

    let mut table = RawTable::new();
    for row in rows {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            let col = column_for(span.x, columns, right);
            cells[col].push(span.text.trim());
        }
        let row: Vec<RawCell> = cells
            .into_iter()
            .map(|parts| {
                let text = parts.join(" ");
                (!text.trim().is_empty()).then_some(text)
            })
            .collect();
        table.push_row(row);
    }
    log::debug!(
        "table {}x{} at y={:.1}",
        table.row_count(),
        table.column_count(),
        rows.first().map(|r| r.y).unwrap_or_default()
    );
    table
}

/// Index of the column a span starting at `x` falls in.
fn column_for(x: f32, columns: &[f32], right: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right + 100.0);
        if x >= start - 10.0 && x < end - 10.0 {
            return i;
        }
    }
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (x - **a)
                .abs()
                .partial_cmp(&(x - **b).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Numbered or bulleted lists split into marker and text spans look like
/// two-column tables.
fn is_list_pattern(rows: &[SpanRow], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        let Some(first) = row.spans.first() else {
            continue;
        };
        let text = first.text.trim();
        if is_bullet_marker(text) {
            bullets += 1;
        } else if is_number_marker(text) {
            numbers += 1;
        }
    }

    let total = rows.len() as f32;
    if bullets as f32 / total >= 0.5 {
        return true;
    }
    // numbered first columns are common in real tables; only reject narrow ones
    columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "※" | "□" | "◆" | "▶" | "➤"
    )
}

/// "1.", "12)", "3", "a.", "B)".
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let digits = cleaned.chars().take_while(char::is_ascii_digit).count();
    let rest = &cleaned[digits..];
    if digits > 0 && (rest == "." || rest == ")") {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, x, y, 12.0)
    }

    fn cells(table: &RawTable, row: usize) -> Vec<Option<&str>> {
        table.rows[row].iter().map(|c| c.as_deref()).collect()
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let rows = detector.group_into_rows(&[
            span("B1", 60.0, 100.0),
            span("A2", 10.0, 85.0),
            span("A1", 10.0, 101.0),
            span("B2", 60.0, 85.0),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A1");
        assert_eq!(rows[1].spans.len(), 2);
    }

    #[test]
    fn test_detect_simple_table() {
        let tables = TableDetector::new().detect(&[
            span("Name", 10.0, 100.0),
            span("Age", 80.0, 100.0),
            span("Alice", 10.0, 85.0),
            span("30", 80.0, 85.0),
            span("Bob", 10.0, 70.0),
            span("25", 80.0, 70.0),
        ]);

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(cells(table, 0), vec![Some("Name"), Some("Age")]);
        assert_eq!(cells(table, 2), vec![Some("Bob"), Some("25")]);
    }

    #[test]
    fn test_missing_cell_is_none() {
        let tables = TableDetector::new().detect(&[
            span("Item", 10.0, 100.0),
            span("Qty", 80.0, 100.0),
            span("Note", 150.0, 100.0),
            span("Pen", 10.0, 85.0),
            span("2", 80.0, 85.0),
            span("Ink", 10.0, 70.0),
            span("5", 80.0, 70.0),
            span("blue", 150.0, 70.0),
        ]);

        assert_eq!(tables.len(), 1);
        assert_eq!(cells(&tables[0], 1), vec![Some("Pen"), Some("2"), None]);
    }

    #[test]
    fn test_single_column_is_not_table() {
        let tables = TableDetector::new().detect(&[
            span("Line 1", 10.0, 100.0),
            span("Line 2", 10.0, 85.0),
            span("Line 3", 10.0, 70.0),
            span("Line 4", 10.0, 55.0),
        ]);
        assert!(tables.is_empty());
    }

    #[test]
    fn test_numbered_list_not_table() {
        let tables = TableDetector::new().detect(&[
            span("1.", 50.0, 400.0),
            span("Setup", 80.0, 400.0),
            span("2.", 50.0, 370.0),
            span("Routing", 80.0, 370.0),
            span("3.", 50.0, 340.0),
            span("Operations", 80.0, 340.0),
        ]);
        assert!(tables.is_empty());
    }

    #[test]
    fn test_bullet_list_not_table() {
        let tables = TableDetector::new().detect(&[
            span("-", 50.0, 400.0),
            span("Management", 80.0, 400.0),
            span("-", 50.0, 370.0),
            span("Firmware", 80.0, 370.0),
        ]);
        assert!(tables.is_empty());
    }

    #[test]
    fn test_markers() {
        assert!(is_number_marker("1."));
        assert!(is_number_marker("12)"));
        assert!(is_number_marker("1 ."));
        assert!(is_number_marker("3"));
        assert!(is_number_marker("a."));
        assert!(is_number_marker("B)"));
        assert!(!is_number_marker("Name"));
        assert!(!is_number_marker(""));
        assert!(is_bullet_marker("•"));
        assert!(is_bullet_marker(" - "));
        assert!(!is_bullet_marker("Alice"));
    }

    #[test]
    fn test_column_for() {
        let columns = [10.0, 80.0, 150.0];
        assert_eq!(column_for(10.0, &columns, 200.0), 0);
        assert_eq!(column_for(82.0, &columns, 200.0), 1);
        assert_eq!(column_for(160.0, &columns, 200.0), 2);
    }
}
