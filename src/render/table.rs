//! Table serialization into delimited text blocks.

use serde::{Deserialize, Serialize};

use super::cleanup::TextNormalizer;
use crate::model::{is_empty_row, RawTable};

/// Separator placed between cells of a serialized row.
pub const CELL_SEPARATOR: &str = " | ";

/// A serialized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Page the table was found on (1-based).
    pub page: usize,

    /// Position of the table on its page (1-based).
    pub ordinal: usize,

    /// Serialized non-empty rows, in source order.
    pub rows: Vec<String>,

    /// Number of rows in the raw grid.
    pub raw_row_count: usize,
}

impl TableBlock {
    /// Header line identifying the table.
    pub fn header(&self) -> String {
        format!("=== Page {} Table {} ===", self.page, self.ordinal)
    }

    /// Number of rows dropped because they were empty.
    pub fn dropped_rows(&self) -> usize {
        self.raw_row_count - self.rows.len()
    }

    /// True when every raw row was empty.
    pub fn is_header_only(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header line followed by one line per row.
    pub fn to_text(&self) -> String {
        let mut out = self.header();
        for row in &self.rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }
}

/// Turns raw table grids into [`TableBlock`]s.
#[derive(Debug, Clone, Copy)]
pub struct TableSerializer<'a> {
    normalizer: &'a TextNormalizer,
}

impl<'a> TableSerializer<'a> {
    /// Serializer that cleans cells with `normalizer`.
    pub fn new(normalizer: &'a TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Serialize one table found on page `page` (1-based) at position
    /// `ordinal` (1-based).
    ///
    /// Rows whose cells are all missing or blank are dropped. Missing cells
    /// in kept rows become empty strings so column positions survive.
    pub fn serialize(&self, table: &RawTable, page: usize, ordinal: usize) -> TableBlock {
        let rows: Vec<String> = table
            .rows
            .iter()
            .filter(|row| !is_empty_row(row))
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.as_deref()
                            .map(|text| self.normalizer.normalize(text))
                            .unwrap_or_default()
                    })
                    .collect::<Vec<_>>()
                    .join(CELL_SEPARATOR)
            })
            .collect();

        let block = TableBlock {
            page,
            ordinal,
            rows,
            raw_row_count: table.row_count(),
        };

        if block.dropped_rows() > 0 {
            log::debug!(
                "page {} table {}: dropped {} empty row(s)",
                page,
                ordinal,
                block.dropped_rows()
            );
        }

        block
    }
}
