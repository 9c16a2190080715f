//! Table grid types.

use serde::{Deserialize, Serialize};

/// A single table cell; `None` when the parser reports no value.
pub type RawCell = Option<String>;

/// A table row: cells in column order.
pub type RawRow = Vec<RawCell>;

/// An uncleaned table grid, rows in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Rows of the table.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from anything convertible into cell strings.
    ///
    /// ```
    /// use pdfsift::RawTable;
    ///
    /// let table = RawTable::from_rows(vec![
    ///     vec![Some("a"), Some("b")],
    ///     vec![None, None],
    /// ]);
    /// assert_eq!(table.row_count(), 2);
    /// assert_eq!(table.empty_row_count(), 1);
    /// ```
    pub fn from_rows<S: Into<String>>(rows: Vec<Vec<Option<S>>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.map(Into::into)).collect())
                .collect(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    /// Number of rows, empty ones included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of rows whose every cell is missing or blank.
    pub fn empty_row_count(&self) -> usize {
        self.rows.iter().filter(|row| is_empty_row(row)).count()
    }

    /// Check if the table has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A cell is blank when it is missing or holds only whitespace.
pub fn is_blank_cell(cell: &RawCell) -> bool {
    cell.as_deref().map_or(true, |text| text.trim().is_empty())
}

/// A row is empty when every cell is blank (a zero-length row is empty).
pub fn is_empty_row(row: &[RawCell]) -> bool {
    row.iter().all(is_blank_cell)
}
