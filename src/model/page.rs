//! Page-level types.

use serde::{Deserialize, Serialize};

use super::RawTable;

/// Text of a page as handed over by the parser.
///
/// Most parsers already produce strings, but text recovered from a content
/// stream without a usable font encoding arrives as bytes and must go
/// through the decode fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawText {
    /// Already-decoded text.
    Text(String),
    /// Undecoded bytes of unknown encoding.
    Bytes(Vec<u8>),
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        RawText::Text(text)
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        RawText::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RawText {
    fn from(bytes: Vec<u8>) -> Self {
        RawText::Bytes(bytes)
    }
}

/// One page of a document before any cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page index (0-based).
    pub index: usize,

    /// Raw page text, if the parser found any.
    pub text: Option<RawText>,

    /// Table grids found on the page, in reading order.
    pub tables: Vec<RawTable>,
}

impl RawPage {
    /// Create an empty page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            text: None,
            tables: Vec::new(),
        }
    }

    /// Set the page text.
    pub fn with_text(mut self, text: impl Into<RawText>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a table.
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Page number as shown in output (1-based).
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
