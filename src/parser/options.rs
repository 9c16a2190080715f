//! Parsing options and configuration.

use super::table_detector::TableDetectorConfig;
use crate::render::decode::{TextEncoding, DEFAULT_DECODE_ORDER};

/// Options for reading pages out of a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// What to extract from each page
    pub extract_mode: ExtractMode,

    /// Table detection tuning
    pub table_config: TableDetectorConfig,

    /// Encodings tried for content-stream strings without a font encoding
    pub decode_order: Vec<TextEncoding>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extract mode.
    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Extract text only, skipping table detection.
    pub fn text_only(mut self) -> Self {
        self.extract_mode = ExtractMode::TextOnly;
        self
    }

    /// Set table detection tuning.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Replace the decode attempt order.
    pub fn with_decode_order(mut self, order: impl Into<Vec<TextEncoding>>) -> Self {
        self.decode_order = order.into();
        self
    }

    /// Whether tables should be detected.
    pub fn detect_tables(&self) -> bool {
        self.extract_mode == ExtractMode::TextAndTables
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_mode: ExtractMode::TextAndTables,
            table_config: TableDetectorConfig::default(),
            decode_order: DEFAULT_DECODE_ORDER.to_vec(),
        }
    }
}

/// What content to extract from each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Page text and detected tables
    #[default]
    TextAndTables,
    /// Page text only
    TextOnly,
}
