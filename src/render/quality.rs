//! Content quality gate and result building.

use super::assemble::AssembledContent;
use super::cleanup::sanitize_document;
use super::result::{DebugInfo, ExtractionResult, ResultMetadata, ENCODING_INFO};
use crate::error::{Error, Result};
use crate::model::DocumentInfo;

/// Content shorter than this many characters is treated as no content.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 5;

/// Length of content previews in metadata.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Note attached to metadata when the placeholder is returned.
pub const DEGRADED_NOTE: &str = "scanned PDF or no text content";

/// Thresholds for the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityOptions {
    /// Minimum trimmed character count for real content.
    pub min_content_chars: usize,

    /// Characters kept in previews.
    pub preview_chars: usize,
}

impl QualityOptions {
    /// Default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum content length.
    pub fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    /// Set the preview length.
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Outcome of the substance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The sanitized content is usable.
    Substantive(String),
    /// Nothing usable; the placeholder replaces the content.
    Degraded,
}

/// Decides whether assembled content is real content or a placeholder, and
/// builds the success envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate {
    options: QualityOptions,
}

impl QualityGate {
    /// Gate with the given thresholds.
    pub fn new(options: QualityOptions) -> Self {
        Self { options }
    }

    /// The thresholds in use.
    pub fn options(&self) -> &QualityOptions {
        &self.options
    }

    /// Check sanitized content against the minimum length.
    pub fn judge(&self, sanitized: String) -> Verdict {
        let trimmed = sanitized.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.options.min_content_chars {
            Verdict::Degraded
        } else {
            Verdict::Substantive(sanitized)
        }
    }

    /// Sanitize, judge and wrap the assembled content.
    pub fn build(&self, assembled: &AssembledContent, info: &DocumentInfo) -> Result<ExtractionResult> {
        let raw = assembled.content();
        let sanitized = sanitize_document(&raw);

        let debug_info = DebugInfo {
            raw_content_length: raw.chars().count(),
            cleaned_content_length: sanitized.chars().count(),
            content_preview_raw: preview(&raw, self.options.preview_chars),
            content_preview_cleaned: preview(&sanitized, self.options.preview_chars),
            text_pages: assembled.text_page_count(),
            table_count: assembled.tables().count(),
            dropped_table_rows: assembled.dropped_row_count(),
        };

        let mut metadata = ResultMetadata {
            pages: info.page_count,
            has_text: assembled.has_text,
            has_tables: assembled.has_tables,
            file_size: info.file_size,
            encoding_info: ENCODING_INFO.to_string(),
            debug_info,
            ..Default::default()
        };

        let content = match self.judge(sanitized) {
            Verdict::Substantive(content) => {
                // table-only content still counts as extracted text
                metadata.has_text = true;
                metadata.content_length = Some(content.chars().count());
                metadata.content_preview = Some(preview(&content, self.options.preview_chars));
                content
            }
            Verdict::Degraded => {
                log::info!(
                    "no usable text in {} page(s); returning placeholder",
                    info.page_count
                );
                metadata.has_text = false;
                metadata.note = Some(DEGRADED_NOTE.to_string());
                placeholder(info.page_count)
            }
        };

        ExtractionResult::success(content, metadata)
            .ok_or_else(|| Error::Serialize("empty content in success envelope".to_string()))
    }
}

/// Stand-in content for documents without usable text.
pub fn placeholder(pages: u32) -> String {
    format!(
        "[PDF document] {} page(s); no usable text content could be extracted. \
         It may be a scanned or image-only PDF.",
        pages
    )
}

/// First `chars` characters of `text`.
fn preview(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}
