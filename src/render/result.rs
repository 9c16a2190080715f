//! The extraction result envelope.

use serde::{Deserialize, Serialize};

/// Constant reported in `metadata.encoding_info`.
pub const ENCODING_INFO: &str = "UTF-8 processed";

/// Counters describing how the content was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Characters in the assembled content before sanitization.
    pub raw_content_length: usize,

    /// Characters after sanitization.
    pub cleaned_content_length: usize,

    /// Leading characters of the assembled content.
    pub content_preview_raw: String,

    /// Leading characters of the sanitized content.
    pub content_preview_cleaned: String,

    /// Pages that contributed text.
    pub text_pages: usize,

    /// Table blocks produced.
    pub table_count: usize,

    /// Empty table rows dropped during serialization.
    pub dropped_table_rows: usize,
}

/// Metadata attached to a successful result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Page count.
    pub pages: u32,

    /// Usable content was extracted, from page text or tables.
    pub has_text: bool,

    /// At least one table was found.
    pub has_tables: bool,

    /// Input file size in bytes.
    pub file_size: u64,

    /// Encoding note for consumers.
    pub encoding_info: String,

    /// Present when the content is the placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Character count of the final content (substantive results only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,

    /// Leading characters of the final content (substantive results only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,

    /// Diagnostic counters.
    #[serde(default)]
    pub debug_info: DebugInfo,
}

/// The structured object returned from every extraction.
///
/// Constructed only through [`ExtractionResult::success`] and
/// [`ExtractionResult::failure`]: a success always carries non-empty
/// content and metadata; a failure never carries content and always carries
/// an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<ResultMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnostic: Option<String>,
}

impl ExtractionResult {
    /// Successful result. Returns `None` if `content` is empty, which would
    /// break the envelope invariant.
    pub fn success(content: String, metadata: ResultMetadata) -> Option<Self> {
        if content.is_empty() {
            return None;
        }
        Some(Self {
            success: true,
            content: Some(content),
            metadata: Some(metadata),
            error: None,
            diagnostic: None,
        })
    }

    /// Failed result.
    pub fn failure(error: impl Into<String>, diagnostic: Option<String>) -> Self {
        Self {
            success: false,
            content: None,
            metadata: None,
            error: Some(error.into()),
            diagnostic,
        }
    }

    /// Whether extraction succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Final content (success only).
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Metadata (success only).
    pub fn metadata(&self) -> Option<&ResultMetadata> {
        self.metadata.as_ref()
    }

    /// Human-readable error (failure only).
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Implementation-level failure detail.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }

    /// Check the envelope invariant. Always true for values built through
    /// the constructors; useful after deserializing foreign input.
    pub fn is_well_formed(&self) -> bool {
        if self.success {
            let has_content = self.content.as_deref().is_some_and(|c| !c.is_empty());
            let accounted = self
                .metadata
                .as_ref()
                .is_some_and(|m| m.has_text || m.note.is_some());
            has_content && accounted && self.error.is_none()
        } else {
            self.content.is_none() && self.error.is_some()
        }
    }
}
