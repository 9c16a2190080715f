//! # pdfsift
//!
//! PDF content extraction and normalization for indexing pipelines.
//!
//! Given a PDF path, pdfsift produces one cleaned text artifact with page and
//! table markers, plus metadata describing what was found. Every call yields
//! an [`ExtractionResult`] envelope; documents without usable text get a
//! placeholder instead of an error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{extract_file, render::JsonFormat};
//!
//! let result = extract_file("document.pdf");
//! if result.is_success() {
//!     println!("{}", result.content().unwrap_or_default());
//! }
//! println!("{}", pdfsift::render::to_json(&result, JsonFormat::Pretty).unwrap());
//! ```
//!
//! ## Pipeline
//!
//! - **Page extraction** ([`parser`]): page text and table grids via lopdf
//! - **Normalization** ([`render`]): fallback decoding, control-character
//!   and whitespace cleanup
//! - **Assembly**: `=== Page n ===` sections, then `=== Tables ===`
//! - **Quality gate**: placeholder for scanned or empty documents

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use detect::{sniff_bytes, sniff_path, PdfVersion};
pub use error::{Error, ErrorKind, Result};
pub use model::{DocumentInfo, RawCell, RawPage, RawRow, RawTable, RawText};
pub use parser::{ExtractMode, MemorySource, PageExtractor, PageSource, ParseOptions};
pub use render::{
    CleanupOptions, ExtractionResult, JsonFormat, QualityOptions, ResultMetadata, TextEncoding,
};

use std::path::Path;

use render::{ContentAssembler, PageOutput, QualityGate, TextNormalizer};

/// Extract a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let result = pdfsift::extract_file("report.pdf");
/// assert!(result.is_well_formed());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> ExtractionResult {
    Extractor::new().extract(path)
}

/// Extract a PDF file with a configured extractor.
pub fn extract_file_with_options<P: AsRef<Path>>(path: P, extractor: &Extractor) -> ExtractionResult {
    extractor.extract(path)
}

/// Builder for configuring and running extractions.
///
/// # Example
///
/// ```no_run
/// use pdfsift::Extractor;
///
/// let result = Extractor::new()
///     .text_only()
///     .with_min_content_chars(20)
///     .with_unicode_normalization(true)
///     .extract("scan.pdf");
/// println!("exit code {}", result.exit_code());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    parse: ParseOptions,
    cleanup: CleanupOptions,
    quality: QualityOptions,
}

impl Extractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Replace the cleanup options.
    pub fn with_cleanup_options(mut self, options: CleanupOptions) -> Self {
        self.cleanup = options;
        self
    }

    /// Replace the quality thresholds.
    pub fn with_quality_options(mut self, options: QualityOptions) -> Self {
        self.quality = options;
        self
    }

    /// Skip table detection.
    pub fn text_only(mut self) -> Self {
        self.parse = self.parse.text_only();
        self
    }

    /// Minimum character count for content to count as real text.
    pub fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.quality = self.quality.with_min_content_chars(chars);
        self
    }

    /// Length of the content previews in metadata.
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.quality = self.quality.with_preview_chars(chars);
        self
    }

    /// Apply NFC normalization to cleaned text.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.cleanup = self.cleanup.with_unicode_normalization(enabled);
        self
    }

    /// Encodings tried for undecoded bytes, in order.
    pub fn with_decode_order(mut self, order: impl Into<Vec<TextEncoding>>) -> Self {
        let order = order.into();
        self.parse = self.parse.with_decode_order(order.clone());
        self.cleanup = self.cleanup.with_decode_order(order);
        self
    }

    /// Extract the PDF at `path`.
    ///
    /// Never fails: errors become a failure envelope.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> ExtractionResult {
        let path = path.as_ref();
        let outcome = PageExtractor::open(path, &self.parse).and_then(|pages| self.run(pages));
        self.finish(outcome, &path.display().to_string())
    }

    /// Extract from an arbitrary page source.
    pub fn extract_source<S: PageSource + 'static>(&self, source: S, info: DocumentInfo) -> ExtractionResult {
        let label = info.path.display().to_string();
        let outcome = self.run(PageExtractor::from_source(source, info));
        self.finish(outcome, &label)
    }

    /// Read, clean, assemble and judge. The extractor is dropped once the
    /// pages are read.
    fn run(&self, extractor: PageExtractor) -> Result<ExtractionResult> {
        let (info, pages) = extractor.read_all()?;

        let normalizer = TextNormalizer::new(self.cleanup.clone());
        let outputs = pages.iter().map(|page| PageOutput::build(page, &normalizer));
        let assembled = ContentAssembler::new().assemble(outputs);

        QualityGate::new(self.quality).build(&assembled, &info)
    }

    fn finish(&self, outcome: Result<ExtractionResult>, label: &str) -> ExtractionResult {
        match outcome {
            Ok(result) => result,
            Err(err) => {
                log::warn!("extraction failed for {}: {}", label, err);
                ExtractionResult::failure(err.to_string(), Some(err.diagnostic()))
            }
        }
    }
}
