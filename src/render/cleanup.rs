//! Text cleanup: per-unit normalization and document-level sanitization.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::decode::{ByteDecoder, TextEncoding, DEFAULT_DECODE_ORDER};
use crate::model::RawText;

/// Runs of whitespace or control characters (NUL included).
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{Cc}]+").expect("valid separator pattern"));

const BOM: char = '\u{FEFF}';

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Apply Unicode NFC normalization after whitespace collapsing.
    pub normalize_unicode: bool,

    /// Encodings tried, in order, for byte input.
    pub decode_order: Vec<TextEncoding>,
}

impl CleanupOptions {
    /// Default options: no NFC, UTF-8 → GBK → GB2312 → Latin-1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Replace the decode attempt order.
    pub fn with_decode_order(mut self, order: impl Into<Vec<TextEncoding>>) -> Self {
        self.decode_order = order.into();
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: false,
            decode_order: DEFAULT_DECODE_ORDER.to_vec(),
        }
    }
}

/// Cleans single units of text (a page body or a table cell).
///
/// Output contains no NUL, no byte-order mark, no control characters and
/// no whitespace run longer than one space, and is trimmed. Normalizing
/// already-normalized text returns it unchanged.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    options: CleanupOptions,
    decoder: ByteDecoder,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        let decoder = ByteDecoder::new(options.decode_order.clone());
        Self { options, decoder }
    }

    /// The decoder used for byte input.
    pub fn decoder(&self) -> &ByteDecoder {
        &self.decoder
    }

    /// Normalize raw text of either shape.
    pub fn normalize_raw(&self, raw: &RawText) -> String {
        match raw {
            RawText::Text(text) => self.normalize(text),
            RawText::Bytes(bytes) => self.normalize_bytes(bytes),
        }
    }

    /// Decode bytes with the fallback chain, then normalize.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> String {
        self.normalize(&self.decoder.decode(bytes))
    }

    /// Normalize a string.
    ///
    /// NUL and other control characters act as word separators; a NUL
    /// between two words leaves a single space.
    ///
    /// ```
    /// use pdfsift::render::TextNormalizer;
    ///
    /// let normalizer = TextNormalizer::default();
    /// assert_eq!(normalizer.normalize("  Hello\x00World\n\n"), "Hello World");
    /// ```
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let without_bom: String = text.chars().filter(|&c| c != BOM).collect();
        let collapsed = SEPARATOR_RUN.replace_all(&without_bom, " ");
        let trimmed = collapsed.trim();

        if self.options.normalize_unicode {
            trimmed.nfc().collect()
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

/// Document-level sanitization of the assembled content.
///
/// Drops every character below U+0020 except newline and tab, trims each
/// line, and removes blank lines.
pub fn sanitize_document(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let kept: String = content
        .chars()
        .filter(|&c| c >= ' ' || c == '\n' || c == '\t')
        .collect();

    kept.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
