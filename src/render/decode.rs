//! Byte-to-text decoding with an ordered encoding fallback.
//!
//! Text pulled out of PDFs without a usable font encoding is frequently in a
//! legacy CJK code page. Each candidate encoding is tried strictly (no
//! replacement characters) in priority order; the first clean decode wins.
//! When every candidate rejects the input, a lossy UTF-8 decode that drops
//! the undecodable sequences guarantees a result.

use std::borrow::Cow;

use encoding_rs::{Encoding, GBK};

/// A candidate encoding for raw text bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8
    Utf8,
    /// GBK (simplified Chinese, superset of GB2312)
    Gbk,
    /// GB2312 (EUC-CN)
    Gb2312,
    /// ISO-8859-1; maps every byte, so it never fails
    Latin1,
}

/// Default attempt order.
pub const DEFAULT_DECODE_ORDER: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Gbk,
    TextEncoding::Gb2312,
    TextEncoding::Latin1,
];

/// Outcome of a single decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The bytes were valid in `encoding`.
    Text {
        text: String,
        encoding: TextEncoding,
    },
    /// The bytes are not valid in the attempted encoding.
    Failed,
}

impl TextEncoding {
    /// Label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Gbk => "gbk",
            TextEncoding::Gb2312 => "gb2312",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Strictly decode `bytes`; any malformed sequence fails the attempt.
    pub fn decode(self, bytes: &[u8]) -> Decoded {
        let text = match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Gbk => decode_strict(GBK, bytes),
            TextEncoding::Gb2312 => {
                if is_euc_cn(bytes) {
                    decode_strict(GBK, bytes)
                } else {
                    None
                }
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        };

        match text {
            Some(text) => Decoded::Text {
                text,
                encoding: self,
            },
            None => Decoded::Failed,
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// GB2312 is the two-byte EUC-CN subset of GBK: lead and trail bytes both
/// in 0xA1..=0xFE, lead at most 0xF7.
fn is_euc_cn(bytes: &[u8]) -> bool {
    let mut iter = bytes.iter();
    while let Some(&b) = iter.next() {
        if b < 0x80 {
            continue;
        }
        if !(0xA1..=0xF7).contains(&b) {
            return false;
        }
        match iter.next() {
            Some(&trail) if (0xA1..=0xFE).contains(&trail) => {}
            _ => return false,
        }
    }
    true
}

/// Ordered list of decode attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteDecoder {
    order: Vec<TextEncoding>,
}

impl ByteDecoder {
    /// Decoder trying `order` front to back.
    pub fn new(order: impl Into<Vec<TextEncoding>>) -> Self {
        Self {
            order: order.into(),
        }
    }

    /// The attempt order.
    pub fn order(&self) -> &[TextEncoding] {
        &self.order
    }

    /// Try every encoding in order and return the first clean decode.
    pub fn try_decode(&self, bytes: &[u8]) -> Decoded {
        self.order
            .iter()
            .map(|encoding| encoding.decode(bytes))
            .find(|decoded| matches!(decoded, Decoded::Text { .. }))
            .unwrap_or(Decoded::Failed)
    }

    /// Decode `bytes`, never failing.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self.try_decode(bytes) {
            Decoded::Text { text, encoding } => {
                if encoding != TextEncoding::Utf8 {
                    log::info!(
                        "decoded {} bytes as {} after utf-8 failed",
                        bytes.len(),
                        encoding.label()
                    );
                }
                text
            }
            Decoded::Failed => {
                log::info!(
                    "no encoding accepted {} bytes; dropping undecodable sequences",
                    bytes.len()
                );
                decode_lossy(bytes)
            }
        }
    }
}

impl Default for ByteDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_DECODE_ORDER)
    }
}

/// UTF-8 decode that removes invalid sequences instead of substituting them.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise the ordered fallback.
pub fn decode_pdf_string(bytes: &[u8], decoder: &ByteDecoder) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return char::decode_utf16(units)
            .filter_map(|unit| unit.ok())
            .collect();
    }
    decoder.decode(bytes)
}
