//! Cleaning, assembly and result building.
//!
//! Everything here is a pure transformation of the raw pages produced by
//! [`crate::parser`]: decode and normalize text, serialize tables, fold the
//! pages into one document, judge its quality and wrap it in the result
//! envelope.

mod assemble;
mod cleanup;
pub mod decode;
mod json;
mod quality;
mod result;
mod table;

pub use assemble::{AssembledContent, ContentAssembler, PageOutput, Section, TABLES_HEADING};
pub use cleanup::{sanitize_document, CleanupOptions, TextNormalizer};
pub use decode::{ByteDecoder, Decoded, TextEncoding};
pub use json::{to_json, JsonFormat};
pub use quality::{
    placeholder, QualityGate, QualityOptions, Verdict, DEFAULT_MIN_CONTENT_CHARS,
    DEFAULT_PREVIEW_CHARS, DEGRADED_NOTE,
};
pub use result::{DebugInfo, ExtractionResult, ResultMetadata, ENCODING_INFO};
pub use table::{TableBlock, TableSerializer, CELL_SEPARATOR};
