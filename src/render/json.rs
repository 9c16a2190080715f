//! JSON serialization of the result envelope.

use crate::error::Result;
use crate::render::result::ExtractionResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a result envelope.
///
/// Non-ASCII characters are written literally, never as `\u` escapes.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result)?,
        JsonFormat::Compact => serde_json::to_string(result)?,
    };
    Ok(json)
}
