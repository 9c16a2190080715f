//! Error types for pdfsift.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised inside the extraction pipeline.
///
/// None of these reach the caller of [`crate::Extractor::extract`] as a
/// panic or an `Err`: the extractor converts them into a failure
/// [`crate::ExtractionResult`].
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not resolve to an existing file.
    #[error("PDF file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not recognize.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document is encrypted and could not be decrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The underlying parser could not open or parse the document.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// Reading a single page failed; the whole extraction is abandoned.
    #[error("Failed to read page {page}: {detail}")]
    PageRead { page: u32, detail: String },

    /// The result envelope could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The entry point was invoked incorrectly.
    #[error("Usage: {0}")]
    Usage(String),
}

/// Coarse classification of an [`Error`], reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document path does not exist.
    NotFound,
    /// The document could not be opened, parsed or iterated.
    Parse,
    /// Bad invocation of the entry point.
    Usage,
    /// Failure after extraction (e.g. serialization).
    Internal,
}

impl ErrorKind {
    /// Stable name used in diagnostic strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Usage => "UsageError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
            Error::Io(_)
            | Error::UnknownFormat
            | Error::UnsupportedVersion(_)
            | Error::Encrypted
            | Error::Parse(_)
            | Error::PageRead { .. } => ErrorKind::Parse,
            Error::Serialize(_) => ErrorKind::Internal,
            Error::Usage(_) => ErrorKind::Usage,
        }
    }

    /// Implementation-level detail, not meant for end users.
    pub fn diagnostic(&self) -> String {
        format!("{}: {:?}", self.kind(), self)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
