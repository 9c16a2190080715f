//! Document-level types.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Facts about the input document gathered when it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Path the document was opened from.
    pub path: PathBuf,

    /// File size in bytes.
    pub file_size: u64,

    /// Number of pages reported by the parser.
    pub page_count: u32,

    /// Version from the `%PDF-x.y` header, when known.
    pub pdf_version: Option<String>,
}

impl DocumentInfo {
    /// Stat the file at `path`.
    ///
    /// Fails with [`Error::NotFound`] when the path does not resolve to an
    /// existing regular file. The page count is filled in once the document
    /// has been parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let meta = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(Error::NotFound(path.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_size: meta.len(),
            page_count: 0,
            pdf_version: None,
        })
    }

    /// Info for a document that did not come from the filesystem.
    pub fn in_memory(page_count: u32, file_size: u64) -> Self {
        Self {
            path: PathBuf::new(),
            file_size,
            page_count,
            pdf_version: None,
        }
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    /// Set the header version.
    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = Some(version.into());
        self
    }
}
