//! PDF header sniffing.
//!
//! Runs before the document is handed to the parser so that a text file or
//! an HTML error page renamed to `.pdf` fails fast with a clear message.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::error::{Error, Result};

/// Number of leading bytes inspected.
const HEADER_SCAN_LEN: usize = 1024;

static PDF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%PDF-(\d+\.\d+)").expect("valid header pattern"));

/// Version announced by a `%PDF-x.y` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfVersion(pub String);

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.0)
    }
}

/// Read the header of the file at `path` and return its PDF version.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<PdfVersion> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SCAN_LEN);
    file.take(HEADER_SCAN_LEN as u64).read_to_end(&mut head)?;
    sniff_bytes(&head)
}

/// Find a PDF header in the leading bytes of a document.
///
/// Some producers emit a few junk bytes before `%PDF-`; the header is
/// accepted anywhere within the scanned prefix.
pub fn sniff_bytes(data: &[u8]) -> Result<PdfVersion> {
    let head = &data[..data.len().min(HEADER_SCAN_LEN)];
    let caps = PDF_HEADER.captures(head).ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(&caps[1]).to_string();

    if !is_known_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(PdfVersion(version))
}

fn is_known_version(version: &str) -> bool {
    matches!(version.split_once('.'), Some(("1", minor)) if minor.len() == 1)
        || version == "2.0"
}
