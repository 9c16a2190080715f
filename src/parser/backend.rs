//! Page source abstraction.
//!
//! A [`PageSource`] hands out raw pages by index and hides the concrete PDF
//! library. [`LopdfSource`] reads real documents; [`MemorySource`] serves
//! pages that are already in memory.

use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use super::options::ParseOptions;
use super::spans::{PageScan, SpanExtractor};
use super::table_detector::TableDetector;
use crate::error::{Error, Result};
use crate::model::{RawPage, RawText};
use crate::render::decode::ByteDecoder;

/// Random access to the raw pages of one document.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Read the page at `index` (0-based).
    ///
    /// An error here is fatal for the whole extraction.
    fn read_page(&self, index: usize) -> Result<RawPage>;
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn read_page(&self, index: usize) -> Result<RawPage> {
        (**self).read_page(index)
    }
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    /// (page number, object id) in page order
    pages: Vec<(u32, ObjectId)>,
    detector: Option<TableDetector>,
    decoder: ByteDecoder,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc, options)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8], options: &ParseOptions) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc, options)
    }

    fn from_document(doc: LopdfDocument, options: &ParseOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages().into_iter().collect();
        let detector = options
            .detect_tables()
            .then(|| TableDetector::with_config(options.table_config.clone()));

        Ok(Self {
            doc,
            pages,
            detector,
            decoder: ByteDecoder::new(options.decode_order.clone()),
        })
    }

    /// Version from the document header as parsed by lopdf.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// lopdf's text for the page, or the scanned strings when lopdf fails
    /// or some strings had no usable font encoding. Decoding problems never
    /// fail the page.
    fn page_text(&self, number: u32, scan: &PageScan) -> Option<RawText> {
        let text = match self.doc.extract_text(&[number]) {
            Ok(text) if scan.byte_decoded == 0 => RawText::Text(text),
            Ok(_) => {
                log::info!(
                    "page {}: {} string(s) without a usable font encoding, using byte fallback",
                    number,
                    scan.byte_decoded
                );
                scan.text()
            }
            Err(e) => {
                log::info!("page {}: text extraction failed ({}), using scanned strings", number, e);
                scan.text()
            }
        };
        let blank = match &text {
            RawText::Text(text) => text.trim().is_empty(),
            RawText::Bytes(bytes) => bytes.iter().all(u8::is_ascii_whitespace),
        };
        (!blank).then_some(text)
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn read_page(&self, index: usize) -> Result<RawPage> {
        let &(number, id) = self.pages.get(index).ok_or_else(|| Error::PageRead {
            page: index as u32 + 1,
            detail: format!("document has {} page(s)", self.pages.len()),
        })?;
        let page_err = |e: Error| Error::PageRead {
            page: number,
            detail: e.to_string(),
        };

        let scan = SpanExtractor::new(&self.doc, &self.decoder)
            .scan_page(id)
            .map_err(page_err)?;

        let mut page = RawPage::new(index);
        page.text = self.page_text(number, &scan);
        if let Some(detector) = &self.detector {
            page.tables = detector.detect(&scan.spans);
        }

        log::debug!(
            "page {}: text {}, {} table(s)",
            number,
            if page.text.is_some() { "found" } else { "absent" },
            page.tables.len()
        );
        Ok(page)
    }
}

/// [`PageSource`] over pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<RawPage>,
}

impl MemorySource {
    /// Serve the given pages. Page indices are reassigned by position.
    pub fn new(pages: Vec<RawPage>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| RawPage { index, ..page })
            .collect();
        Self { pages }
    }
}

impl From<Vec<RawPage>> for MemorySource {
    fn from(pages: Vec<RawPage>) -> Self {
        Self::new(pages)
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn read_page(&self, index: usize) -> Result<RawPage> {
        self.pages.get(index).cloned().ok_or_else(|| Error::PageRead {
            page: index as u32 + 1,
            detail: "page index out of range".to_string(),
        })
    }
}
