//! Opening a document and reading its pages.

use std::path::Path;

use super::backend::{LopdfSource, PageSource};
use super::options::ParseOptions;
use crate::detect::sniff_path;
use crate::error::Result;
use crate::model::{DocumentInfo, RawPage};

/// An opened document ready to be read page by page.
///
/// The extractor owns the parsed document. Reading consumes it, so the
/// underlying file handle and buffers are released as soon as the pages
/// have been read, whether or not reading succeeded.
pub struct PageExtractor {
    source: Box<dyn PageSource>,
    info: DocumentInfo,
}

impl PageExtractor {
    /// Open the PDF at `path`.
    ///
    /// Fails with `NotFound` before anything else when the path does not
    /// exist, then with a format error when the file is not a PDF.
    pub fn open<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let info = DocumentInfo::from_path(path)?;
        let version = sniff_path(path)?;

        let source = LopdfSource::load_file(path, options)?;
        log::debug!(
            "opened {} ({}, parser reports {}, {} page(s))",
            path.display(),
            version,
            source.version(),
            source.page_count()
        );

        let info = info
            .with_page_count(source.page_count() as u32)
            .with_pdf_version(version.0);
        Ok(Self {
            source: Box::new(source),
            info,
        })
    }

    /// Wrap an existing page source.
    pub fn from_source<S: PageSource + 'static>(source: S, info: DocumentInfo) -> Self {
        let info = info.with_page_count(source.page_count() as u32);
        Self {
            source: Box::new(source),
            info,
        }
    }

    /// Facts gathered while opening.
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }

    /// Read every page in order.
    ///
    /// The first page that cannot be read aborts the whole read.
    pub fn read_all(self) -> Result<(DocumentInfo, Vec<RawPage>)> {
        let pages = (0..self.source.page_count())
            .map(|index| self.source.read_page(index))
            .collect::<Result<Vec<_>>>()?;
        Ok((self.info, pages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::backend::MemorySource;
    use std::io::Write;

    #[test]
    fn test_open_missing_file() {
        let result = PageExtractor::open("/no/such/dir/report.pdf", &ParseOptions::default());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_open_non_pdf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "<html>not a pdf</html>").unwrap();

        let result = PageExtractor::open(file.path(), &ParseOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_from_source_sets_page_count() {
        let source = MemorySource::new(vec![RawPage::new(0), RawPage::new(1)]);
        let extractor = PageExtractor::from_source(source, DocumentInfo::in_memory(0, 10));
        assert_eq!(extractor.info().page_count, 2);

        let (info, pages) = extractor.read_all().unwrap();
        assert_eq!(info.file_size, 10);
        assert_eq!(pages.len(), 2);
    }
}
