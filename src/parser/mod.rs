//! PDF parsing module.
//!
//! Opens documents and turns each page into a [`crate::model::RawPage`]:
//! page text as the parser reports it plus table grids recovered from text
//! positions.

mod backend;
mod options;
mod page_extractor;
mod spans;
mod table_detector;

pub use backend::{LopdfSource, MemorySource, PageSource};
pub use options::{ExtractMode, ParseOptions};
pub use page_extractor::PageExtractor;
pub use spans::{PageScan, SpanExtractor, TextSpan};
pub use table_detector::{TableDetector, TableDetectorConfig};
