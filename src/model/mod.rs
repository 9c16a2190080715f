//! Data types shared by the extraction stages.
//!
//! These are the raw, uncleaned shapes produced by the page extractor and
//! consumed by the normalization and assembly stages in [`crate::render`].

mod document;
mod page;
mod table;

pub use document::DocumentInfo;
pub use page::{RawPage, RawText};
pub use table::{is_blank_cell, is_empty_row, RawCell, RawRow, RawTable};
