//! Assembly of per-page outputs into one document string.
//!
//! Each raw page is first mapped to an immutable [`PageOutput`]; the
//! [`ContentAssembler`] then folds the outputs in page order. Page text
//! sections come first, followed by a single tables heading and every
//! table block in page order.

use serde::{Deserialize, Serialize};

use super::cleanup::TextNormalizer;
use super::table::{TableBlock, TableSerializer};
use crate::model::RawPage;

/// Heading placed before the table blocks.
pub const TABLES_HEADING: &str = "=== Tables ===";

/// Cleaned content of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOutput {
    /// Page number (1-based).
    pub page: usize,

    /// Normalized text; `None` when the page had no non-blank text.
    pub text: Option<String>,

    /// Serialized tables in page order.
    pub tables: Vec<TableBlock>,
}

impl PageOutput {
    /// Normalize the text and serialize the tables of one raw page.
    pub fn build(raw: &RawPage, normalizer: &TextNormalizer) -> Self {
        let page = raw.number();
        let text = raw
            .text
            .as_ref()
            .map(|text| normalizer.normalize_raw(text))
            .filter(|text| !text.is_empty());

        let serializer = TableSerializer::new(normalizer);
        let tables = raw
            .tables
            .iter()
            .enumerate()
            .map(|(i, table)| serializer.serialize(table, page, i + 1))
            .collect();

        Self { page, text, tables }
    }
}

/// A labeled block of the assembled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    /// Text of one page.
    PageText { page: usize, text: String },
    /// Heading that introduces the table blocks.
    TablesHeading,
    /// One serialized table.
    Table(TableBlock),
}

impl Section {
    /// Render the section as text.
    pub fn to_text(&self) -> String {
        match self {
            Section::PageText { page, text } => format!("=== Page {} ===\n{}", page, text),
            Section::TablesHeading => TABLES_HEADING.to_string(),
            Section::Table(block) => block.to_text(),
        }
    }
}

/// Result of assembling all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContent {
    /// Sections in output order.
    pub sections: Vec<Section>,

    /// At least one page contributed text.
    pub has_text: bool,

    /// At least one table block exists (header-only blocks count).
    pub has_tables: bool,
}

impl AssembledContent {
    /// Newline-joined sections, trimmed.
    pub fn content(&self) -> String {
        self.sections
            .iter()
            .map(Section::to_text)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Number of pages that contributed text.
    pub fn text_page_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s, Section::PageText { .. }))
            .count()
    }

    /// Iterate over the table blocks.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table(block) => Some(block),
            _ => None,
        })
    }

    /// Total number of empty rows dropped across all tables.
    pub fn dropped_row_count(&self) -> usize {
        self.tables().map(TableBlock::dropped_rows).sum()
    }
}

/// Folds page outputs into [`AssembledContent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentAssembler;

impl ContentAssembler {
    /// Create an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Combine page outputs, which must be in page order.
    pub fn assemble<I>(&self, pages: I) -> AssembledContent
    where
        I: IntoIterator<Item = PageOutput>,
    {
        let (text_sections, table_blocks) = pages.into_iter().fold(
            (Vec::new(), Vec::new()),
            |(mut texts, mut tables), output| {
                if let Some(text) = output.text {
                    texts.push(Section::PageText {
                        page: output.page,
                        text,
                    });
                }
                tables.extend(output.tables);
                (texts, tables)
            },
        );

        let has_text = !text_sections.is_empty();
        let has_tables = !table_blocks.is_empty();

        let mut sections = text_sections;
        if has_tables {
            sections.push(Section::TablesHeading);
            sections.extend(table_blocks.into_iter().map(Section::Table));
        }

        log::debug!(
            "assembled {} section(s), has_text={}, has_tables={}",
            sections.len(),
            has_text,
            has_tables
        );

        AssembledContent {
            sections,
            has_text,
            has_tables,
        }
    }
}
