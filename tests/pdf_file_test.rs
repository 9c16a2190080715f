//! Integration tests against real PDF files generated with lopdf.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use tempfile::TempDir;

use pdfsift::{extract_file, Extractor};

/// One page: `None` leaves out `/Contents` entirely.
type PageOps = Option<Vec<Operation>>;

// "中文测试文" in GBK
const GBK_SAMPLE: &[u8] = &[0xD6, 0xD0, 0xCE, 0xC4, 0xB2, 0xE2, 0xCA, 0xD4, 0xCE, 0xC4];

fn helvetica() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    }
}

/// Composite font using a CMap lopdf cannot decode.
fn gbk_type0_font() -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "STSong-Light",
        "Encoding" => "GBK-EUC-H",
        "DescendantFonts" => vec![Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType0",
            "BaseFont" => "STSong-Light",
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("GB1"),
                "Supplement" => 2_i64,
            },
        })],
    }
}

fn write_pdf(dir: &Path, name: &str, pages: Vec<PageOps>) -> PathBuf {
    write_pdf_with_font(dir, name, helvetica(), pages)
}

/// Build a PDF whose only font resource is `F1`.
fn write_pdf_with_font(dir: &Path, name: &str, font: Dictionary, pages: Vec<PageOps>) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for ops in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        if let Some(operations) = ops {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Show `text` at an absolute position.
fn text_at(text: &str, x: i64, y: i64) -> Vec<Operation> {
    show_at("F1", Object::string_literal(text), x, y)
}

/// Show a string object with the named font resource.
fn show_at(font: &str, string: Object, x: i64, y: i64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![string]),
        Operation::new("ET", vec![]),
    ]
}

fn table_page() -> Vec<Operation> {
    let cells = [
        ("Name", 72, 700),
        ("Age", 200, 700),
        ("Alice", 72, 685),
        ("30", 200, 685),
        ("Bob", 72, 670),
        ("25", 200, 670),
    ];
    cells
        .iter()
        .flat_map(|&(text, x, y)| text_at(text, x, y))
        .collect()
}

#[test]
fn test_text_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(
        dir.path(),
        "text.pdf",
        vec![Some(text_at("Hello World from pdfsift", 72, 700))],
    );

    let result = extract_file(&path);
    assert!(result.is_success(), "{:?}", result.error());
    let content = result.content().unwrap();
    assert!(content.starts_with("=== Page 1 ==="));
    assert!(content.contains("Hello World from pdfsift"));

    let meta = result.metadata().unwrap();
    assert_eq!(meta.pages, 1);
    assert!(meta.has_text);
    assert_eq!(meta.file_size, fs::metadata(&path).unwrap().len());
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_pages_without_content_get_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "blank.pdf", vec![None, None, None]);

    let result = extract_file(&path);
    assert!(result.is_success(), "{:?}", result.error());
    assert!(result.content().unwrap().contains("3 page(s)"));

    let meta = result.metadata().unwrap();
    assert_eq!(meta.pages, 3);
    assert!(!meta.has_text);
    assert!(meta.note.is_some());
}

#[test]
fn test_multi_page_order() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(
        dir.path(),
        "pages.pdf",
        vec![
            Some(text_at("First page body", 72, 700)),
            None,
            Some(text_at("Third page body", 72, 700)),
        ],
    );

    let result = Extractor::new().text_only().extract(&path);
    let content = result.content().unwrap();
    let first = content.find("=== Page 1 ===").unwrap();
    let third = content.find("=== Page 3 ===").unwrap();
    assert!(first < third);
    assert!(!content.contains("=== Page 2 ==="));
    assert_eq!(result.metadata().unwrap().debug_info.text_pages, 2);
}

#[test]
fn test_aligned_text_becomes_table() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "table.pdf", vec![Some(table_page())]);

    let result = extract_file(&path);
    let content = result.content().unwrap();
    let meta = result.metadata().unwrap();

    assert!(meta.has_tables);
    assert!(content.contains("=== Tables ==="));
    assert!(content.contains("=== Page 1 Table 1 ==="));
    assert!(content.contains("Name | Age"));
    assert!(content.contains("Bob | 25"));
}

#[test]
fn test_text_only_skips_tables() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "table.pdf", vec![Some(table_page())]);

    let result = Extractor::new().text_only().extract(&path);
    let meta = result.metadata().unwrap();
    assert!(!meta.has_tables);
    assert!(!result.content().unwrap().contains("=== Tables ==="));
}

#[test]
fn test_undecodable_cmap_falls_back_to_gbk() {
    let dir = TempDir::new().unwrap();
    let string = Object::String(GBK_SAMPLE.to_vec(), StringFormat::Hexadecimal);
    let path = write_pdf_with_font(
        dir.path(),
        "gbk.pdf",
        gbk_type0_font(),
        vec![Some(show_at("F1", string, 72, 700))],
    );

    for extractor in [Extractor::new().text_only(), Extractor::new()] {
        let result = extractor.extract(&path);
        assert!(result.is_success(), "{:?}", result.error());
        assert!(result.content().unwrap().contains("中文测试文"));
        let meta = result.metadata().unwrap();
        assert!(meta.has_text);
        assert!(meta.note.is_none());
    }
}

#[test]
fn test_font_missing_from_resources_keeps_text() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(
        dir.path(),
        "missing_font.pdf",
        vec![Some(show_at(
            "F9",
            Object::string_literal("Hello missing font"),
            72,
            700,
        ))],
    );

    let result = extract_file(&path);
    assert!(result.is_success(), "{:?}", result.error());
    assert!(result.content().unwrap().contains("Hello missing font"));
    assert!(result.metadata().unwrap().has_text);
}

#[test]
fn test_mixed_fonts_keep_every_string() {
    let dir = TempDir::new().unwrap();
    let mut ops = text_at("Known font line", 72, 700);
    ops.extend(show_at("F9", Object::string_literal("Unknown font line"), 72, 680));
    let path = write_pdf(dir.path(), "mixed.pdf", vec![Some(ops)]);

    let content = extract_file(&path).content().unwrap().to_string();
    let known = content.find("Known font line").unwrap();
    let unknown = content.find("Unknown font line").unwrap();
    assert!(known < unknown);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = extract_file(dir.path().join("missing.pdf"));

    assert!(!result.is_success());
    assert!(result.content().is_none());
    assert!(result.error().unwrap().contains("does not exist"));
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_not_a_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.pdf");
    fs::write(&path, "just some plain text, renamed").unwrap();

    let result = extract_file(&path);
    assert!(!result.is_success());
    assert!(result.diagnostic().unwrap().starts_with("ParseError"));
}

#[test]
fn test_truncated_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    fs::write(&path, "%PDF-1.4\n1 0 obj\n<< /Type /Catalog").unwrap();

    let result = extract_file(&path);
    assert!(!result.is_success());
    assert!(result.error().is_some());
    assert!(result.diagnostic().unwrap().starts_with("ParseError"));
    assert!(result.is_well_formed());
}
