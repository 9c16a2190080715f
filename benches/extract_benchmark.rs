//! Benchmarks for pdfsift extraction stages.
//!
//! Run with: cargo bench
//!
//! Pages are synthetic and held in memory, so the numbers cover cleanup,
//! table detection and assembly rather than disk I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfsift::parser::{TableDetector, TextSpan};
use pdfsift::render::TextNormalizer;
use pdfsift::{sniff_bytes, DocumentInfo, Extractor, MemorySource, RawPage, RawTable};

fn sample_page(index: usize) -> RawPage {
    let text = format!(
        "  Page {} of the quarterly report.\x00Revenue grew\n\n\tacross all regions.  \u{FEFF}",
        index + 1
    )
    .repeat(20);
    let table = RawTable::from_rows(vec![
        vec![Some("Region"), Some("Q1"), Some("Q2")],
        vec![None, None, None],
        vec![Some("North"), Some("120"), Some("135")],
        vec![Some("South"), Some(" 98 "), None],
    ]);
    RawPage::new(index).with_text(text).with_table(table)
}

fn grid_spans(rows: usize) -> Vec<TextSpan> {
    (0..rows)
        .flat_map(|r| {
            let y = 700.0 - r as f32 * 15.0;
            vec![
                TextSpan::new(format!("Item {}", r), 72.0, y, 10.0),
                TextSpan::new(format!("{}", r * 7), 200.0, y, 10.0),
                TextSpan::new("ok", 300.0, y, 10.0),
            ]
        })
        .collect()
}

/// Benchmark PDF header sniffing.
fn bench_sniff(c: &mut Criterion) {
    let header = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n".to_vec();
    let not_pdf = b"<html><body>Not a PDF file at all</body></html>".to_vec();

    c.bench_function("sniff_valid_pdf", |b| {
        b.iter(|| sniff_bytes(black_box(&header)).is_ok());
    });
    c.bench_function("sniff_non_pdf", |b| {
        b.iter(|| sniff_bytes(black_box(&not_pdf)).is_err());
    });
}

/// Benchmark single-unit normalization.
fn bench_normalize(c: &mut Criterion) {
    let normalizer = TextNormalizer::default();
    let text = "  Hello\x00World\n\n\t multiple   spaces \u{FEFF} here ".repeat(100);
    let gbk: Vec<u8> = [0xD6, 0xD0, 0xCE, 0xC4, 0x20].repeat(200);

    c.bench_function("normalize_text", |b| {
        b.iter(|| normalizer.normalize(black_box(&text)));
    });
    c.bench_function("normalize_gbk_bytes", |b| {
        b.iter(|| normalizer.normalize_bytes(black_box(&gbk)));
    });
}

/// Benchmark table detection on aligned spans.
fn bench_table_detection(c: &mut Criterion) {
    let detector = TableDetector::new();
    let spans = grid_spans(40);

    c.bench_function("detect_table_40_rows", |b| {
        b.iter(|| detector.detect(black_box(&spans)));
    });
}

/// Benchmark the full pipeline over in-memory pages.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let extractor = Extractor::new();

    for page_count in [1, 10, 50] {
        let pages: Vec<RawPage> = (0..page_count).map(sample_page).collect();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                let source = MemorySource::new(black_box(pages.clone()));
                extractor.extract_source(source, DocumentInfo::in_memory(0, 0))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sniff,
    bench_normalize,
    bench_table_detection,
    bench_pipeline,
);
criterion_main!(benches);
