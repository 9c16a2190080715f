//! Positioned text spans from a page content stream.
//!
//! Only what table detection and the text fallback need is tracked: where
//! each shown string starts, its effective font size, and an estimate of its
//! width.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::RawText;
use crate::render::decode::{decode_pdf_string, ByteDecoder};

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustment (thousandths of an em) treated as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baseline shift, as a fraction of the font size, that starts a new line.
const LINE_BREAK_RATIO: f32 = 0.5;

/// Horizontal gap, as a fraction of the font size, that separates words.
const WORD_GAP_RATIO: f32 = 0.15;

/// A run of text with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating its width from the character count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * AVG_GLYPH_WIDTH;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Everything one walk over a page content stream produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageScan {
    /// Shown strings in content-stream order.
    pub spans: Vec<TextSpan>,
    /// Strings decoded by their font encoding or a UTF-16 marker.
    pub font_decoded: usize,
    /// Strings whose font or encoding was unusable, decoded by the byte
    /// fallback instead.
    pub byte_decoded: usize,
    /// Undecoded bytes of each span, parallel to `spans`.
    raw: Vec<Vec<u8>>,
}

impl PageScan {
    /// Page text rebuilt from the spans in content-stream order.
    ///
    /// When no string could be decoded through a font, the raw bytes are
    /// joined and handed over undecoded, so the byte fallback sees the whole
    /// page at once.
    pub fn text(&self) -> RawText {
        let separators = separators(&self.spans);
        if self.font_decoded == 0 && self.byte_decoded > 0 {
            let mut bytes = Vec::new();
            for (sep, raw) in separators.iter().zip(&self.raw) {
                if let Some(sep) = sep {
                    bytes.push(*sep as u8);
                }
                bytes.extend_from_slice(raw);
            }
            return RawText::Bytes(bytes);
        }

        let mut text = String::new();
        for (sep, span) in separators.iter().zip(&self.spans) {
            if let Some(sep) = sep {
                text.push(*sep);
            }
            text.push_str(&span.text);
        }
        RawText::Text(text)
    }
}

/// Separator placed before each span: a newline when the baseline moves, a
/// space across a word-sized gap.
fn separators(spans: &[TextSpan]) -> Vec<Option<char>> {
    let mut out = Vec::with_capacity(spans.len());
    let mut prev: Option<&TextSpan> = None;
    for span in spans {
        let sep = prev.and_then(|p| {
            let size = p.font_size.max(span.font_size);
            if (span.y - p.y).abs() > size * LINE_BREAK_RATIO {
                Some('\n')
            } else if span.x - p.right() > size * WORD_GAP_RATIO {
                Some(' ')
            } else {
                None
            }
        });
        out.push(sep);
        prev = Some(span);
    }
    out
}

/// Walks page content streams and collects [`TextSpan`]s.
pub struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
    decoder: &'a ByteDecoder,
}

impl<'a> SpanExtractor<'a> {
    /// Create an extractor over a loaded document.
    pub fn new(doc: &'a LopdfDocument, decoder: &'a ByteDecoder) -> Self {
        Self { doc, decoder }
    }

    /// Walk one page. Unresolvable fonts are not an error: their strings go
    /// through the byte fallback.
    pub fn scan_page(&self, page_id: ObjectId) -> Result<PageScan> {
        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(PageScan::default());
        }

        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_else(|e| {
            log::info!("page fonts unavailable ({}), decoding strings by bytes", e);
            BTreeMap::new()
        });
        let content = lopdf::content::Content::decode(&content)?;
        let mut walker = Walker::new(Some(self.doc), &fonts, self.decoder);
        for op in &content.operations {
            walker.apply(&op.operator, &op.operands);
        }
        Ok(walker.scan)
    }

    /// Decompressed content stream bytes. A page without `/Contents` is
    /// blank, not broken.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page = self.doc.get_dictionary(page_id)?;
        let contents = match page.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<ObjectId> = match contents {
            Object::Reference(r) => vec![*r],
            Object::Array(items) => items.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => return Err(Error::Parse("invalid /Contents entry".to_string())),
        };

        let mut data = Vec::new();
        for r in refs {
            match self.doc.get_object(r)? {
                Object::Stream(stream) => {
                    let bytes = stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone());
                    data.extend_from_slice(&bytes);
                    data.push(b'\n');
                }
                _ => return Err(Error::Parse("content reference is not a stream".to_string())),
            }
        }
        Ok(data)
    }
}

/// Text state while interpreting operators.
struct Walker<'e> {
    doc: Option<&'e LopdfDocument>,
    fonts: &'e BTreeMap<Vec<u8>, &'e Dictionary>,
    decoder: &'e ByteDecoder,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
    line_start: TextMatrix,
    in_text: bool,
    scan: PageScan,
}

impl<'e> Walker<'e> {
    fn new(
        doc: Option<&'e LopdfDocument>,
        fonts: &'e BTreeMap<Vec<u8>, &'e Dictionary>,
        decoder: &'e ByteDecoder,
    ) -> Self {
        Self {
            doc,
            fonts,
            decoder,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            matrix: TextMatrix::default(),
            line_start: TextMatrix::default(),
            in_text: false,
            scan: PageScan::default(),
        }
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "BT" => {
                self.in_text = true;
                self.matrix = TextMatrix::default();
                self.line_start = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands {
                    self.font = name.clone();
                    self.font_size = number(size).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.leading = leading;
                }
            }
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    let (tx, ty) = (number(tx).unwrap_or(0.0), number(ty).unwrap_or(0.0));
                    if operator == "TD" {
                        self.leading = -ty;
                    }
                    self.line_start.translate(tx, ty);
                    self.matrix = self.line_start;
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let v: Vec<f32> = operands.iter().take(6).map(|o| number(o).unwrap_or(0.0)).collect();
                    self.line_start = TextMatrix {
                        a: v[0],
                        b: v[1],
                        c: v[2],
                        d: v[3],
                        e: v[4],
                        f: v[5],
                    };
                    self.matrix = self.line_start;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let (text, raw, via_font) = self.decode_array(items);
                    self.push(text, raw, via_font);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.line_start.translate(0.0, -leading);
        self.matrix = self.line_start;
    }

    fn show(&mut self, bytes: &[u8]) {
        let (text, via_font) = self.decode(bytes);
        self.push(text, bytes.to_vec(), via_font);
    }

    /// Decode with the current font's encoding, falling back to the byte
    /// decoder when the font or its encoding is unavailable. The flag is
    /// false when the encoding had to be guessed.
    fn decode(&self, bytes: &[u8]) -> (String, bool) {
        let via_font = self
            .doc
            .zip(self.fonts.get(&self.font))
            .and_then(|(doc, font)| {
                let encoding = font.get_font_encoding(doc).ok()?;
                LopdfDocument::decode_text(&encoding, bytes).ok()
            });
        match via_font {
            Some(text) => (text, true),
            // a UTF-16 marker leaves nothing to guess
            None => (decode_pdf_string(bytes, self.decoder), bytes.starts_with(&[0xFE, 0xFF])),
        }
    }

    fn decode_array(&self, items: &[Object]) -> (String, Vec<u8>, bool) {
        let mut combined = String::new();
        let mut raw = Vec::new();
        let mut all_via_font = true;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let (text, via_font) = self.decode(bytes);
                    combined.push_str(&text);
                    raw.extend_from_slice(bytes);
                    all_via_font &= via_font;
                }
                other => {
                    let gap = number(other).map(|n| -n).unwrap_or(0.0);
                    if gap > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                        raw.push(b' ');
                    }
                }
            }
        }
        (combined, raw, all_via_font)
    }

    fn push(&mut self, text: String, raw: Vec<u8>, via_font: bool) {
        if !self.in_text || text.trim().is_empty() {
            return;
        }
        let size = self.font_size * self.matrix.scale();
        // advance in text space so consecutive Tj calls on one line do not
        // stack up; the matrix carries any horizontal scaling
        let advance = text.chars().count() as f32 * self.font_size * AVG_GLYPH_WIDTH;
        let span = TextSpan::new(text, self.matrix.e, self.matrix.f, size);
        self.matrix.translate(advance, 0.0);

        if via_font {
            self.scan.font_decoded += 1;
        } else {
            self.scan.byte_decoded += 1;
        }
        self.scan.spans.push(span);
        self.scan.raw.push(raw);
    }
}

/// Text matrix, tracking translation and scale.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Scripts written without spaces between words (Han, kana).
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0x20000..=0x2EBEF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(ops: Vec<(&str, Vec<Object>)>) -> PageScan {
        let fonts = BTreeMap::new();
        let decoder = ByteDecoder::default();
        let mut walker = Walker::new(None, &fonts, &decoder);
        for (op, operands) in ops {
            walker.apply(op, &operands);
        }
        walker.scan
    }

    fn walk(ops: Vec<(&str, Vec<Object>)>) -> Vec<TextSpan> {
        scan(ops).spans
    }

    fn int(n: i64) -> Object {
        Object::Integer(n)
    }

    fn string(text: &str) -> Object {
        Object::string_literal(text)
    }

    #[test]
    fn test_span_width_estimate() {
        let span = TextSpan::new("abcd", 10.0, 100.0, 10.0);
        assert_eq!(span.width, 20.0);
        assert_eq!(span.right(), 30.0);
    }

    #[test]
    fn test_positions_follow_td() {
        let spans = walk(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F1".to_vec()), int(12)]),
            ("Td", vec![int(72), int(700)]),
            ("Tj", vec![string("Name")]),
            ("Td", vec![int(0), int(-15)]),
            ("Tj", vec![string("Alice")]),
            ("ET", vec![]),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert_eq!((spans[1].x, spans[1].y), (72.0, 685.0));
        assert_eq!(spans[1].font_size, 12.0);
    }

    #[test]
    fn test_tm_sets_absolute_position() {
        let spans = walk(vec![
            ("BT", vec![]),
            (
                "Tm",
                vec![int(1), int(0), int(0), int(1), int(200), int(500)],
            ),
            ("Tj", vec![string("x")]),
            ("ET", vec![]),
        ]);
        assert_eq!((spans[0].x, spans[0].y), (200.0, 500.0));
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let spans = walk(vec![("Tj", vec![string("stray")])]);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_tj_array_gap_becomes_space() {
        let spans = walk(vec![
            ("BT", vec![]),
            (
                "TJ",
                vec![Object::Array(vec![string("Hello"), int(-300), string("World")])],
            ),
            ("ET", vec![]),
        ]);
        assert_eq!(spans[0].text, "Hello World");
    }

    #[test]
    fn test_t_star_uses_leading() {
        let spans = walk(vec![
            ("BT", vec![]),
            ("TL", vec![int(20)]),
            ("Td", vec![int(0), int(100)]),
            ("Tj", vec![string("a")]),
            ("T*", vec![]),
            ("Tj", vec![string("b")]),
            ("ET", vec![]),
        ]);
        assert_eq!(spans[1].y, 80.0);
        assert_eq!(spans[1].x, 0.0);
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('か'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }

    #[test]
    fn test_advance_follows_horizontal_scale() {
        let spans = walk(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            (
                "Tm",
                vec![int(3), int(0), int(0), int(1), int(100), int(500)],
            ),
            ("Tj", vec![string("ab")]),
            ("Tj", vec![string("c")]),
            ("ET", vec![]),
        ]);
        // "ab" is 2 * 10 * 0.5 = 10 units wide in text space, 30 on the page
        assert_eq!(spans[1].x, 130.0);
        assert_eq!(spans[1].y, 500.0);
    }

    #[test]
    fn test_scan_text_breaks_lines_and_words() {
        let result = scan(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            ("Td", vec![int(72), int(700)]),
            ("Tj", vec![string("Hello")]),
            ("Tj", vec![string("World")]),
            ("Td", vec![int(0), int(-14)]),
            ("Tj", vec![string("Name")]),
            ("ET", vec![]),
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F1".to_vec()), int(10)]),
            ("Td", vec![int(200), int(686)]),
            ("Tj", vec![string("Age")]),
            ("ET", vec![]),
        ]);
        assert_eq!(
            result.text(),
            RawText::Text("HelloWorld\nName Age".to_string())
        );
    }

    #[test]
    fn test_unresolved_font_hands_over_bytes() {
        // "中文" in GBK, shown with a font the page does not define
        let gbk = vec![0xD6, 0xD0, 0xCE, 0xC4];
        let result = scan(vec![
            ("BT", vec![]),
            ("Tf", vec![Object::Name(b"F9".to_vec()), int(12)]),
            ("Td", vec![int(72), int(700)]),
            ("Tj", vec![Object::String(gbk.clone(), lopdf::StringFormat::Hexadecimal)]),
            ("ET", vec![]),
        ]);
        assert_eq!(result.byte_decoded, 1);
        assert_eq!(result.font_decoded, 0);
        assert_eq!(result.spans[0].text, "中文");
        assert_eq!(result.text(), RawText::Bytes(gbk));
    }

    #[test]
    fn test_utf16_strings_stay_text() {
        let result = scan(vec![
            ("BT", vec![]),
            (
                "Tj",
                vec![Object::String(
                    vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69],
                    lopdf::StringFormat::Hexadecimal,
                )],
            ),
            ("ET", vec![]),
        ]);
        assert_eq!(result.font_decoded, 1);
        assert_eq!(result.text(), RawText::Text("Hi".to_string()));
    }

    #[test]
    fn test_empty_scan_has_no_text() {
        let result = scan(vec![]);
        assert_eq!(result.text(), RawText::Text(String::new()));
    }
}
