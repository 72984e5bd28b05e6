//! PDF export of the summary text via `printpdf`.
//!
//! Uses the built-in Helvetica faces, which only cover Latin-1. Text is folded
//! into that range before layout instead of failing the export.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::RenderError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(20.0);
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 6.0;
/// Usable line length between the 20 mm side margins
const TEXT_WIDTH_MM: f32 = 170.0;
const PT_TO_MM: f32 = 25.4 / 72.0;

pub const TITLE: &str = "AVS Summary";

/// Render summary text into a PDF. Returns PDF bytes.
pub fn summary_pdf(text: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) = PdfDocument::new(TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Font(e.to_string()))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: TOP,
        pages: 1,
    };

    writer.line(TITLE, TITLE_SIZE, &bold);
    writer.advance(LINE_HEIGHT);

    for paragraph in to_latin1(text).lines() {
        if paragraph.trim().is_empty() {
            writer.advance(LINE_HEIGHT);
            continue;
        }
        for line in wrap_text(paragraph, line_budget(BODY_SIZE)) {
            writer.line(&line, BODY_SIZE, &font);
        }
    }

    tracing::debug!(pages = writer.pages, "Rendered summary PDF");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| RenderError::Save(e.to_string()))
}

/// Tracks the cursor and starts a new page when the bottom margin is reached
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
            self.pages += 1;
        }
        self.layer.use_text(text, size, MARGIN_LEFT, Mm(self.y), font);
        self.advance(LINE_HEIGHT);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }
}

/// Line length in glyph units (1/1000 em) for text set at `size` points.
fn line_budget(size: f32) -> u32 {
    (TEXT_WIDTH_MM / (size * PT_TO_MM) * 1000.0) as u32
}

/// Helvetica advance width in 1/1000 em, from the standard AFM metrics.
/// Latin-1 letters outside ASCII get a wide estimate.
fn glyph_width(c: char) -> u32 {
    match c {
        'i' | 'j' | 'l' => 222,
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | '\\' | ']' | 'I' | 'f' | 't' => 278,
        '\'' => 191,
        '|' => 260,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '{' | '}' => 334,
        '"' => 355,
        '*' => 389,
        '^' => 469,
        'J' => 500,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        '+' | '<' | '=' | '>' | '~' => 584,
        'F' | 'T' | 'Z' => 611,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'G' | 'O' | 'Q' => 778,
        'M' | 'm' => 833,
        '%' => 889,
        'W' => 944,
        '@' => 1015,
        'L' => 556,
        c if c.is_ascii() => 556,
        '\u{00C6}' => 1000,
        _ => 778,
    }
}

fn text_width(text: &str) -> u32 {
    text.chars().map(glyph_width).sum()
}

/// Split a word so the head fits in `budget`, keeping at least one character.
fn split_at_width(word: &str, budget: u32) -> (&str, &str) {
    let mut width = 0;
    for (i, c) in word.char_indices() {
        width += glyph_width(c);
        if width > budget {
            let at = if i == 0 { c.len_utf8() } else { i };
            return word.split_at(at);
        }
    }
    (word, "")
}

/// Greedy word wrap on measured glyph width. Words wider than a line are split.
pub fn wrap_text(text: &str, budget: u32) -> Vec<String> {
    let space = glyph_width(' ');
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        while text_width(word) > budget {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let (head, rest) = split_at_width(word, budget);
            lines.push(head.to_string());
            word = rest;
        }

        let word_width = text_width(word);
        if !current.is_empty() && current_width + space + word_width > budget {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += space;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Fold text into Latin-1: typographic punctuation becomes ASCII, anything
/// else outside the range becomes `?`.
pub fn to_latin1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' | '\u{201B}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2022}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
