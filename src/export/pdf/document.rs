//! Minimal PDF 1.4 writer
//!
//! Drawing calls are buffered as content-stream operators per page and only
//! serialized, with a computed cross-reference table, by
//! [`PdfDocument::finish`]. Coordinates are top-left based like a screen;
//! they are flipped into PDF's bottom-left space on the way in. Text uses the
//! fourteen standard fonts, so nothing is embedded.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::error::{TallyError, TallyResult};
use crate::export::theme::Font;

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
}

impl PaperSize {
    pub const A3: PaperSize = PaperSize::new("A3", 841.89, 1190.55);
    pub const A4: PaperSize = PaperSize::new("A4", 595.28, 841.89);
    pub const A5: PaperSize = PaperSize::new("A5", 419.53, 595.28);
    pub const LETTER: PaperSize = PaperSize::new("Letter", 612.0, 792.0);
    pub const LEGAL: PaperSize = PaperSize::new("Legal", 612.0, 1008.0);

    const fn new(name: &'static str, width: f32, height: f32) -> Self {
        Self {
            name,
            width,
            height,
        }
    }

    pub fn all() -> &'static [PaperSize] {
        &[Self::A3, Self::A4, Self::A5, Self::LETTER, Self::LEGAL]
    }

    /// Case-insensitive lookup; unknown names are a validation error
    pub fn parse(name: &str) -> TallyResult<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known: Vec<_> = Self::all().iter().map(|p| p.name).collect();
                TallyError::Validation(format!(
                    "Unknown paper size '{}' (expected one of: {})",
                    name,
                    known.join(", ")
                ))
            })
    }
}

/// RGB color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    /// Parse `#RRGGBB`; anything else is black
    pub fn hex(value: &str) -> Self {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Self::BLACK;
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .map(|v| f32::from(v) / 255.0)
        };
        match (channel(0), channel(2), channel(4)) {
            (Some(r), Some(g), Some(b)) => Rgb(r, g, b),
            _ => Self::BLACK,
        }
    }
}

/// Horizontal placement of text inside a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Document information dictionary
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

pub struct PdfDocument {
    paper: PaperSize,
    info: DocumentInfo,
    pages: Vec<String>,
}

impl PdfDocument {
    /// Start a document with one empty page
    pub fn new(paper: PaperSize, info: DocumentInfo) -> Self {
        Self {
            paper,
            info,
            pages: vec![String::new()],
        }
    }

    pub fn width(&self) -> f32 {
        self.paper.width
    }

    pub fn height(&self) -> f32 {
        self.paper.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(String::new());
    }

    fn current(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Filled rectangle with its top-left corner at (`x`, `y`)
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let bottom = self.paper.height - y - height;
        let ops = self.current();
        let _ = writeln!(
            ops,
            "{:.3} {:.3} {:.3} rg {:.2} {:.2} {:.2} {:.2} re f",
            color.0, color.1, color.2, x, bottom, width, height
        );
    }

    /// Text whose top edge sits at `y`, cut to fit `width` points
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        width: f32,
        style: (Font, f32, Rgb),
        align: Align,
    ) {
        let (font, size, color) = style;
        let fitted = fit_to_width(text, font, size, width);
        let left = match align {
            Align::Left => x,
            Align::Right => x + width - text_width(&fitted, font, size),
        };
        let baseline = self.paper.height - y - size * 0.75;
        let encoded = encode_text(&fitted);

        let ops = self.current();
        let _ = writeln!(
            ops,
            "BT /{} {:.1} Tf {:.3} {:.3} {:.3} rg {:.2} {:.2} Td ({}) Tj ET",
            font_resource(font),
            size,
            color.0,
            color.1,
            color.2,
            left,
            baseline,
            encoded
        );
    }

    /// Serialize every page into a complete PDF file
    pub fn finish(self) -> Vec<u8> {
        let fonts = Font::all();
        let first_page_obj = 4 + fonts.len();
        let page_ids: Vec<usize> = (0..self.pages.len())
            .map(|i| first_page_obj + i * 2)
            .collect();

        let mut objects: Vec<String> = Vec::new();

        // 1: catalog, 2: page tree, 3: info
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        ));
        objects.push(format!(
            "<< /Title ({}) /Author ({}) /Subject ({}) /Producer (tallybook) /CreationDate (D:{}Z) >>",
            encode_text(&self.info.title),
            encode_text(&self.info.author),
            encode_text(&self.info.subject),
            self.info.created_at.format("%Y%m%d%H%M%S")
        ));

        for font in fonts {
            objects.push(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_name()
            ));
        }

        let font_refs: Vec<String> = fonts
            .iter()
            .enumerate()
            .map(|(i, font)| format!("/{} {} 0 R", font_resource(*font), 4 + i))
            .collect();
        let resources = format!("<< /Font << {} >> >>", font_refs.join(" "));

        for (page_id, content) in page_ids.iter().zip(&self.pages) {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources {} /Contents {} 0 R >>",
                self.paper.width,
                self.paper.height,
                resources,
                page_id + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ));
        }

        let mut out: Vec<u8> = Vec::with_capacity(objects.iter().map(String::len).sum::<usize>() + 512);
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
        Font::Courier => "F3",
        Font::CourierBold => "F4",
    }
}

/// Approximate advance width in points
///
/// Courier is monospaced at 600/1000 em; Helvetica is estimated per
/// character class.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: f32 = match font {
        Font::Courier | Font::CourierBold => text.chars().count() as f32 * 600.0,
        Font::Helvetica | Font::HelveticaBold => text
            .chars()
            .map(|c| match c {
                'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 278.0,
                ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '-' | '/' => 333.0,
                'm' | 'w' | 'M' | 'W' => 833.0,
                c if c.is_ascii_uppercase() => 667.0,
                _ => 556.0,
            })
            .sum(),
    };
    let bold = matches!(font, Font::HelveticaBold);
    units * size / 1000.0 * if bold { 1.05 } else { 1.0 }
}

/// Shorten `text` with a trailing "..." until it fits `width`
fn fit_to_width(text: &str, font: Font, size: f32, width: f32) -> String {
    if text_width(text, font, size) <= width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width(&candidate, font, size) <= width {
            return candidate;
        }
    }
    String::new()
}

/// WinAnsi code for characters placed in the 0x80-0x9F block
fn winansi_extra(c: char) -> Option<u8> {
    let code = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Escape a string for a PDF literal in WinAnsi encoding
///
/// Characters WinAnsi cannot represent become '?'.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' | '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => match winansi_extra(c) {
                Some(code) => {
                    let _ = write!(out, "\\{:03o}", code);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Test (draft)".into(),
            author: "Tests".into(),
            subject: "Layout".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 31, 9, 30, 0).unwrap(),
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_paper_size_lookup() {
        assert_eq!(PaperSize::parse("letter").unwrap(), PaperSize::LETTER);
        assert_eq!(PaperSize::parse("A4").unwrap().width, 595.28);
        assert!(PaperSize::parse("B5").unwrap_err().is_validation());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Rgb::hex("#FFFFFF"), Rgb::WHITE);
        assert_eq!(Rgb::hex("#000000"), Rgb::BLACK);
        assert_eq!(Rgb::hex("not a color"), Rgb::BLACK);
        let Rgb(r, _, _) = Rgb::hex("#3B82F6");
        assert!((r - 59.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_structure_and_xref_offsets() {
        let mut doc = PdfDocument::new(PaperSize::A4, info());
        doc.text(
            "Hello",
            50.0,
            50.0,
            200.0,
            (Font::Helvetica, 12.0, Rgb::BLACK),
            Align::Left,
        );
        doc.add_page();
        doc.fill_rect(50.0, 100.0, 10.0, 10.0, Rgb::WHITE);
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.finish();
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"/Count 2").is_some());
        assert!(find(&bytes, b"(Hello) Tj").is_some());
        assert!(find(&bytes, b"/Title (Test \\(draft\\))").is_some());

        // startxref points at the xref table
        let text = String::from_utf8_lossy(&bytes);
        let start: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(bytes[start..].starts_with(b"xref\n"));

        // Each entry points at its object header
        let table = &text[start..];
        for (i, line) in table.lines().skip(3).take_while(|l| l.ends_with(" n ")).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()), "object {}", i + 1);
        }
    }

    #[test]
    fn test_coordinates_are_flipped() {
        let mut doc = PdfDocument::new(PaperSize::LETTER, info());
        doc.fill_rect(50.0, 45.0, 100.0, 20.0, Rgb::BLACK);
        let bytes = doc.finish();
        // 792 - 45 - 20 = 727
        assert!(find(&bytes, b"50.00 727.00 100.00 20.00 re f").is_some());
    }

    #[test]
    fn test_text_fitting_and_encoding() {
        let long = "A very long description that will never fit in a narrow column";
        let fitted = fit_to_width(long, Font::Helvetica, 9.0, 80.0);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, Font::Helvetica, 9.0) <= 80.0);

        assert_eq!(encode_text("Café (50%)"), "Caf\\351 \\(50%\\)");
        assert_eq!(encode_text("→"), "?");
    }

    #[test]
    fn test_winansi_extras_are_encoded() {
        assert_eq!(encode_text("\u{20AC}50.00"), "\\20050.00");
        assert_eq!(encode_text("\u{2018}ok\u{2019} \u{2022}"), "\\221ok\\222 \\225");
        assert_eq!(encode_text("\u{0178}"), "\\237");
    }
}
