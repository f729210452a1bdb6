//! Minimal PDF 1.4 writer for laid-out report pages.
//!
//! Uses the three standard Helvetica faces with WinAnsi encoding, so no
//! fonts are embedded. Content streams are left uncompressed.

use crate::core::export::document::{Align, DocumentLayout, DrawOp, FontStyle, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use std::io::Write;

const PT_PER_MM: f64 = 72.0 / 25.4;

/// Helvetica advance widths for U+0020..=U+007E, in 1/1000 em.
/// Helvetica-Oblique shares these metrics.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(ch: char) -> u16 {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        HELVETICA_WIDTHS[(code - 0x20) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Rendered width of `text` in millimetres at `size_pt`.
pub fn text_width_mm(text: &str, size_pt: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    f64::from(units) / 1000.0 * size_pt / PT_PER_MM
}

/// Map a char to its WinAnsiEncoding byte; anything unmappable becomes `?`.
fn win_ansi(ch: char) -> u8 {
    match ch {
        '\u{20}'..='\u{7E}' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

fn push_pdf_string(out: &mut Vec<u8>, text: &str) {
    out.push(b'(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\t' => out.push(b' '),
            _ => out.push(win_ansi(ch)),
        }
    }
    out.push(b')');
}

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Normal => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

fn to_pdf_y(y_mm: f64) -> f64 {
    (PAGE_HEIGHT_MM - y_mm) * PT_PER_MM
}

fn content_stream(ops: &[DrawOp]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                style,
                align,
                text,
            } => {
                let x_mm = match align {
                    Align::Left => *x,
                    Align::Center => x - text_width_mm(text, *size) / 2.0,
                };
                out.extend_from_slice(
                    format!(
                        "BT /{} {:.1} Tf {:.2} {:.2} Td ",
                        font_resource(*style),
                        size,
                        x_mm * PT_PER_MM,
                        to_pdf_y(*y)
                    )
                    .as_bytes(),
                );
                push_pdf_string(&mut out, text);
                out.extend_from_slice(b" Tj ET\n");
            }
            DrawOp::Rule { x1, y1, x2, y2 } => {
                out.extend_from_slice(
                    format!(
                        "0.5 w {:.2} {:.2} m {:.2} {:.2} l S\n",
                        x1 * PT_PER_MM,
                        to_pdf_y(*y1),
                        x2 * PT_PER_MM,
                        to_pdf_y(*y2)
                    )
                    .as_bytes(),
                );
            }
        }
    }
    out
}

struct PdfBuilder {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Objects must be added in id order starting at 1.
    fn object(&mut self, body: &[u8]) {
        let id = self.offsets.len() + 1;
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, data: &[u8]) {
        let mut body = format!("<< /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(&body);
    }

    fn finish(mut self, root_id: usize, info_id: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        // Writing into a Vec cannot fail.
        let _ = write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            let _ = write!(self.buf, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            self.buf,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root_id, info_id, xref_offset
        );
        self.buf
    }
}

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const INFO_ID: usize = 6;
const FIRST_PAGE_ID: usize = 7;

/// Serialize a finished layout. Object layout: catalog, page tree, three
/// fonts, info dictionary, then a page/content pair per page.
pub fn render(layout: &DocumentLayout, title: &str) -> Vec<u8> {
    let mut pdf = PdfBuilder::new();

    pdf.object(format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID).as_bytes());

    let kids: Vec<String> = (0..layout.pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_ID + 2 * i))
        .collect();
    pdf.object(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            layout.pages.len()
        )
        .as_bytes(),
    );

    for base_font in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"] {
        pdf.object(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base_font
            )
            .as_bytes(),
        );
    }

    let mut info = b"<< /Title ".to_vec();
    push_pdf_string(&mut info, title);
    info.extend_from_slice(b" /Producer (consult-map) >>");
    pdf.object(&info);

    for (i, page) in layout.pages.iter().enumerate() {
        let content_id = FIRST_PAGE_ID + 2 * i + 1;
        pdf.object(
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {} 0 R >>",
                PAGES_ID,
                PAGE_WIDTH_MM * PT_PER_MM,
                PAGE_HEIGHT_MM * PT_PER_MM,
                content_id
            )
            .as_bytes(),
        );
        pdf.stream(&content_stream(&page.ops));
    }

    pdf.finish(CATALOG_ID, INFO_ID)
}
