//! Page layout for the PDF company report.
//!
//! Positions are in millimetres from the top-left corner of an A4 page.
//! Layout is done first so the footer can state the final page count.

use crate::core::export::pdf::{self, text_width_mm};
use crate::domain::model::Company;
use crate::utils::format::format_date;
use chrono::NaiveDate;

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

const LEFT_MARGIN: f64 = 14.0;
const RIGHT_EDGE: f64 = 196.0;
const DETAIL_INDENT: f64 = 20.0;
const DESCRIPTION_WIDTH: f64 = 170.0;
const TOP_OF_NEXT_PAGE: f64 = 20.0;
const FIRST_ENTRY_Y: f64 = 44.0;
/// An entry starts on a new page once the cursor is this close to the bottom.
const BOTTOM_MARGIN: f64 = 40.0;
const FOOTER_OFFSET: f64 = 10.0;

const HEADING_SIZE: f64 = 12.0;
const HEADING_ADVANCE: f64 = 7.0;
const BODY_SIZE: f64 = 9.0;
const BODY_ADVANCE: f64 = 5.0;
const ENTRY_GAP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        size: f64,
        style: FontStyle,
        align: Align,
        text: String,
    },
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    fn text(&mut self, x: f64, y: f64, size: f64, style: FontStyle, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            style,
            align: Align::Left,
            text: text.into(),
        });
    }

    /// All text on the page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Rule { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Page>,
    /// Number of company entries laid out.
    pub entries: usize,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Footer text of each page, in page order.
    pub fn footers(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter_map(|p| p.texts().last().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub title: String,
    pub generated_on: NaiveDate,
}

impl ReportOptions {
    pub fn new(title: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            generated_on,
        }
    }
}

/// Greedy word wrap against Helvetica metrics. Explicit newlines start a
/// new line; words wider than `max_width` are split by character.
pub fn wrap_text(text: &str, size_pt: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, size_pt) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width_mm(word, size_pt) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width_mm(&current, size_pt) > max_width {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Write cursor over the page list. Lines that would reach the footer
/// continue on a fresh page.
struct Flow {
    pages: Vec<Page>,
    y: f64,
}

impl Flow {
    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP_OF_NEXT_PAGE;
    }

    fn line(&mut self, x: f64, size: f64, style: FontStyle, text: String, advance: f64) {
        if self.y + advance > PAGE_HEIGHT_MM - FOOTER_OFFSET {
            self.new_page();
        }
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.text(x, y, size, style, text);
        }
        self.y += advance;
    }

    fn body(&mut self, text: String) {
        self.line(DETAIL_INDENT, BODY_SIZE, FontStyle::Normal, text, BODY_ADVANCE);
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Lay out the report: title block, one entry per company, then footers.
pub fn layout_document(records: &[Company], report: &ReportOptions) -> DocumentLayout {
    let mut pages = vec![Page::default()];

    {
        let first = &mut pages[0];
        first.text(LEFT_MARGIN, 20.0, 18.0, FontStyle::Bold, report.title.as_str());
        first.text(
            LEFT_MARGIN,
            28.0,
            10.0,
            FontStyle::Normal,
            format!("Generated on: {}", format_date(&report.generated_on)),
        );
        first.text(
            LEFT_MARGIN,
            33.0,
            10.0,
            FontStyle::Normal,
            format!("Companies: {}", records.len()),
        );
        first.ops.push(DrawOp::Rule {
            x1: LEFT_MARGIN,
            y1: 36.0,
            x2: RIGHT_EDGE,
            y2: 36.0,
        });
    }

    let mut flow = Flow {
        pages,
        y: FIRST_ENTRY_Y,
    };

    for (index, company) in records.iter().enumerate() {
        if flow.y > PAGE_HEIGHT_MM - BOTTOM_MARGIN {
            flow.new_page();
        }

        flow.line(
            LEFT_MARGIN,
            HEADING_SIZE,
            FontStyle::Bold,
            format!("{}. {}", index + 1, company.name),
            HEADING_ADVANCE,
        );

        if let Some(description) = non_empty(&company.description) {
            for line in wrap_text(description, BODY_SIZE, DESCRIPTION_WIDTH) {
                flow.body(line);
            }
        }

        let details = [
            ("Address", &company.address),
            ("Website", &company.website),
            ("Email", &company.email),
            ("Phone", &company.phone),
        ];
        for (label, value) in details {
            if let Some(value) = non_empty(value) {
                flow.body(format!("{}: {}", label, value));
            }
        }

        if !company.specializations.is_empty() {
            flow.body(format!(
                "Specializations: {}",
                company.specialization_names().join(", ")
            ));
        }

        flow.y += ENTRY_GAP;
    }

    let mut pages = flow.pages;
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::Text {
            x: PAGE_WIDTH_MM / 2.0,
            y: PAGE_HEIGHT_MM - FOOTER_OFFSET,
            size: 8.0,
            style: FontStyle::Italic,
            align: Align::Center,
            text: format!("Page {} of {}", i + 1, total),
        });
    }

    tracing::debug!(entries = records.len(), pages = total, "report laid out");

    DocumentLayout {
        pages,
        entries: records.len(),
    }
}

/// Render the company report as PDF bytes.
pub fn to_document(records: &[Company], report: &ReportOptions) -> Vec<u8> {
    let layout = layout_document(records, report);
    pdf::render(&layout, &report.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Specialization;
    use chrono::{TimeZone, Utc};

    fn report() -> ReportOptions {
        ReportOptions::new(
            "Niedersachsen Beratungsunternehmen",
            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        )
    }

    fn company(i: usize) -> Company {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Company {
            id: i.to_string(),
            name: format!("Beratung {}", i),
            description: Some("Digitalisierung und Prozessberatung".to_string()),
            address: Some(format!("Hauptstraße {}, Hannover", i)),
            city: Some("Hannover".to_string()),
            latitude: None,
            longitude: None,
            website: Some("https://example.de".to_string()),
            email: None,
            phone: Some("0511 123456".to_string()),
            specializations: vec![Specialization {
                id: "s".to_string(),
                name: "ERP".to_string(),
                icon: "📊".to_string(),
                color: "#000000".to_string(),
            }],
            created_at: ts,
            updated_at: ts,
        }
    }

    fn headings(layout: &DocumentLayout) -> Vec<String> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text {
                    style: FontStyle::Bold,
                    size,
                    text,
                    ..
                } if *size == HEADING_SIZE => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_title_only_for_empty_input() {
        let layout = layout_document(&[], &report());
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.entries, 0);
        let texts = layout.pages[0].texts();
        assert_eq!(
            texts,
            vec![
                "Niedersachsen Beratungsunternehmen",
                "Generated on: 7.5.2024",
                "Companies: 0",
                "Page 1 of 1",
            ]
        );
    }

    #[test]
    fn test_entry_layout() {
        let layout = layout_document(&[company(1)], &report());
        let texts = layout.pages[0].texts();
        assert_eq!(
            &texts[3..],
            &[
                "1. Beratung 1",
                "Digitalisierung und Prozessberatung",
                "Address: Hauptstraße 1, Hannover",
                "Website: https://example.de",
                "Phone: 0511 123456",
                "Specializations: ERP",
                "Page 1 of 1",
            ]
        );
    }

    #[test]
    fn test_pagination_and_footers() {
        let records: Vec<Company> = (1..=40).map(company).collect();
        let layout = layout_document(&records, &report());

        assert!(layout.page_count() > 1);
        let expected_headings: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c.name))
            .collect();
        assert_eq!(headings(&layout), expected_headings);

        let n = layout.page_count();
        let expected_footers: Vec<String> = (1..=n).map(|i| format!("Page {} of {}", i, n)).collect();
        assert_eq!(layout.footers(), expected_footers);
    }

    #[test]
    fn test_entries_start_above_bottom_margin() {
        let records: Vec<Company> = (1..=40).map(company).collect();
        let layout = layout_document(&records, &report());
        for op in layout.pages.iter().flat_map(|p| p.ops.iter()) {
            if let DrawOp::Text { y, size, style: FontStyle::Bold, .. } = op {
                if *size == HEADING_SIZE {
                    assert!(*y <= PAGE_HEIGHT_MM - BOTTOM_MARGIN);
                }
            }
        }
    }

    #[test]
    fn test_long_description_continues_on_next_page() {
        let mut long = company(1);
        long.description = Some("Beratung ".repeat(800));
        let mut late = company(2);
        late.description = Some("Prozessanalyse und Schulung ".repeat(40));
        let records = vec![long, late];

        let layout = layout_document(&records, &report());
        assert!(layout.page_count() > 1);

        for op in layout.pages.iter().flat_map(|p| p.ops.iter()) {
            if let DrawOp::Text { y, align: Align::Left, text, .. } = op {
                assert!(*y <= PAGE_HEIGHT_MM - FOOTER_OFFSET, "'{}' drawn at y={}", text, y);
            }
        }

        let texts: Vec<&str> = layout.pages.iter().flat_map(|p| p.texts()).collect();
        assert!(texts.contains(&"Specializations: ERP"));
        assert_eq!(texts.iter().filter(|t| **t == "Phone: 0511 123456").count(), 2);
        assert_eq!(headings(&layout), vec!["1. Beratung 1", "2. Beratung 2"]);
    }

    #[test]
    fn test_wrap_text() {
        let long = "Wir begleiten mittelständische Unternehmen in Niedersachsen bei der digitalen Transformation, \
                    von der Strategie über die Auswahl passender Software bis zur Schulung der Mitarbeitenden.";
        let lines = wrap_text(long, BODY_SIZE, DESCRIPTION_WIDTH);
        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(text_width_mm(line, BODY_SIZE) <= DESCRIPTION_WIDTH);
        }
        assert_eq!(lines.join(" "), long);

        assert_eq!(wrap_text("a\nb", BODY_SIZE, DESCRIPTION_WIDTH), vec!["a", "b"]);
        assert!(wrap_text("", BODY_SIZE, DESCRIPTION_WIDTH).is_empty());

        let unbroken = "x".repeat(200);
        let pieces = wrap_text(&unbroken, BODY_SIZE, 20.0);
        assert!(pieces.len() > 1);
        assert_eq!(pieces.concat(), unbroken);
    }

    #[test]
    fn test_rendered_pdf_structure() {
        let records: Vec<Company> = (1..=40).map(company).collect();
        let layout = layout_document(&records, &report());
        let n = layout.page_count();
        let bytes = to_document(&records, &report());
        let text = String::from_utf8_lossy(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains(&format!("/Count {}", n)));
        assert!(text.contains(&format!("(Page {} of {}) Tj", n, n)));

        let startxref = text.rfind("startxref\n").unwrap();
        let offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(&bytes[offset..offset + 4], b"xref");
    }
}
