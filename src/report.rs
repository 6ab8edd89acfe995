//! PDF report assembly.
//!
//! One A4 document: a title, the cleaning counters, a fixed transformation note, a preview of the
//! top rollups and the AI analysis, wrapped and paginated as needed. When a chart image exists it
//! is embedded on a separate "Visualization" page.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::ReportError;
use crate::summary::ProcessingSummary;
use crate::types::GroupedRow;

pub const REPORT_TITLE: &str = "Data Processing & AI Report";
pub const TRANSFORMATIONS_TEXT: &str = "Created 'total' column, grouped and aggregated data, filtered invalid/zero totals, and sorted by total.";
pub const NO_GROUPED_DATA: &str = "No grouped data available.";
pub const NO_AI_ANALYSIS: &str = "No AI analysis available.";
/// Rollup rows shown in the preview section.
pub const PREVIEW_ROWS: usize = 10;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 42.0;
// Helvetica averages about half an em per glyph.
const AVG_GLYPH_EM: f32 = 0.5;
// Courier is exactly 0.6 em.
const MONO_GLYPH_EM: f32 = 0.6;

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Mono => "F3",
        }
    }

    fn glyph_em(self) -> f32 {
        match self {
            Self::Mono => MONO_GLYPH_EM,
            Self::Regular | Self::Bold => AVG_GLYPH_EM,
        }
    }
}

/// Everything the report shows.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub summary: &'a ProcessingSummary,
    pub grouped: &'a [GroupedRow],
    /// Analysis text, or the fallback explaining why there is none.
    pub ai_text: &'a str,
    /// Chart to embed; ignored when `None` or when the file does not exist.
    pub chart: Option<&'a Path>,
}

// Lays text out top-down, starting a new page when the cursor reaches the bottom margin.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn gap(&mut self, h: f32) {
        self.y -= h;
    }

    fn line(&mut self, text: &str, font: Font, size: f32, leading: f32) {
        if self.y - leading < MARGIN {
            self.new_page();
        }
        self.y -= leading;
        let y = self.y;
        if let Some(ops) = self.pages.last_mut() {
            ops.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
                Operation::new("Td", vec![MARGIN.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(pdf_text(text))]),
                Operation::new("ET", vec![]),
            ]);
        }
    }

    fn paragraph(&mut self, text: &str, font: Font, size: f32, leading: f32) {
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / (size * font.glyph_em())) as usize;
        for line in wrap_text(text, max_chars) {
            self.line(&line, font, size, leading);
        }
    }

    fn heading(&mut self, text: &str) {
        self.gap(10.0);
        self.line(text, Font::Bold, 12.0, 20.0);
    }
}

// Standard Type1 fonts only cover single-byte text.
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}

/// Greedy word wrap to at most `max_chars` per line; explicit newlines are kept and words longer
/// than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    lines
}

/// Fixed-width text table of the first [`PREVIEW_ROWS`] rollups.
pub fn grouped_preview(grouped: &[GroupedRow]) -> Vec<String> {
    let header = ["group_key", "total_sales", "avg_total", "count_rows"].map(str::to_string);
    let rows: Vec<[String; 4]> = grouped
        .iter()
        .take(PREVIEW_ROWS)
        .map(|g| {
            [
                g.group_key.to_string(),
                format!("{:.2}", g.total_sales),
                format!("{:.2}", g.avg_total),
                g.count_rows.to_string(),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, w)| format!("{cell:>w$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

/// Build the report and save it to `path`.
pub fn export_pdf_report(input: &ReportInput<'_>, path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
    let path = path.as_ref();
    let mut doc = build_document(input)?;
    doc.compress();
    doc.save(path)?;
    Ok(path.to_path_buf())
}

/// Build the report in memory.
pub fn build_document(input: &ReportInput<'_>) -> Result<Document, ReportError> {
    let mut w = PageWriter::new();
    w.line(REPORT_TITLE, Font::Bold, 16.0, 22.0);

    w.heading("Cleaning Summary");
    for (label, value) in input.summary.lines() {
        w.line(&format!("{label}: {value}"), Font::Regular, 10.0, 14.0);
    }

    w.heading("Transformations Summary");
    w.paragraph(TRANSFORMATIONS_TEXT, Font::Regular, 10.0, 14.0);

    w.heading("Top Grouped Data (Preview)");
    if input.grouped.is_empty() {
        w.line(NO_GROUPED_DATA, Font::Regular, 8.0, 11.0);
    } else {
        for line in grouped_preview(input.grouped) {
            w.paragraph(&line, Font::Mono, 8.0, 11.0);
        }
    }

    w.heading("AI Analysis");
    let ai_text = if input.ai_text.trim().is_empty() {
        NO_AI_ANALYSIS
    } else {
        input.ai_text
    };
    w.paragraph(ai_text, Font::Regular, 10.0, 13.0);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobjects = lopdf::Dictionary::new();
    let chart = match input.chart.filter(|p| p.exists()) {
        Some(chart_path) => {
            let (image_id, width, height) = add_chart_image(&mut doc, chart_path)?;
            xobjects.set("Chart", image_id);
            w.new_page();
            w.line("Visualization", Font::Bold, 14.0, 20.0);
            Some((width, height))
        }
        None => None,
    };

    let mut page_ops = w.pages;
    if let (Some((width, height)), Some(last)) = (chart, page_ops.last_mut()) {
        let draw_w = PAGE_WIDTH - 2.0 * MARGIN;
        let draw_h = draw_w * height as f32 / width as f32;
        let top = PAGE_HEIGHT - MARGIN - 40.0;
        last.push(Operation::new("q", vec![]));
        last.push(Operation::new(
            "cm",
            vec![
                draw_w.into(),
                0.into(),
                0.into(),
                draw_h.into(),
                MARGIN.into(),
                (top - draw_h).into(),
            ],
        ));
        last.push(Operation::new("Do", vec!["Chart".into()]));
        last.push(Operation::new("Q", vec![]));
    }

    let font = |base: &str| {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
        }
    };
    let fonts = dictionary! {
        Font::Regular.resource_name() => doc.add_object(font("Helvetica")),
        Font::Bold.resource_name() => doc.add_object(font("Helvetica-Bold")),
        Font::Mono.resource_name() => doc.add_object(font("Courier")),
    };
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
    for operations in page_ops {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

// Embeds the chart as an uncompressed RGB image XObject; `Document::compress` deflates it later.
fn add_chart_image(doc: &mut Document, path: &Path) -> Result<(ObjectId, u32, u32), ReportError> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    );
    Ok((doc.add_object(stream), width, height))
}
