use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use serde_json::Value;

use crate::{Column, ExportError, ExportLocale, Row, bar_percentages, format_cell};

// A4 landscape, in millimetres.
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const FONT_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 7.0;
const CELL_PADDING: f32 = 1.5;

const BAR_HEIGHT: f32 = 5.0;
const BAR_LABEL_WIDTH: f32 = 60.0;
const BAR_VALUE_WIDTH: f32 = 30.0;

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const HEADER_FILL: (f32, f32, f32) = (0.85, 0.87, 0.9);
const BAR_FILL: (f32, f32, f32) = (0.2, 0.4, 0.75);

/// Render a report as a PDF: the title, a paged table and, when `chart` is
/// not empty, a horizontal bar chart on its own page.
pub fn to_pdf(
    title: &str,
    rows: &[Row],
    columns: &[Column],
    chart: &[(String, f64)],
    locale: &ExportLocale,
) -> Result<Vec<u8>, ExportError> {
    let mut page = PageWriter::new(title)?;

    page.heading(title);
    if rows.is_empty() || columns.is_empty() {
        page.text("No rows for this selection.", FONT_SIZE, MARGIN, false);
        page.advance(ROW_HEIGHT);
    } else {
        draw_table(&mut page, rows, columns, locale);
    }

    if !chart.is_empty() {
        page.new_page();
        page.heading(title);
        draw_chart(&mut page, chart, locale);
    }

    let pages = page.pages;
    let bytes = page.doc.save_to_bytes().map_err(pdf_error)?;
    tracing::debug!(
        "exported {} rows as PDF ({pages} pages, {} bytes)",
        rows.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn draw_table(
    page: &mut PageWriter,
    rows: &[Row],
    columns: &[Column],
    locale: &ExportLocale,
) {
    let width = (PAGE_WIDTH - 2.0 * MARGIN) / columns.len() as f32;

    draw_header(page, columns, width);
    for row in rows {
        if page.needs_page(ROW_HEIGHT) {
            page.new_page();
            draw_header(page, columns, width);
        }
        for (i, column) in columns.iter().enumerate() {
            let x = MARGIN + i as f32 * width + CELL_PADDING;
            let cell = format_cell(column.value(row), locale);
            page.text(&fit(&cell, width), FONT_SIZE, x, false);
        }
        page.advance(ROW_HEIGHT);
    }
}

fn draw_header(page: &mut PageWriter, columns: &[Column], width: f32) {
    page.fill(HEADER_FILL, MARGIN, PAGE_WIDTH - MARGIN, ROW_HEIGHT);
    for (i, column) in columns.iter().enumerate() {
        let x = MARGIN + i as f32 * width + CELL_PADDING;
        page.text(&fit(&column.label, width), FONT_SIZE, x, true);
    }
    page.advance(ROW_HEIGHT);
}

fn draw_chart(page: &mut PageWriter, chart: &[(String, f64)], locale: &ExportLocale) {
    let values: Vec<f64> = chart.iter().map(|(_, v)| *v).collect();
    let percentages = bar_percentages(&values);
    let bar_left = MARGIN + BAR_LABEL_WIDTH;
    let bar_span = PAGE_WIDTH - MARGIN - BAR_VALUE_WIDTH - bar_left;

    for ((label, value), pct) in chart.iter().zip(percentages) {
        if page.needs_page(ROW_HEIGHT) {
            page.new_page();
        }
        page.text(&fit(label, BAR_LABEL_WIDTH), FONT_SIZE, MARGIN, false);
        let bar_right = bar_left + bar_span * (pct / 100.0) as f32;
        if bar_right > bar_left {
            page.fill(BAR_FILL, bar_left, bar_right, BAR_HEIGHT);
        }
        let shown = format_cell(&Value::from(*value), locale);
        page.text(&shown, FONT_SIZE, bar_right + CELL_PADDING, false);
        page.advance(ROW_HEIGHT);
    }
}

/// Truncate text to roughly fit a cell. Helvetica averages about half an em
/// per glyph, which is close enough for tabular data.
fn fit(text: &str, width: f32) -> String {
    let glyph = FONT_SIZE * 0.3528 * 0.5;
    let max = ((width - 2.0 * CELL_PADDING) / glyph).floor().max(4.0) as usize;
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

fn pdf_error(e: printpdf::Error) -> ExportError {
    ExportError::Pdf(e.to_string())
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline of the next line, measured from the bottom of the page.
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        let writer = Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };
        writer.footer();
        Ok(writer)
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.footer();
    }

    fn needs_page(&self, height: f32) -> bool {
        self.y - height < MARGIN + ROW_HEIGHT
    }

    fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    fn heading(&mut self, title: &str) {
        self.text(title, TITLE_SIZE, MARGIN, true);
        self.advance(ROW_HEIGHT * 2.0);
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.set_color(BLACK);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    /// Fill a band behind the current line.
    fn fill(&self, rgb: (f32, f32, f32), left: f32, right: f32, height: f32) {
        let bottom = self.y - (ROW_HEIGHT - height) / 2.0 - CELL_PADDING;
        self.set_color(rgb);
        self.layer
            .add_rect(Rect::new(Mm(left), Mm(bottom), Mm(right), Mm(bottom + height)));
    }

    fn set_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn footer(&self) {
        self.set_color(BLACK);
        self.layer.use_text(
            format!("Page {}", self.pages),
            FONT_SIZE,
            Mm(PAGE_WIDTH - MARGIN - 15.0),
            Mm(MARGIN / 2.0),
            &self.regular,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                json!({"date": "2025-01-07", "orders": i, "closed": i % 2 == 0})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("date", "Date"),
            Column::new("orders", "Orders"),
            Column::new("closed", "Closed"),
        ]
    }

    #[test]
    fn renders_a_pdf_document() {
        let chart = vec![("Mon".to_string(), 3.0), ("Tue".to_string(), 9.0)];
        let bytes = to_pdf(
            "Sales",
            &rows(5),
            &columns(),
            &chart,
            &ExportLocale::default(),
        )
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_tables_span_pages() {
        let locale = ExportLocale::default();
        let short = to_pdf("Sales", &rows(3), &columns(), &[], &locale).unwrap();
        let long = to_pdf("Sales", &rows(200), &columns(), &[], &locale).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn empty_report() {
        let bytes =
            to_pdf("Nothing", &[], &[], &[], &ExportLocale::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn fit_truncates_long_text() {
        assert_eq!(fit("short", 40.0), "short");
        let long = "x".repeat(200);
        let fitted = fit(&long, 20.0);
        assert!(fitted.ends_with("..."));
        assert!(fitted.chars().count() < 20);
    }
}
