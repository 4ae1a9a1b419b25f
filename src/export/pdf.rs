use super::{text_row, ExportError, COLUMN_HEADERS};
use crate::models::expense::Expense;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

// A4 landscape
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 8.0;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 14.0;
const TITLE_GAP: f32 = 12.0;
const CELL_PADDING: f32 = 1.5;
/// Rough width of one Helvetica glyph at `FONT_SIZE`, used to clip cell text.
const GLYPH_WIDTH: f32 = 1.8;
const COLUMN_WIDTHS: [f32; 5] = [28.0, 60.0, 35.0, 50.0, 94.0];

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Renders expenses as a grid table with a grey header row. The header is
/// repeated on every page.
pub fn render(title: &str, expenses: &[Expense]) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Tabela");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("{e:?}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("{e:?}")))?,
    };

    let rows: Vec<[String; 5]> = expenses.iter().map(text_row).collect();
    let first_page_rows = rows_per_page(true);
    let other_page_rows = rows_per_page(false);

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    layer.use_text(
        title,
        TITLE_SIZE,
        Mm(MARGIN),
        Mm(PAGE_HEIGHT - MARGIN),
        &fonts.bold,
    );

    let mut remaining: &[[String; 5]] = &rows;
    let mut top = PAGE_HEIGHT - MARGIN - TITLE_GAP;
    let mut capacity = first_page_rows;

    loop {
        let take = remaining.len().min(capacity);
        let (chunk, rest) = remaining.split_at(take);
        draw_table(&layer, &fonts, top, chunk);
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        layer = new_page(&doc);
        top = PAGE_HEIGHT - MARGIN;
        capacity = other_page_rows;
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("{e:?}")))
}

fn rows_per_page(first: bool) -> usize {
    let mut usable = PAGE_HEIGHT - 2.0 * MARGIN - ROW_HEIGHT;
    if first {
        usable -= TITLE_GAP;
    }
    ((usable / ROW_HEIGHT).floor() as usize).max(1)
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Tabela");
    doc.get_page(page).get_layer(layer)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None))
}

fn draw_table(layer: &PdfLayerReference, fonts: &Fonts, top: f32, rows: &[[String; 5]]) {
    let table_width: f32 = COLUMN_WIDTHS.iter().sum();
    let row_count = rows.len() + 1;
    let bottom = top - ROW_HEIGHT * row_count as f32;

    layer.set_fill_color(grey());
    layer.add_rect(Rect::new(
        Mm(MARGIN),
        Mm(top - ROW_HEIGHT),
        Mm(MARGIN + table_width),
        Mm(top),
    ));

    layer.set_fill_color(black());
    draw_row(layer, &fonts.bold, top, &COLUMN_HEADERS.map(String::from));
    for (index, row) in rows.iter().enumerate() {
        draw_row(layer, &fonts.regular, top - ROW_HEIGHT * (index + 1) as f32, row);
    }

    layer.set_outline_color(black());
    layer.set_outline_thickness(1.0);

    for line in 0..=row_count {
        let y = top - ROW_HEIGHT * line as f32;
        layer.add_line(segment((MARGIN, y), (MARGIN + table_width, y)));
    }

    let mut x = MARGIN;
    layer.add_line(segment((x, top), (x, bottom)));
    for width in COLUMN_WIDTHS {
        x += width;
        layer.add_line(segment((x, top), (x, bottom)));
    }
}

fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, top: f32, cells: &[String; 5]) {
    let baseline = top - ROW_HEIGHT + 2.5;
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        let text = clip(cell, width);
        layer.use_text(text, FONT_SIZE, Mm(x + CELL_PADDING), Mm(baseline), font);
        x += width;
    }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from.0), Mm(from.1)), false),
            (Point::new(Mm(to.0), Mm(to.1)), false),
        ],
        is_closed: false,
    }
}

/// Cuts text that would overflow a cell of `width` millimetres.
fn clip(text: &str, width: f32) -> String {
    let max_chars = ((width - 2.0 * CELL_PADDING) / GLYPH_WIDTH).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(id: i64) -> Expense {
        Expense {
            id,
            project_id: 1,
            category: "Locação de andaimes".to_string(),
            amount: 1234.5,
            expense_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            description: Some("Andaime fachada norte".to_string()),
            approver: "Rita".to_string(),
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = render("Gastos - Obra 1", &[expense(1), expense(2)]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_spans_pages() {
        let expenses: Vec<Expense> = (1..=60).map(expense).collect();
        let bytes = render("Gastos", &expenses).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_clip_long_text() {
        let long = "x".repeat(200);
        let clipped = clip(&long, 28.0);
        assert!(clipped.chars().count() < 20);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip("curto", 60.0), "curto");
    }
}
