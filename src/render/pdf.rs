//! Single-page A4 invoice PDF.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Invoice;

use super::breakdown_lines;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LEFT_MARGIN_MM: f32 = 14.0;
const TOP_MARGIN_MM: f32 = 21.0;

/// One point in millimetres.
const PT_MM: f32 = 0.3528;

fn pdf_error(error: printpdf::Error) -> LedgerError {
    LedgerError::Pdf {
        message: error.to_string(),
    }
}

/// Writes lines top-down, each advancing the cursor by its own leading.
struct Cursor<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    y_mm: f32,
}

impl Cursor<'_> {
    fn line(&mut self, text: &str, size_pt: f32, bold: bool, leading_pt: f32) {
        let font = if bold { self.bold } else { self.regular };
        self.layer
            .use_text(text, size_pt, Mm(LEFT_MARGIN_MM), Mm(self.y_mm), font);
        self.y_mm -= leading_pt * PT_MM;
    }
}

/// Renders an invoice as PDF bytes.
///
/// Layout: title, contractor, period, a `Breakdown:` heading, then the ten
/// lines from [`breakdown_lines`].
pub fn render_invoice_pdf(invoice: &Invoice) -> LedgerResult<Vec<u8>> {
    let title = format!("Invoice {}", invoice.invoice_id);
    let (doc, page, layer) = PdfDocument::new(title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "invoice");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        regular: &regular,
        bold: &bold,
        y_mm: PAGE_HEIGHT.0 - TOP_MARGIN_MM,
    };

    cursor.line("INVOICE - Australia Post Contractor", 14.0, true, 24.0);
    cursor.line(
        &format!(
            "Contractor: {} ({})",
            invoice.worker_name, invoice.worker_email
        ),
        11.0,
        false,
        18.0,
    );
    cursor.line(
        &format!("Period: {} to {}", invoice.period.start, invoice.period.end),
        11.0,
        false,
        24.0,
    );
    cursor.line("Breakdown:", 12.0, true, 18.0);
    for line in breakdown_lines(&invoice.breakdown) {
        cursor.line(&line.text(), 11.0, false, 18.0);
    }

    doc.save_to_bytes().map_err(pdf_error)
}
