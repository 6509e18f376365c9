//! Presentation of invoices and ledger pages.
//!
//! [`breakdown_lines`] is the single source of the ten labeled invoice
//! figures; the HTML page and the PDF both print exactly these lines.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::calculation::round_money;
use crate::models::{Breakdown, InvoicePeriod};

pub mod html;
mod pdf;

pub use pdf::render_invoice_pdf;

/// One labeled figure of an invoice breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownLine {
    /// The label, e.g. "Super amount".
    pub label: String,
    /// The formatted value, e.g. "$17.25".
    pub value: String,
}

impl BreakdownLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Renders the line as `label: value`.
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Formats an amount as dollars with two decimals, sign first (`-$5.00`).
///
/// # Example
///
/// ```
/// use courier_ledger::render::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(1725, 2)), "$17.25");
/// assert_eq!(format_money(Decimal::new(-100, 0)), "-$100.00");
/// ```
pub fn format_money(amount: Decimal) -> String {
    let cents = round_money(amount);
    if cents.is_sign_negative() && !cents.is_zero() {
        format!("-${:.2}", cents.abs())
    } else {
        format!("${:.2}", cents.abs())
    }
}

/// Formats a fractional rate as a percentage with `places` decimals.
fn format_percent(rate: Decimal, places: u32) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", places as usize, percent)
}

/// Returns the ten labeled invoice lines in their fixed order.
pub fn breakdown_lines(b: &Breakdown) -> Vec<BreakdownLine> {
    let gst_percent = (b.gst_rate * Decimal::ONE_HUNDRED).normalize();

    vec![
        BreakdownLine::new("Total packages", b.packages.to_string()),
        BreakdownLine::new("Price per package", format_money(b.price_per_pkg)),
        BreakdownLine::new("Base (packages * price)", format_money(b.base)),
        BreakdownLine::new("Super rate", format_percent(b.super_rate, 2)),
        BreakdownLine::new("Super amount", format_money(b.super_amount)),
        BreakdownLine::new("Subtotal (base + super)", format_money(b.subtotal)),
        BreakdownLine::new(format!("GST {}%", gst_percent), format_money(b.gst)),
        BreakdownLine::new("Total + GST", format_money(b.total_with_gst)),
        BreakdownLine::new("Van rent deduction", format!("-{}", format_money(b.van_rent))),
        BreakdownLine::new("FINAL TOTAL", format_money(b.total)),
    ]
}

/// Builds the download filename `invoice_<name>_<start>_<end>.pdf`.
///
/// Whitespace in the worker name becomes underscores; characters that would
/// break a `Content-Disposition` header are dropped.
///
/// # Example
///
/// ```
/// use courier_ledger::models::InvoicePeriod;
/// use courier_ledger::render::invoice_filename;
/// use chrono::NaiveDate;
///
/// let period = InvoicePeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
/// ).unwrap();
/// assert_eq!(
///     invoice_filename("Ana Maria Torres", &period),
///     "invoice_Ana_Maria_Torres_2026-03-01_2026-03-14.pdf"
/// );
/// ```
pub fn invoice_filename(worker_name: &str, period: &InvoicePeriod) -> String {
    let name: String = worker_name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '/' | ';') && !c.is_control())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    format!("invoice_{}_{}_{}.pdf", name, period.start, period.end)
}
