//! Invoice models.
//!
//! This module contains the [`InvoiceInput`] fed to the calculator, the
//! fixed-shape [`Breakdown`] it produces, and the [`Invoice`] envelope that
//! ties a breakdown to a worker and an [`InvoicePeriod`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

/// GST rate applied when the caller does not supply one (10%).
pub const DEFAULT_GST_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Van rent deducted when the caller does not supply one ($100.00).
pub const DEFAULT_VAN_RENT: Decimal = Decimal::from_parts(10000, 0, 0, false, 2);

/// An inclusive range of work dates an invoice covers.
///
/// # Example
///
/// ```
/// use courier_ledger::models::InvoicePeriod;
/// use chrono::NaiveDate;
///
/// let period = InvoicePeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
/// ).unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePeriod {
    /// First day of the period (inclusive).
    pub start: NaiveDate,
    /// Last day of the period (inclusive).
    pub end: NaiveDate,
}

impl InvoicePeriod {
    /// Creates a period, rejecting ranges whose end precedes their start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if end < start {
            return Err(LedgerError::validation(
                "end",
                format!("period end {} is before start {}", end, start),
            ));
        }
        Ok(Self { start, end })
    }

    /// Checks if a date falls within the period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Inputs to the invoice calculator.
///
/// [`InvoiceInput::new`] fills in the default GST rate and van rent; use the
/// `with_*` builders to override them.
///
/// # Example
///
/// ```
/// use courier_ledger::models::{InvoiceInput, DEFAULT_GST_RATE, DEFAULT_VAN_RENT};
/// use rust_decimal::Decimal;
///
/// let input = InvoiceInput::new(100, Decimal::new(15, 1), Decimal::new(115, 3))
///     .with_van_rent(Decimal::new(80, 0));
/// assert_eq!(input.gst_rate, DEFAULT_GST_RATE);
/// assert_ne!(input.van_rent, DEFAULT_VAN_RENT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Sum of package counts over the period.
    pub packages_sum: u64,
    /// Amount paid per package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction.
    pub super_rate: Decimal,
    /// GST rate as a fraction.
    pub gst_rate: Decimal,
    /// Fixed deduction subtracted from the post-GST total.
    pub van_rent: Decimal,
}

impl InvoiceInput {
    /// Creates an input with the default GST rate and van rent.
    pub fn new(packages_sum: u64, price_per_pkg: Decimal, super_rate: Decimal) -> Self {
        Self {
            packages_sum,
            price_per_pkg,
            super_rate,
            gst_rate: DEFAULT_GST_RATE,
            van_rent: DEFAULT_VAN_RENT,
        }
    }

    /// Overrides the GST rate.
    pub fn with_gst_rate(mut self, gst_rate: Decimal) -> Self {
        self.gst_rate = gst_rate;
        self
    }

    /// Overrides the van rent deduction.
    pub fn with_van_rent(mut self, van_rent: Decimal) -> Self {
        self.van_rent = van_rent;
        self
    }
}

/// The structured record of every intermediate and final invoice figure.
///
/// Monetary fields are rounded to cents; rate fields are echoed unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Sum of package counts over the period.
    pub packages: u64,
    /// Amount paid per package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction.
    pub super_rate: Decimal,
    /// `packages * price_per_pkg`.
    pub base: Decimal,
    /// `base * super_rate`.
    pub super_amount: Decimal,
    /// `base + super_amount`.
    pub subtotal: Decimal,
    /// GST rate as a fraction.
    pub gst_rate: Decimal,
    /// `subtotal * gst_rate`.
    pub gst: Decimal,
    /// `subtotal + gst`.
    pub total_with_gst: Decimal,
    /// Fixed deduction.
    pub van_rent: Decimal,
    /// `total_with_gst - van_rent`; may be negative.
    pub total: Decimal,
}

/// A condition worth flagging on an invoice that does not change its figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// A computed invoice for one worker over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier for this computation.
    pub invoice_id: Uuid,
    /// When the invoice was computed.
    pub generated_at: DateTime<Utc>,
    /// The invoiced worker's id.
    pub worker_id: i64,
    /// The invoiced worker's name.
    pub worker_name: String,
    /// The invoiced worker's email.
    pub worker_email: String,
    /// The covered date range.
    pub period: InvoicePeriod,
    /// The calculator output.
    pub breakdown: Breakdown,
    /// Data-quality warnings for the period.
    pub warnings: Vec<InvoiceWarning>,
}
