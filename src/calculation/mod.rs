//! Calculation logic for the courier ledger.
//!
//! This module contains the invoice breakdown calculator and the
//! data-quality checks run over the entries an invoice is built from.

mod invoice;
mod warnings;

pub use invoice::{MONEY_DECIMAL_PLACES, compute_invoice, round_money};
pub use warnings::{DUPLICATE_DAY_WARNING, duplicate_day_warnings};
