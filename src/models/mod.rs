//! Core data models for the courier ledger.
//!
//! This module contains all the domain models used throughout the crate.

mod entry;
mod invoice;
mod user;

pub use entry::{DailyEntry, EntryFields, EntryWithWorker};
pub use invoice::{
    Breakdown, DEFAULT_GST_RATE, DEFAULT_VAN_RENT, Invoice, InvoiceInput, InvoicePeriod,
    InvoiceWarning,
};
pub use user::{Identity, NewUser, Role, User, UserRates, normalize_email};
