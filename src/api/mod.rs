//! HTTP layer for the courier ledger.
//!
//! This module provides the browser routes (login, entries, user
//! administration, invoices and PDF export) and the JSON invoice endpoint.

mod extract;
mod handlers;
mod request;
mod response;
mod state;

pub use extract::{CurrentUser, load_current_user};
pub use handlers::{build_invoice, create_router};
pub use request::{
    CommentForm, CreateUserForm, EntryForm, InvoiceForm, InvoiceParams, InvoiceRequest, LoginForm,
    UpdateUserForm,
};
pub use response::{ApiError, ApiErrorResponse, status_for};
pub use state::AppState;
