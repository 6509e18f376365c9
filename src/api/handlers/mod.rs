//! HTTP request handlers for the ledger web server.
//!
//! Browser routes return HTML and redirect; `/api/*` returns JSON. Every
//! protected handler takes a [`CurrentUser`](super::CurrentUser) and calls
//! [`access::require`](crate::access::require) before touching data.

mod admin;
mod auth;
mod dashboard;
mod entries;
mod health;
mod invoice;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

pub use invoice::build_invoice;

use super::state::AppState;

/// Creates the router with every route, the session layer and request tracing.
pub fn create_router(state: AppState) -> Router {
    let session = &state.config().session;
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(session.cookie_name.clone());

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/", get(dashboard::dashboard))
        .route("/entry/new", get(entries::new_entry_page).post(entries::create_entry))
        .route("/entry/:id/edit", get(entries::edit_entry_page).post(entries::update_entry))
        .route("/admin/entry/:id/comment", post(entries::comment_entry))
        .route("/admin/users", get(admin::users_page).post(admin::create_user))
        .route("/admin/users/:id", post(admin::update_user))
        .route("/invoice", get(invoice::invoice_page).post(invoice::invoice_preview))
        .route("/invoice/pdf", get(invoice::invoice_pdf))
        .route("/api/invoice", post(invoice::invoice_json))
        .route("/health", get(health::health))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
