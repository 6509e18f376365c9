//! Response types for the ledger web server.
//!
//! This module defines the JSON error body used by `/api/*`, and the HTML
//! rendering of [`LedgerError`] used by the browser routes.

use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::render::html::{PageContext, error_page};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// HTTP status for an error.
pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::Validation { .. } => StatusCode::BAD_REQUEST,
        LedgerError::DuplicateEmail { .. } => StatusCode::CONFLICT,
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::Forbidden { .. } => StatusCode::FORBIDDEN,
        LedgerError::Unauthenticated | LedgerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        LedgerError::ConfigNotFound { .. }
        | LedgerError::ConfigParseError { .. }
        | LedgerError::CorruptRecord { .. }
        | LedgerError::Database(_)
        | LedgerError::Migration(_)
        | LedgerError::PasswordHash(_)
        | LedgerError::Session { .. }
        | LedgerError::Pdf { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message safe to show a client. Internal failures are reduced to a
/// generic sentence; their details go to the log only.
fn public_message(error: &LedgerError) -> String {
    if status_for(error).is_server_error() {
        "Something went wrong; please try again".to_string()
    } else {
        error.to_string()
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!(error = %error, "Request failed");
        }

        let code = match &error {
            LedgerError::Validation { .. } => "VALIDATION_ERROR",
            LedgerError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            LedgerError::NotFound { .. } => "NOT_FOUND",
            LedgerError::Forbidden { .. } => "FORBIDDEN",
            LedgerError::Unauthenticated => "UNAUTHENTICATED",
            LedgerError::InvalidCredentials => "INVALID_CREDENTIALS",
            _ => "INTERNAL_ERROR",
        };

        let body = match &error {
            LedgerError::Validation { field, message } => ApiError::with_details(
                code,
                public_message(&error),
                format!("Field '{}': {}", field, message),
            ),
            _ => ApiError::new(code, public_message(&error)),
        };

        ApiErrorResponse {
            status,
            error: body,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        if matches!(self, LedgerError::Unauthenticated) {
            return Redirect::to("/login").into_response();
        }

        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let ctx = PageContext {
            viewer: None,
            flashes: &[],
        };
        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(error_page(&ctx, title, &public_message(&self)))).into_response()
    }
}
