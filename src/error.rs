//! Error types for the courier ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the ledger can surface, from form validation through
//! storage and PDF export.

use thiserror::Error;

/// The main error type for the courier ledger.
///
/// Every fallible operation in the crate returns this error type, so web
/// handlers can map failures to responses in a single place.
///
/// # Example
///
/// ```
/// use courier_ledger::error::LedgerError;
///
/// let error = LedgerError::Validation {
///     field: "packages".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid value for 'packages': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A submitted field could not be parsed or violated a constraint.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The form or JSON field that was invalid.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// The requested record does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// The kind of record, e.g. "Entry".
        resource: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The caller is authenticated but not allowed to perform the action.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Why access was denied.
        reason: String,
    },

    /// No session identity is attached to the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Email/password pair did not match a user.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// A user with this email already exists.
    #[error("A user with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting email.
        email: String,
    },

    /// A stored value could not be decoded into a domain type.
    #[error("Corrupt stored value for '{field}': {message}")]
    CorruptRecord {
        /// The column that held the bad value.
        field: String,
        /// A description of the decoding failure.
        message: String,
    },

    /// The database rejected a query or was unreachable.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing or verification failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// The session store could not be read or written.
    #[error("Session error: {message}")]
    Session {
        /// A description of the session failure.
        message: String,
    },

    /// The PDF document could not be produced.
    #[error("PDF generation failed: {message}")]
    Pdf {
        /// A description of the PDF failure.
        message: String,
    },
}

impl LedgerError {
    /// Shorthand for a [`LedgerError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`LedgerError::Forbidden`] error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}

impl From<tower_sessions::session::Error> for LedgerError {
    fn from(error: tower_sessions::session::Error) -> Self {
        Self::Session {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
