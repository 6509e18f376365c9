//! Application state for the ledger web server.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::Database;

/// Shared application state.
///
/// Holds the database pool and the loaded settings. Cloning is cheap; the
/// pool is reference counted and the settings sit behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    /// The ledger database.
    db: Database,
    /// The loaded application settings.
    config: Arc<AppConfig>,
}

impl AppState {
    /// Creates a new application state from a connected database and settings.
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Returns the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the application settings.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
