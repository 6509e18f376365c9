//! Configuration loading and management for the courier ledger.
//!
//! Settings live in a YAML file (server, database, session, invoice
//! defaults, hashing cost and the bootstrap administrator), with a small set
//! of environment overrides applied on top.
//!
//! # Example
//!
//! ```no_run
//! use courier_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ledger.yaml").unwrap();
//! println!("GST rate: {}", config.config().invoice.gst_rate);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_ENV, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use types::{
    AppConfig, BootstrapAdminConfig, DatabaseConfig, InvoiceConfig, SecurityConfig,
    ServerConfig, SessionConfig,
};
