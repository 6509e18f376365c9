//! Configuration types for the courier ledger.
//!
//! These types are deserialized from the YAML settings file. Every section
//! has defaults so a partial file (or none at all, in tests) is usable.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{DEFAULT_GST_RATE, DEFAULT_VAN_RENT};

/// The complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Session cookie settings.
    pub session: SessionConfig,
    /// Invoice defaults.
    pub invoice: InvoiceConfig,
    /// Credential hashing settings.
    pub security: SecurityConfig,
    /// Administrator created on first start when none exists.
    pub bootstrap_admin: BootstrapAdminConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://ledger.db?mode=rwc`.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://ledger.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name.
    pub cookie_name: String,
    /// Only send the cookie over HTTPS.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "ledger_session".to_string(),
            secure: true,
        }
    }
}

/// Invoice defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// GST rate applied to every invoice.
    pub gst_rate: Decimal,
    /// Van rent used when the form leaves it blank.
    pub van_rent: Decimal,
    /// How many recent entries the admin dashboard lists.
    pub recent_entries_limit: u32,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            gst_rate: DEFAULT_GST_RATE,
            van_rent: DEFAULT_VAN_RENT,
            recent_entries_limit: 50,
        }
    }
}

/// Credential hashing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// bcrypt work factor (4..=31).
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Administrator provisioned when the database has none.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapAdminConfig {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password; change it after first login.
    pub password: String,
    /// Amount paid per package.
    pub price_per_pkg: Decimal,
    /// Superannuation rate as a fraction.
    pub super_rate: Decimal,
}

impl Default for BootstrapAdminConfig {
    fn default() -> Self {
        Self {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            price_per_pkg: Decimal::new(15, 1),
            super_rate: Decimal::new(115, 3),
        }
    }
}
