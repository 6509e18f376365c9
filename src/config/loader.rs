//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger
//! settings from a YAML file and layering environment overrides on top.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

use super::types::AppConfig;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "LEDGER_CONFIG";

/// Settings file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./config/ledger.yaml";

/// Loads and provides access to application configuration.
///
/// # Overrides
///
/// After the file is parsed these environment variables win over it:
///
/// ```text
/// DATABASE_URL      database.url
/// PORT              server.port
/// SESSION_SECURE    session.cookie secure flag ("true"/"false")
/// GST_RATE          invoice.gst_rate
/// ```
///
/// # Example
///
/// ```no_run
/// use courier_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ledger.yaml")?.with_env_overrides()?;
/// println!("Listening on port {}", loader.config().server.port);
/// # Ok::<(), courier_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if the file is missing
    /// or is not valid YAML for [`AppConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            LedgerError::ConfigParseError { message, .. } => LedgerError::ConfigParseError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> LedgerResult<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        check_gst_rate("<inline>", config.invoice.gst_rate)?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> LedgerResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup (the environment in
    /// production, a map in tests).
    pub fn with_overrides<F>(mut self, lookup: F) -> LedgerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.config.database.url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.config.server.port = port.trim().parse().map_err(|_| {
                LedgerError::ConfigParseError {
                    path: "PORT".to_string(),
                    message: format!("'{}' is not a valid port", port),
                }
            })?;
        }
        if let Some(secure) = lookup("SESSION_SECURE") {
            self.config.session.secure = match secure.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(LedgerError::ConfigParseError {
                        path: "SESSION_SECURE".to_string(),
                        message: format!("'{}' is not a boolean", other),
                    });
                }
            };
        }
        if let Some(rate) = lookup("GST_RATE") {
            self.config.invoice.gst_rate = Decimal::from_str(rate.trim()).map_err(|e| {
                LedgerError::ConfigParseError {
                    path: "GST_RATE".to_string(),
                    message: e.to_string(),
                }
            })?;
            check_gst_rate("GST_RATE", self.config.invoice.gst_rate)?;
        }
        Ok(self)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

/// GST must be a fraction between 0 and 1.
fn check_gst_rate(path: &str, rate: Decimal) -> LedgerResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(LedgerError::ConfigParseError {
            path: path.to_string(),
            message: format!("gst_rate {} must be between 0 and 1", rate),
        });
    }
    Ok(())
}
