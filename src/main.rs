//! Server entry-point: loads settings, opens the database, provisions the
//! default admin and serves the ledger.

use std::env;
use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use courier_ledger::api::{AppState, create_router};
use courier_ledger::config::{CONFIG_PATH_ENV, ConfigLoader, DEFAULT_CONFIG_PATH};
use courier_ledger::error::LedgerError;
use courier_ledger::store::{Database, ensure_default_admin};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loader = match ConfigLoader::load(&config_path) {
        Ok(loader) => loader,
        Err(LedgerError::ConfigNotFound { path }) => {
            warn!(path = %path, "Configuration file not found, using defaults");
            ConfigLoader::from_config(Default::default())
        }
        Err(e) => return Err(e.into()),
    };
    let config = loader.with_env_overrides()?.into_config();

    let db = Database::connect(&config.database).await?;
    ensure_default_admin(&db, &config.bootstrap_admin, config.security.bcrypt_cost).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    if !config.session.secure {
        warn!("Session cookies are not marked Secure; use only behind plain HTTP for development");
    }

    let app = create_router(AppState::new(db, config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Courier ledger listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
