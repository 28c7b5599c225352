pub mod config;
mod export;
pub mod logo;
pub mod pdf;
pub mod raster;

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

pub use crate::config::{Config, ConfigError};
pub use crate::export::{export, export_with};

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Loads the configuration. Later calls keep the first successful load.
pub fn init() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::load()?;
    tracing::info!(
        company = %config.branding.company_name,
        logo = config.branding.logo.is_some(),
        "loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

/// The loaded configuration, or the defaults when [`init`] was never called.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Another subscriber may already be installed by the framework.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
