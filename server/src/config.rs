use std::{path::Path, time::Duration};

use config::{Environment, File, Source};
use serde::Deserialize;
use thiserror::Error;
use types::chart::Rgb;

use crate::{logo::LogoPolicy, raster::MAX_DIMENSION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("chart size {0}x{1} must be within 1..={MAX_DIMENSION}")]
    ChartSize(u32, u32),
    #[error("export.logo_attempts must be at least 1")]
    NoLogoAttempts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub branding: Branding,
    pub export: ExportSettings,
}

/// What goes into the header and footer of every exported document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub company_name: String,
    /// Printed under the company name. Only the first two lines fit the header.
    pub address_lines: Vec<String>,
    pub brand_color: Rgb,
    /// `http(s)://` or `file://` URL, or a plain path.
    pub logo: Option<String>,
    pub confidentiality: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "Airdesk Networks".into(),
            address_lines: vec![
                "100 Harbor Way, Suite 400".into(),
                "Portland, OR 97209".into(),
            ],
            brand_color: Rgb(0x1f, 0x4e, 0x79),
            logo: None,
            confidentiality: "Confidential - for internal use only".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub chart_width: u32,
    pub chart_height: u32,
    pub logo_timeout_ms: u64,
    pub logo_attempts: u32,
    pub logo_backoff_ms: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            chart_width: 1200,
            chart_height: 600,
            logo_timeout_ms: 5_000,
            logo_attempts: 3,
            logo_backoff_ms: 500,
        }
    }
}

impl ExportSettings {
    pub fn logo_policy(&self) -> LogoPolicy {
        LogoPolicy {
            timeout: Duration::from_millis(self.logo_timeout_ms),
            attempts: self.logo_attempts,
            backoff: Duration::from_millis(self.logo_backoff_ms),
        }
    }
}

/// `AIRDESK_` followed by the key path joined with `__`.
fn environment() -> Environment {
    Environment::with_prefix("AIRDESK")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("branding.address_lines")
        .try_parsing(true)
}

impl Config {
    /// Defaults, then `airdesk.toml` if present, then `AIRDESK_*` variables
    /// (`AIRDESK_BRANDING__COMPANY_NAME`, ...).
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name("airdesk").required(false), environment())
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true), environment())
    }

    fn build(
        file: impl Source + Send + Sync + 'static,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let config: Config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.export.chart_width, self.export.chart_height);
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(ConfigError::ChartSize(width, height));
        }
        if self.export.logo_attempts == 0 {
            return Err(ConfigError::NoLogoAttempts);
        }
        Ok(())
    }
}
