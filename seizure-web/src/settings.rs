//! Service settings loaded from defaults, an optional TOML file and
//! `SEIZURE_DASHBOARD__*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use seizure_core::DashboardConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_WORKBOOK: &str = "sample.xlsx";
pub const DEFAULT_LOG_FILTER: &str = "info,seizure_web=debug";
const DEFAULT_CONFIG_FILE: &str = "seizure-dashboard";
const ENV_PREFIX: &str = "SEIZURE_DASHBOARD";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the HTTP server listens on.
    pub bind: String,
    /// Workbook re-read on every request.
    pub workbook_path: PathBuf,
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Settings {
    /// Load settings; without an explicit file, `seizure-dashboard.toml` is
    /// used if present in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("bind", DEFAULT_BIND)?
            .set_default("workbook_path", DEFAULT_WORKBOOK)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }
}
