// src/config.rs

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Snapshot,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub snapshot_path: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Directory for the daily rolling log file. Console only when unset.
    pub directory: Option<String>,
    pub file_prefix: String,
    pub filter: String,
}

/// Saved preferences and data-source settings.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Default target for `calc` and `size`.
    pub target_loss_percent: Decimal,
    /// Default threshold for `scan`.
    pub monitor_threshold_percent: Decimal,
    pub source: SourceConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Defaults, then the optional settings file, then `APP_*` variables
    /// (`APP_SOURCE__KIND=http`).
    pub fn load(settings_path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("target_loss_percent", "20")?
            .set_default("monitor_threshold_percent", "20")?
            .set_default("source.kind", "snapshot")?
            .set_default("source.snapshot_path", "page_snapshot.json")?
            .set_default("source.timeout_secs", 10)?
            .set_default("log.file_prefix", "avg-down.log")?
            .set_default("log.filter", "info")?
            .add_source(File::with_name(settings_path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
