//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Dataset configuration.
    pub dataset: DatasetConfig,
    /// Report configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the ledger dataset is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Path to the JSON dataset file.
    pub path: String,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Fixed evaluation date. Falls back to the system clock when unset.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Decimal places for displayed percentages.
    #[serde(default = "default_percentage_scale")]
    pub percentage_scale: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            today: None,
            percentage_scale: default_percentage_scale(),
        }
    }
}

fn default_percentage_scale() -> u32 {
    2
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "budgetline=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("BUDGETLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("BUDGETLINE__DATASET__PATH", Some("data/ledger.json")),
                ("BUDGETLINE__REPORT__TODAY", Some("2024-03-01")),
                ("BUDGETLINE__REPORT__PERCENTAGE_SCALE", Some("4")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.dataset.path, "data/ledger.json");
                assert_eq!(
                    config.report.today,
                    NaiveDate::from_ymd_opt(2024, 3, 1)
                );
                assert_eq!(config.report.percentage_scale, 4);
                assert_eq!(config.log.filter, "budgetline=info");
            },
        );
    }

    #[test]
    fn test_report_defaults() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("BUDGETLINE__DATASET__PATH", Some("ledger.json")),
                ("BUDGETLINE__REPORT__TODAY", None),
                ("BUDGETLINE__REPORT__PERCENTAGE_SCALE", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(config.report.today.is_none());
                assert_eq!(config.report.percentage_scale, 2);
            },
        );
    }

    #[test]
    fn test_missing_dataset_path_is_an_error() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("BUDGETLINE__DATASET__PATH", None::<&str>),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
