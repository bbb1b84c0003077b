// crates/shopdash-core/src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::DEFAULT_TOP_N;
use crate::error::Result;
use crate::report::ReportOptions;

pub const SOURCE_ENV: &str = "SHOPDASH_SOURCE";
pub const TOP_N_ENV: &str = "SHOPDASH_TOP_N";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: Option<PathBuf>,
    pub top_n: usize,
    pub log_json: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: None,
            top_n: DEFAULT_TOP_N,
            log_json: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Applies `SHOPDASH_SOURCE` and `SHOPDASH_TOP_N` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(source) = lookup(SOURCE_ENV).filter(|value| !value.trim().is_empty()) {
            self.source = Some(PathBuf::from(source));
        }
        if let Some(raw) = lookup(TOP_N_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(top_n) => self.top_n = top_n,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid {TOP_N_ENV}"),
            }
        }
        self
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions { top_n: self.top_n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = DashboardConfig::from_toml_str("source = \"sales.csv\"\n").unwrap();

        assert_eq!(config.source, Some(PathBuf::from("sales.csv")));
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert!(!config.log_json);
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = DashboardConfig::from_toml_str("top_n = 3\nlog_json = true\n")
            .unwrap()
            .apply_env(|key| match key {
                SOURCE_ENV => Some("/data/sales.csv".to_string()),
                TOP_N_ENV => Some("5".to_string()),
                _ => None,
            });

        assert_eq!(config.source, Some(PathBuf::from("/data/sales.csv")));
        assert_eq!(config.report_options().top_n, 5);
        assert!(config.log_json);
    }

    #[test]
    fn invalid_top_n_is_ignored() {
        let config = DashboardConfig::default().apply_env(|key| {
            (key == TOP_N_ENV).then(|| "many".to_string())
        });

        assert_eq!(config.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = DashboardConfig::from_toml_str("top_n = \"ten\"").unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::Config(_)));
    }
}
