//! Batch runner configuration

use serde::Deserialize;

/// Batch runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info,extraction_audit=debug,sqlx=warn".to_string()
}
