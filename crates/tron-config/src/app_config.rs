//! Application configuration
//!
//! Configuration loaded from .tron-dashboard.toml, with environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration loaded from .tron-dashboard.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the TRON Common API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Path of the current logfile endpoint
    #[serde(default = "default_current_logfile_path")]
    pub current_logfile_path: String,

    /// Path of the archived logfiles listing endpoint
    #[serde(default = "default_past_logfiles_path")]
    pub past_logfiles_path: String,

    /// Maximum number of log lines kept in memory
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Polling interval of the log page in milliseconds
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,

    /// Size of the tail fetched when (re)starting to follow the log
    #[serde(default = "default_tail_bytes")]
    pub tail_bytes: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_current_logfile_path() -> String {
    "/api/v1/logfiles/current".to_string()
}

fn default_past_logfiles_path() -> String {
    "/api/v1/logfiles".to_string()
}

fn default_max_lines() -> usize {
    1000
}

fn default_refresh_rate_ms() -> u64 {
    2000
}

fn default_tail_bytes() -> u64 {
    10 * 1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            current_logfile_path: default_current_logfile_path(),
            past_logfiles_path: default_past_logfiles_path(),
            max_lines: default_max_lines(),
            refresh_rate_ms: default_refresh_rate_ms(),
            tail_bytes: default_tail_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults.
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Apply `TRON_API_URL`, `TRON_LOG_MAX_LINES` and `TRON_LOG_REFRESH_MS`
    ///
    /// `lookup` resolves a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TRON_API_URL") {
            log::debug!("TRON_API_URL overrides api_url");
            self.api_url = url;
        }
        if let Some(value) = lookup("TRON_LOG_MAX_LINES") {
            self.max_lines = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid TRON_LOG_MAX_LINES: {}", value))?;
        }
        if let Some(value) = lookup("TRON_LOG_REFRESH_MS") {
            self.refresh_rate_ms = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid TRON_LOG_REFRESH_MS: {}", value))?;
        }
        Ok(())
    }

    pub fn refresh_rate(&self) -> Duration {
        Duration::from_millis(self.refresh_rate_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
