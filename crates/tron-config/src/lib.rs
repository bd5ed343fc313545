//! Configuration for the TRON dashboard
//!
//! This crate provides:
//! - Configuration file discovery (TOML, CWD first, then home directory)
//! - Application configuration (AppConfig) with environment overrides

pub mod app_config;
pub mod config_file;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, CONFIG_FILE};
