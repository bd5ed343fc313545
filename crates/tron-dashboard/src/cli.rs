//! Command line interface

use clap::{Parser, Subcommand};
use tron_config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "tron-dashboard", version, about = "Log page for the TRON Common API")]
pub struct Cli {
    /// Base URL of the TRON Common API (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Follow the current logfile
    Tail {
        /// Number of lines kept in memory
        #[arg(long)]
        max_lines: Option<usize>,

        /// Polling interval in milliseconds
        #[arg(long)]
        refresh_ms: Option<u64>,
    },

    /// List archived logfiles
    Past,
}

impl Cli {
    /// Fold command line overrides into the loaded config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Command::Tail {
            max_lines,
            refresh_ms,
        } = &self.command
        {
            if let Some(max_lines) = max_lines {
                config.max_lines = *max_lines;
            }
            if let Some(refresh_ms) = refresh_ms {
                config.refresh_rate_ms = *refresh_ms;
            }
        }
    }
}
