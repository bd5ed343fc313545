use anyhow::Result;
use clap::Parser;
use tron_config::AppConfig;

mod cli;
mod commands;
mod logger;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();
    logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    cli.apply_to(&mut config);
    log::debug!("Effective config: {:?}", config);

    match cli.command {
        Command::Tail { .. } => commands::tail(&config).await,
        Command::Past => commands::past(&config).await,
    }
}
