//! Subcommand implementations

use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;
use tron_client::ReqwestLogClient;
use tron_config::AppConfig;
use tron_log_tail::{CurrentLogfile, FetchOutcome, LogTailPoller, LogTailState, PastLogfiles};

fn build_client(config: &AppConfig) -> Result<ReqwestLogClient> {
    ReqwestLogClient::builder(&config.api_url)
        .current_logfile_path(&config.current_logfile_path)
        .past_logfiles_path(&config.past_logfiles_path)
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build TRON API client")
}

/// Lines to print for an outcome: the newly received tail of the buffer
fn new_lines(outcome: &FetchOutcome, buffer: &[String]) -> usize {
    match outcome {
        FetchOutcome::Appended(received) => (*received).min(buffer.len()),
        FetchOutcome::Rotated | FetchOutcome::Failed(_) => 0,
    }
}

/// Follow the current logfile until Ctrl-C
pub async fn tail(config: &AppConfig) -> Result<()> {
    let client = build_client(config)?;
    let state = LogTailState::with_max_lines(config.max_lines).refresh_rate(config.refresh_rate());
    let logfile = Arc::new(CurrentLogfile::new(client, state).tail_bytes(config.tail_bytes));

    info!(
        "Following current logfile at {} every {:?}",
        config.api_url,
        config.refresh_rate()
    );

    let reader = Arc::clone(&logfile);
    let mut last_error: Option<String> = None;
    let poller = LogTailPoller::spawn(Arc::clone(&logfile), move |outcome| {
        match outcome {
            FetchOutcome::Failed(message) => {
                // Report each distinct failure once while it persists
                if last_error.as_deref() != Some(message.as_str()) {
                    eprintln!("log unavailable: {}", message);
                    last_error = Some(message.clone());
                }
                return;
            }
            FetchOutcome::Rotated => info!("Logfile rotated"),
            FetchOutcome::Appended(_) => {}
        }
        if last_error.take().is_some() {
            info!("Log available again");
        }

        let buffer = reader.current_log();
        let count = new_lines(outcome, &buffer);
        for line in &buffer[buffer.len() - count..] {
            println!("{}", line);
        }
    });

    tokio::select! {
        result = poller.join() => {
            result.context("Current logfile endpoint violated the range contract")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping");
        }
    }

    Ok(())
}

/// Print the archived logfiles, one per line
pub async fn past(config: &AppConfig) -> Result<()> {
    let lister = PastLogfiles::new(build_client(config)?);
    let files = lister
        .fetch_and_store_past_logfiles()
        .await
        .context("Failed to fetch past logfiles")?;

    if files.is_empty() {
        warn!("No archived logfiles");
    }
    for file in files {
        println!("{}\t{}", file.name, file.download_uri);
    }
    Ok(())
}
