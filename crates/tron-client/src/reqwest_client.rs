//! Reqwest-based TRON log client
//!
//! Direct implementation of the `TronLogClient` trait using reqwest.
//! This client makes real HTTP calls without any caching or retries.

use crate::client::TronLogClient;
use crate::error::ClientError;
use crate::types::{ByteRange, LogfileChunk, PastLogfile};
use crate::{DEFAULT_CURRENT_LOGFILE_PATH, DEFAULT_PAST_LOGFILES_PATH};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{CONTENT_RANGE, RANGE};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Direct TRON log API client using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestLogClient {
    http: reqwest::Client,
    base_url: String,
    current_logfile_path: String,
    past_logfiles_path: String,
}

/// Builder for `ReqwestLogClient`
#[derive(Debug, Clone)]
pub struct ReqwestLogClientBuilder {
    base_url: String,
    current_logfile_path: String,
    past_logfiles_path: String,
    timeout: Duration,
}

impl ReqwestLogClientBuilder {
    /// Path of the current logfile endpoint, relative to the base URL
    pub fn current_logfile_path(mut self, path: impl Into<String>) -> Self {
        self.current_logfile_path = path.into();
        self
    }

    /// Path of the archived logfiles listing, relative to the base URL
    pub fn past_logfiles_path(mut self, path: impl Into<String>) -> Self {
        self.past_logfiles_path = path.into();
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ReqwestLogClient, ClientError> {
        let base = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(self.base_url));
        }

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(ReqwestLogClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            current_logfile_path: self.current_logfile_path,
            past_logfiles_path: self.past_logfiles_path,
        })
    }
}

impl ReqwestLogClient {
    /// Create a client with the default endpoint paths and timeout
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::builder(base_url).build()
    }

    /// Start building a client for the given base URL
    pub fn builder(base_url: &str) -> ReqwestLogClientBuilder {
        ReqwestLogClientBuilder {
            base_url: base_url.to_string(),
            current_logfile_path: DEFAULT_CURRENT_LOGFILE_PATH.to_string(),
            past_logfiles_path: DEFAULT_PAST_LOGFILES_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turn any non-2xx response into `ClientError::Status`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is only used for the message, so a failed read is not fatal
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    } else {
        body.trim().to_string()
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TronLogClient for ReqwestLogClient {
    async fn fetch_current_logfile(&self, range: ByteRange) -> Result<LogfileChunk, ClientError> {
        let url = self.url(&self.current_logfile_path);
        debug!("Fetching current logfile {} ({})", url, range);

        let response = self
            .http
            .get(&url)
            .header(RANGE, range.to_string())
            .send()
            .await?;
        let response = check_status(response).await?;

        let status = response.status().as_u16();
        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(
            "Fetched {} bytes of current logfile (status {}, Content-Range {:?})",
            body.len(),
            status,
            content_range
        );

        Ok(LogfileChunk {
            status,
            content_range,
            body,
        })
    }

    async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
        let url = self.url(&self.past_logfiles_path);
        debug!("Fetching past logfiles from {}", url);

        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let files: Vec<PastLogfile> = serde_json::from_slice(&body)?;

        debug!("Fetched {} past logfiles", files.len());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = ReqwestLogClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/api/v1/logfiles/current"),
            "http://localhost:8080/api/v1/logfiles/current"
        );
        assert_eq!(client.url("logs"), "http://localhost:8080/logs");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = ReqwestLogClient::new("not a url").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_builder_overrides_paths() {
        let client = ReqwestLogClient::builder("https://tron.example.com/common")
            .current_logfile_path("/logs/current")
            .past_logfiles_path("/logs")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.current_logfile_path, "/logs/current");
        assert_eq!(client.past_logfiles_path, "/logs");
        assert_eq!(
            client.url(&client.current_logfile_path),
            "https://tron.example.com/common/logs/current"
        );
    }
}
