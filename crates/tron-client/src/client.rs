//! TRON log client trait
//!
//! This module defines the core `TronLogClient` trait that all client
//! implementations must satisfy.

use crate::error::ClientError;
use crate::types::{ByteRange, LogfileChunk, PastLogfile};
use async_trait::async_trait;
use std::sync::Arc;

/// TRON Common API log client
///
/// Defines the interface to the log endpoints of the TRON Common API.
/// Implementations can hit the API directly or be test doubles.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use tron_client::{ByteRange, TronLogClient};
///
/// async fn tail(client: &dyn TronLogClient) -> Result<String, tron_client::ClientError> {
///     let chunk = client.fetch_current_logfile(ByteRange::Suffix(1024)).await?;
///     Ok(String::from_utf8_lossy(&chunk.body).into_owned())
/// }
/// ```
#[async_trait]
pub trait TronLogClient: Send + Sync {
    /// Fetch a byte range of the current logfile
    ///
    /// Issues exactly one GET carrying `range` as the `Range` header.
    ///
    /// # Returns
    ///
    /// The status, the raw `Content-Range` header (if any) and the body of
    /// a 2xx response. Any other status is returned as
    /// `ClientError::Status`; a rotated logfile shows up as status 416.
    async fn fetch_current_logfile(&self, range: ByteRange) -> Result<LogfileChunk, ClientError>;

    /// Fetch the full listing of archived logfiles
    ///
    /// The endpoint is not paginated; the whole listing is returned.
    async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError>;
}

#[async_trait]
impl<T: TronLogClient + ?Sized> TronLogClient for Arc<T> {
    async fn fetch_current_logfile(&self, range: ByteRange) -> Result<LogfileChunk, ClientError> {
        (**self).fetch_current_logfile(range).await
    }

    async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
        (**self).fetch_past_logfiles().await
    }
}
