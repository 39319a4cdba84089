use crate::http::error::TransportError;
use async_trait::async_trait;

/// The single seam between the submitter and the backend.
#[async_trait]
pub trait BatchTransport: Send + Sync {
    /// POSTs `body` to `path` and returns the decoded JSON answer.
    ///
    /// Application-level rejections (`{ "error": ... }`) come back as `Ok`;
    /// only a missing or unreadable response is an `Err`.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;
}
