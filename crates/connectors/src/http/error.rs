use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}
