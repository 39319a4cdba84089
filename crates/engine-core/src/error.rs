use crate::session::SessionState;
use connectors::{file::error::ParseError, http::error::TransportError};
use model::error::ModelError;
use thiserror::Error;

/// Failures of a submission as a whole. Per-row failures are not errors;
/// they travel inside `BatchResult`.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered `{ "error": ... }` for the whole batch.
    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    MalformedResult(#[from] ModelError),

    #[error("Nothing to submit")]
    EmptyBatch,

    #[error("Submission cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot {action} while session is {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    /// Submit pressed with zero records; no request is made.
    #[error("No valid records to submit")]
    EmptyBatch,

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Session has been closed")]
    Closed,

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Submit(#[from] SubmitError),
}
