use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a record batch reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStrategy {
    /// One call carrying every record; the server partitions success/failure.
    Batch,
    /// One call per record, in input order, one in flight at a time.
    Sequential,
}

impl fmt::Display for SubmitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStrategy::Batch => f.write_str("batch"),
            SubmitStrategy::Sequential => f.write_str("sequential"),
        }
    }
}

impl FromStr for SubmitStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(SubmitStrategy::Batch),
            "sequential" | "loop" => Ok(SubmitStrategy::Sequential),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }
}
