use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Unsupported input type: {0} (expected text/csv or application/json)")]
    UnsupportedFormat(String),
    #[error("File is not valid UTF-8: {0}")]
    NotUtf8(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Terminal parse failures. Nothing reaches the preview when one of these
/// is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("CSV is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No valid rows found in input")]
    NoValidRows,
}
