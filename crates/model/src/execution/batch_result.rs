use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Whether a row failed on the server or never got a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Response received, record rejected.
    Application,
    /// No usable response for this record.
    Transport,
}

/// One per-row failure reported for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Value of the resource's identifying field, when the server sent one.
    pub key: Option<String>,
    /// 1-based input row, when known.
    pub row: Option<usize>,
    pub error: String,
    pub kind: FailureKind,
}

impl RowError {
    pub fn application(key: Option<String>, error: impl Into<String>) -> Self {
        RowError {
            key,
            row: None,
            error: error.into(),
            kind: FailureKind::Application,
        }
    }

    pub fn transport(key: Option<String>, error: impl Into<String>) -> Self {
        RowError {
            kind: FailureKind::Transport,
            ..Self::application(key, error)
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Outcome of one submission as reported by the backend (or aggregated by
/// the sequential loop).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: u64,
    pub failed: u64,
    pub errors: Vec<RowError>,
}

impl BatchResult {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, error: RowError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Decodes `{ results: { success, failed, errors } }`, also accepting the
    /// inner object on its own.
    ///
    /// Counts are taken literally. Error entries are free-form objects; the
    /// identifying field becomes the key and a positive `row` is kept.
    pub fn from_response(body: &Json, identifying_field: &str) -> Result<Self, ModelError> {
        let results = body.get("results").unwrap_or(body);
        if !results.is_object() {
            return Err(ModelError::MalformedResult(format!(
                "expected an object, got {results}"
            )));
        }

        let success = read_count(results, "success")?;
        let failed = read_count(results, "failed")?;

        let errors = match results.get("errors") {
            None | Some(Json::Null) => Vec::new(),
            Some(Json::Array(entries)) => entries
                .iter()
                .map(|entry| decode_row_error(entry, identifying_field))
                .collect(),
            Some(other) => {
                return Err(ModelError::MalformedResult(format!(
                    "`errors` must be an array, got {other}"
                )));
            }
        };

        Ok(BatchResult {
            success,
            failed,
            errors,
        })
    }
}

fn read_count(results: &Json, field: &str) -> Result<u64, ModelError> {
    results
        .get(field)
        .and_then(Json::as_u64)
        .ok_or_else(|| ModelError::MalformedResult(format!("missing or invalid `{field}` count")))
}

fn decode_row_error(entry: &Json, identifying_field: &str) -> RowError {
    let Some(obj) = entry.as_object() else {
        let text = entry
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| entry.to_string());
        return RowError::application(None, text);
    };

    let key = obj
        .get(identifying_field)
        .and_then(Json::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let error = obj
        .get("error")
        .or_else(|| obj.get("message"))
        .and_then(Json::as_str)
        .unwrap_or("unknown error")
        .to_string();

    let mut row_error = RowError::application(key, error);
    if let Some(row) = obj.get("row").and_then(Json::as_u64).filter(|r| *r > 0) {
        row_error = row_error.at_row(row as usize);
    }
    row_error
}
