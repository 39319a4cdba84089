use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the validator dropped a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    MissingField(String),
    NotAnInteger { field: String, value: String },
    CodeNotAllowed { field: String, code: i64 },
    UnknownRole { selector: String, code: i64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing required field '{field}'"),
            RejectReason::NotAnInteger { field, value } => {
                write!(f, "field '{field}' is not an integer: '{value}'")
            }
            RejectReason::CodeNotAllowed { field, code } => {
                write!(f, "field '{field}' has unsupported code {code}")
            }
            RejectReason::UnknownRole { selector, code } => {
                write!(f, "no identity field for {selector} = {code}")
            }
        }
    }
}

/// A row that failed validation. Rejections are logged and counted, never
/// forwarded to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// Index of the `ImportRow` that was dropped.
    pub index: usize,
    pub reason: RejectReason,
}

impl RejectedRow {
    pub fn new(index: usize, reason: RejectReason) -> Self {
        RejectedRow { index, reason }
    }

    pub fn missing(index: usize, field: &str) -> Self {
        Self::new(index, RejectReason::MissingField(field.to_string()))
    }
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.index + 1, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_one_based_row() {
        let rejected = RejectedRow::new(
            2,
            RejectReason::NotAnInteger {
                field: "batch".into(),
                value: "twenty".into(),
            },
        );
        assert_eq!(
            rejected.to_string(),
            "row 3: field 'batch' is not an integer: 'twenty'"
        );
    }

    #[test]
    fn test_missing_helper() {
        let rejected = RejectedRow::missing(0, "email");
        assert_eq!(rejected.reason, RejectReason::MissingField("email".into()));
    }
}
