use serde::Serialize;
use std::fmt;

/// How a field's raw string is coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    /// Strict integer parse; non-numeric input rejects the row.
    Integer,
    /// Integer code restricted to the listed values.
    Enum(Vec<i64>),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("text"),
            FieldKind::Integer => f.write_str("integer"),
            FieldKind::Enum(codes) => {
                let codes = codes
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join("|");
                write!(f, "enum({codes})")
            }
        }
    }
}

/// One expected field in an import schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Canonical name in the validated record (and on the wire).
    pub name: String,
    /// Column name in the input. Usually equal to `name`.
    pub source: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: &str) -> Self {
        FieldSpec {
            name: name.to_string(),
            source: name.to_string(),
            required: true,
            kind: FieldKind::Text,
        }
    }

    pub fn integer(name: &str) -> Self {
        FieldSpec {
            kind: FieldKind::Integer,
            ..Self::text(name)
        }
    }

    pub fn code(name: &str, allowed: &[i64]) -> Self {
        FieldSpec {
            kind: FieldKind::Enum(allowed.to_vec()),
            ..Self::text(name)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn from_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }
}

/// Routes one input column into exactly one of several mutually exclusive
/// fields, chosen by the integer code in `selector`.
///
/// The targets that are not selected stay absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSplit {
    pub selector: String,
    pub source: String,
    pub variants: Vec<(i64, String)>,
}

impl RoleSplit {
    pub fn target_for(&self, code: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, target)| target.as_str())
    }
}

/// Shape of CSV input for a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CsvLayout {
    /// First line holds the field names.
    Headered,
    /// No header; columns are read in `columns` order. Lines with fewer than
    /// `min_tokens` tokens are dropped.
    Positional {
        columns: Vec<String>,
        min_tokens: usize,
    },
}
