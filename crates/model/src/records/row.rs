use serde::{Deserialize, Serialize};

/// One raw parsed line (or JSON object) before type validation.
///
/// Fields keep source order. Values are the raw strings as read; nothing is
/// coerced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Zero-based position among the rows the parser produced.
    pub index: usize,
    pub fields: Vec<(String, String)>,
}

impl ImportRow {
    pub fn new(index: usize, fields: Vec<(String, String)>) -> Self {
        ImportRow { index, fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 1-based row number as shown to users.
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}
