use crate::file::error::ParseError;
use model::records::row::ImportRow;
use serde_json::Value as Json;

/// Parses a JSON array of objects, or a single object, into rows.
///
/// Scalars are kept as their string form so that `"3"` and `3` reach the
/// validator identically. `null` leaves the field out.
pub fn parse_json_rows(text: &str) -> Result<Vec<ImportRow>, ParseError> {
    let value: Json = serde_json::from_str(text)?;
    let entries = match value {
        Json::Array(items) => items,
        single => vec![single],
    };

    let mut rows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Json::Object(obj) = entry else {
            return Err(ParseError::NotAnObject { index });
        };
        let fields = obj
            .into_iter()
            .filter_map(|(name, value)| raw_string(value).map(|v| (name, v)))
            .collect::<Vec<_>>();
        rows.push(ImportRow::new(index, fields));
    }

    if rows.is_empty() {
        return Err(ParseError::NoValidRows);
    }
    Ok(rows)
}

fn raw_string(value: Json) -> Option<String> {
    match value {
        Json::Null => None,
        Json::String(s) => Some(s.trim().to_string()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
