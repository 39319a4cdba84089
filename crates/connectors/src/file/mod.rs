pub mod csv;
pub mod error;
pub mod input;
pub mod json;

use crate::file::{
    csv::{parser::CsvParser, settings::CsvSettings},
    error::ParseError,
    input::{InputFormat, RawInput},
    json::parser::parse_json_rows,
};
use model::{records::row::ImportRow, schema::resource::ImportSchema};
use tracing::debug;

/// Turns raw input text into ordered rows for `schema`.
pub fn parse_rows(input: &RawInput, schema: &ImportSchema) -> Result<Vec<ImportRow>, ParseError> {
    parse_text(&input.text, input.format, schema)
}

pub fn parse_text(
    text: &str,
    format: InputFormat,
    schema: &ImportSchema,
) -> Result<Vec<ImportRow>, ParseError> {
    let rows = match format {
        InputFormat::Csv => CsvParser::new(CsvSettings::default()).parse(text, schema)?,
        InputFormat::Json => parse_json_rows(text)?,
    };

    debug!(
        "Parsed {} row(s) of {} input for '{}'",
        rows.len(),
        format,
        schema.resource
    );
    Ok(rows)
}
