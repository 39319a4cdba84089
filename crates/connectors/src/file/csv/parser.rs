use crate::file::{csv::settings::CsvSettings, error::ParseError};
use model::{
    records::row::ImportRow,
    schema::{field::CsvLayout, resource::ImportSchema},
};
use tracing::debug;

pub struct CsvParser {
    settings: CsvSettings,
}

impl CsvParser {
    pub fn new(settings: CsvSettings) -> Self {
        CsvParser { settings }
    }

    /// Splits `text` into rows following the schema's layout.
    ///
    /// Lines with too few tokens, or whose first token is empty, are dropped
    /// without a trace in the output. Every kept row gets a fresh field list.
    pub fn parse(&self, text: &str, schema: &ImportSchema) -> Result<Vec<ImportRow>, ParseError> {
        let records = self.read_records(text)?;

        let rows = match &schema.layout {
            CsvLayout::Headered => Self::zip_headered(records, schema)?,
            CsvLayout::Positional {
                columns,
                min_tokens,
            } => Self::zip_positional(records, columns, *min_tokens),
        };

        if rows.is_empty() {
            return Err(ParseError::NoValidRows);
        }
        Ok(rows)
    }

    fn read_records(&self, text: &str) -> Result<Vec<Vec<String>>, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.settings.delimiter as u8)
            .quoting(self.settings.quoting)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let tokens = record.iter().map(str::to_string).collect::<Vec<_>>();
            if tokens.iter().all(|t| t.is_empty()) {
                continue;
            }
            records.push(tokens);
        }
        Ok(records)
    }

    fn zip_headered(
        records: Vec<Vec<String>>,
        schema: &ImportSchema,
    ) -> Result<Vec<ImportRow>, ParseError> {
        let mut iter = records.into_iter();
        let Some(header) = iter.next() else {
            return Err(ParseError::NoValidRows);
        };
        let header = header
            .iter()
            .map(|h| normalize_col_name(h))
            .collect::<Vec<_>>();

        let missing = schema
            .required_columns()
            .into_iter()
            .filter(|col| !header.iter().any(|h| h == &normalize_col_name(col)))
            .map(str::to_string)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ParseError::MissingColumns(missing));
        }

        let mut rows = Vec::new();
        for (line, tokens) in iter.enumerate() {
            if tokens.len() < header.len() || tokens[0].is_empty() {
                debug!("Dropping CSV line {}: {} token(s)", line + 2, tokens.len());
                continue;
            }
            let fields = header.iter().cloned().zip(tokens).collect::<Vec<_>>();
            rows.push(ImportRow::new(rows.len(), fields));
        }
        Ok(rows)
    }

    fn zip_positional(
        records: Vec<Vec<String>>,
        columns: &[String],
        min_tokens: usize,
    ) -> Vec<ImportRow> {
        let mut rows = Vec::new();
        for (line, tokens) in records.into_iter().enumerate() {
            if tokens.len() < min_tokens || tokens[0].is_empty() {
                debug!("Dropping CSV line {}: {} token(s)", line + 1, tokens.len());
                continue;
            }
            let fields = columns.iter().cloned().zip(tokens).collect::<Vec<_>>();
            rows.push(ImportRow::new(rows.len(), fields));
        }
        rows
    }
}

/// Lowercases a header and folds spaces and dashes into underscores, so
/// `Roll Number` matches `roll_number`.
pub fn normalize_col_name(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .replace([' ', '-', '.'], "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, schema: &ImportSchema) -> Result<Vec<ImportRow>, ParseError> {
        CsvParser::new(CsvSettings::default()).parse(text, schema)
    }

    #[test]
    fn test_headered_rows_keep_order() {
        let text = "roll_number,course_code,semester_id,grade\nX1,C1,3,A\nX2,C1,3,B\nX3,C2,4,C\n";
        let rows = parse(text, &ImportSchema::grades()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("roll_number"), Some("X1"));
        assert_eq!(rows[2].get("grade"), Some("C"));
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn test_headered_drops_short_and_empty_first_token() {
        let text = "roll_number,course_code,semester_id\nX1,C1,3\n,C1,3\nX3,C1\nX4,C2,5";
        let rows = parse(text, &ImportSchema::enrollments()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("roll_number"), Some("X1"));
        assert_eq!(rows[1].get("roll_number"), Some("X4"));
        // No gap left behind by the dropped lines.
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn test_headered_normalizes_header_names() {
        let text = "Roll Number, Course-Code ,SEMESTER_ID\nX1,C1,2";
        let rows = parse(text, &ImportSchema::enrollments()).unwrap();
        assert_eq!(rows[0].get("course_code"), Some("C1"));
    }

    #[test]
    fn test_headered_missing_column_is_parse_error() {
        let text = "roll_number,semester_id\nX1,3";
        let err = parse(text, &ImportSchema::enrollments()).unwrap_err();
        match err {
            ParseError::MissingColumns(cols) => assert_eq!(cols, vec!["course_code".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_only_yields_no_valid_rows() {
        let text = "roll_number,course_code,semester_id\n";
        assert!(matches!(
            parse(text, &ImportSchema::enrollments()),
            Err(ParseError::NoValidRows)
        ));
    }

    #[test]
    fn test_positional_pairs_trimmed() {
        let text = " R1 , adv1@x.com \nR2,adv2@x.com\nlonely\n\n";
        let rows = parse(text, &ImportSchema::advisors()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("roll_number"), Some("R1"));
        assert_eq!(rows[0].get("advisor_email"), Some("adv1@x.com"));
    }

    #[test]
    fn test_positional_user_lines() {
        let text = "a@x.com,pw1,Alice,1,CS001,CSE,2024\nb@x.com,pw2,Bob,2,FAC01,CSE,";
        let rows = parse(text, &ImportSchema::users()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("identifier"), Some("CS001"));
        assert_eq!(rows[1].get("batch"), Some(""));
    }

    #[test]
    fn test_quoted_field_with_embedded_comma() {
        let text = "roll_number,course_code,semester_id,grade\nX1,\"C1, lab\",3,A";
        let rows = parse(text, &ImportSchema::grades()).unwrap();
        assert_eq!(rows[0].get("course_code"), Some("C1, lab"));
    }

    #[test]
    fn test_empty_input_yields_no_valid_rows() {
        assert!(matches!(
            parse("", &ImportSchema::advisors()),
            Err(ParseError::NoValidRows)
        ));
    }
}
