use model::{
    core::value::Value,
    execution::rejected_row::{RejectReason, RejectedRow},
    records::{record::ValidatedRecord, row::ImportRow},
    schema::{field::FieldKind, resource::ImportSchema},
};
use tracing::debug;

/// Output of validating one parsed input. `records` and `rejected` together
/// account for every input row.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    pub records: Vec<ValidatedRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Drives type coercion generically from an `ImportSchema`.
pub struct Validator<'a> {
    schema: &'a ImportSchema,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a ImportSchema) -> Self {
        Validator { schema }
    }

    pub fn validate(&self, rows: &[ImportRow]) -> Validation {
        let mut validation = Validation::default();
        for row in rows {
            match self.validate_row(row) {
                Ok(record) => validation.records.push(record),
                Err(rejected) => {
                    debug!("Rejected {rejected}");
                    validation.rejected.push(rejected);
                }
            }
        }
        validation
    }

    /// Builds a record from one row.
    ///
    /// Empty optional fields stay absent. Integer and enum fields use a strict
    /// parse; a non-empty value that does not parse rejects the row, whether
    /// or not the field is required.
    pub fn validate_row(&self, row: &ImportRow) -> Result<ValidatedRecord, RejectedRow> {
        let mut record = ValidatedRecord::new(row.index);

        for field in &self.schema.fields {
            let raw = row.get(&field.source).map(str::trim).unwrap_or("");
            if raw.is_empty() {
                if field.required {
                    return Err(RejectedRow::missing(row.index, &field.name));
                }
                continue;
            }

            let value = match &field.kind {
                FieldKind::Text => Value::Text(raw.to_string()),
                FieldKind::Integer => Value::Integer(parse_strict(row, &field.name, raw)?),
                FieldKind::Enum(allowed) => {
                    let code = parse_strict(row, &field.name, raw)?;
                    if !allowed.contains(&code) {
                        return Err(RejectedRow::new(
                            row.index,
                            RejectReason::CodeNotAllowed {
                                field: field.name.clone(),
                                code,
                            },
                        ));
                    }
                    Value::Integer(code)
                }
            };
            record.set(&field.name, value);
        }

        if let Some(split) = &self.schema.role_split {
            let code = record
                .get(&split.selector)
                .and_then(Value::as_i64)
                .ok_or_else(|| RejectedRow::missing(row.index, &split.selector))?;
            let target = split.target_for(code).ok_or_else(|| {
                RejectedRow::new(
                    row.index,
                    RejectReason::UnknownRole {
                        selector: split.selector.clone(),
                        code,
                    },
                )
            })?;

            // Positional files carry the shared source column; JSON and headered
            // files may name the target directly. Unselected targets never
            // reach the record.
            let identity = [split.source.as_str(), target]
                .into_iter()
                .filter_map(|name| row.get(name).map(str::trim))
                .find(|value| !value.is_empty())
                .unwrap_or("");
            if identity.is_empty() {
                return Err(RejectedRow::missing(row.index, target));
            }
            record.set(target, Value::Text(identity.to_string()));
        }

        Ok(record)
    }
}

fn parse_strict(row: &ImportRow, field: &str, raw: &str) -> Result<i64, RejectedRow> {
    raw.parse::<i64>().map_err(|_| {
        RejectedRow::new(
            row.index,
            RejectReason::NotAnInteger {
                field: field.to_string(),
                value: raw.to_string(),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, fields: &[(&str, &str)]) -> ImportRow {
        ImportRow::new(
            index,
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn user_row(index: usize, role: &str, identifier: &str, batch: &str) -> ImportRow {
        row(
            index,
            &[
                ("email", "a@x.com"),
                ("password", "pw"),
                ("name", "Alice"),
                ("role_id", role),
                ("identifier", identifier),
                ("department", "CSE"),
                ("batch", batch),
            ],
        )
    }

    #[test]
    fn test_student_gets_roll_number_only() {
        let schema = ImportSchema::users();
        let record = Validator::new(&schema)
            .validate_row(&user_row(0, "1", "CS001", "2024"))
            .unwrap();

        assert_eq!(record.get("roll_number"), Some(&Value::Text("CS001".into())));
        assert_eq!(record.get("batch"), Some(&Value::Integer(2024)));
        assert!(!record.contains("employee_id"));
    }

    #[test]
    fn test_faculty_gets_employee_id_only() {
        let schema = ImportSchema::users();
        let record = Validator::new(&schema)
            .validate_row(&user_row(1, "2", "FAC01", ""))
            .unwrap();

        assert_eq!(record.get("employee_id"), Some(&Value::Text("FAC01".into())));
        assert!(!record.contains("roll_number"));
        assert!(!record.contains("batch"));
    }

    #[test]
    fn test_non_numeric_optional_integer_rejects_row() {
        let schema = ImportSchema::users();
        let rejected = Validator::new(&schema)
            .validate_row(&user_row(4, "1", "CS001", "twenty"))
            .unwrap_err();

        assert_eq!(rejected.index, 4);
        assert!(matches!(rejected.reason, RejectReason::NotAnInteger { ref field, .. } if field == "batch"));
    }

    #[test]
    fn test_unknown_role_code_rejected() {
        let schema = ImportSchema::users();
        let rejected = Validator::new(&schema)
            .validate_row(&user_row(0, "3", "X", ""))
            .unwrap_err();
        assert!(matches!(
            rejected.reason,
            RejectReason::CodeNotAllowed { code: 3, .. }
        ));
    }

    #[test]
    fn test_missing_identity_rejected() {
        let schema = ImportSchema::users();
        let rejected = Validator::new(&schema)
            .validate_row(&user_row(0, "2", " ", ""))
            .unwrap_err();
        assert_eq!(
            rejected.reason,
            RejectReason::MissingField("employee_id".into())
        );
    }

    fn json_user_row(index: usize, role: &str, extra: &[(&str, &str)]) -> ImportRow {
        let mut fields = vec![
            ("email", "a@x.com"),
            ("password", "pw"),
            ("name", "Alice"),
            ("role_id", role),
        ];
        fields.extend_from_slice(extra);
        row(index, &fields)
    }

    #[test]
    fn test_target_named_directly_is_accepted() {
        let schema = ImportSchema::users();
        let validator = Validator::new(&schema);

        let student = validator
            .validate_row(&json_user_row(0, "1", &[("roll_number", "CS001"), ("batch", "2024")]))
            .unwrap();
        assert_eq!(student.get("roll_number"), Some(&Value::Text("CS001".into())));
        assert_eq!(student.get("batch"), Some(&Value::Integer(2024)));
        assert!(!student.contains("employee_id"));

        let faculty = validator
            .validate_row(&json_user_row(1, "2", &[("employee_id", "FAC01")]))
            .unwrap();
        assert_eq!(faculty.get("employee_id"), Some(&Value::Text("FAC01".into())));
        assert!(!faculty.contains("roll_number"));
    }

    #[test]
    fn test_unselected_target_is_dropped() {
        let schema = ImportSchema::users();
        let record = Validator::new(&schema)
            .validate_row(&json_user_row(
                0,
                "2",
                &[("roll_number", "CS009"), ("employee_id", "FAC09")],
            ))
            .unwrap();

        assert_eq!(record.get("employee_id"), Some(&Value::Text("FAC09".into())));
        assert!(!record.contains("roll_number"));
        assert!(record.to_json().get("roll_number").is_none());
    }

    #[test]
    fn test_semester_id_coerced_to_integer() {
        let schema = ImportSchema::grades();
        let record = Validator::new(&schema)
            .validate_row(&row(
                0,
                &[
                    ("roll_number", "X1"),
                    ("course_code", "C1"),
                    ("semester_id", "3"),
                    ("grade", "A"),
                ],
            ))
            .unwrap();
        assert_eq!(record.get("semester_id"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_validate_keeps_order_and_accounts_for_every_row() {
        let schema = ImportSchema::enrollments();
        let rows = vec![
            row(0, &[("roll_number", "A"), ("course_code", "C1"), ("semester_id", "1")]),
            row(1, &[("roll_number", "B"), ("course_code", "C1"), ("semester_id", "x")]),
            row(2, &[("roll_number", "C"), ("course_code", ""), ("semester_id", "1")]),
            row(3, &[("roll_number", "D"), ("course_code", "C2"), ("semester_id", "2")]),
        ];

        let validation = Validator::new(&schema).validate(&rows);
        let kept = validation
            .records
            .iter()
            .map(|r| r.get("roll_number").and_then(Value::as_str).unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(kept, vec!["A", "D"]);
        assert_eq!(validation.rejected.len(), 2);
        assert_eq!(validation.records.len() + validation.rejected.len(), rows.len());
    }
}
