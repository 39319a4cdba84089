use crate::{
    error::ModelError,
    execution::strategy::SubmitStrategy,
    schema::field::{CsvLayout, FieldSpec, RoleSplit},
};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// The bulk operations the import pipeline knows how to feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Users,
    Advisors,
    Enrollments,
    Grades,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Users,
        Resource::Advisors,
        Resource::Enrollments,
        Resource::Grades,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Advisors => "advisors",
            Resource::Enrollments => "enrollments",
            Resource::Grades => "grades",
        }
    }

    /// Endpoint accepting the whole record set in one call.
    pub fn batch_path(&self) -> &'static str {
        match self {
            Resource::Users => "/admin/bulk-users",
            Resource::Advisors => "/admin/bulk-assign-advisors",
            Resource::Enrollments => "/enrollment/bulk-enrollments",
            Resource::Grades => "/faculty/bulk-grades",
        }
    }

    /// Endpoint taking one record per call, used by the sequential strategy.
    pub fn single_path(&self) -> &'static str {
        match self {
            Resource::Users => "/admin/create-user",
            Resource::Advisors => "/admin/assign-advisor",
            Resource::Enrollments => "/enrollment/enroll",
            Resource::Grades => "/faculty/submit-grade",
        }
    }

    /// Top-level key of the batch request body.
    pub fn body_key(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Advisors => "assignments",
            Resource::Enrollments => "enrollments",
            Resource::Grades => "grades",
        }
    }

    /// Field the backend uses to name a failed row in its error list.
    pub fn identifying_field(&self) -> &'static str {
        match self {
            Resource::Users => "email",
            Resource::Advisors | Resource::Enrollments | Resource::Grades => "roll_number",
        }
    }

    pub fn default_strategy(&self) -> SubmitStrategy {
        match self {
            Resource::Enrollments => SubmitStrategy::Sequential,
            _ => SubmitStrategy::Batch,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" | "user" => Ok(Resource::Users),
            "advisors" | "advisor" => Ok(Resource::Advisors),
            "enrollments" | "enrollment" => Ok(Resource::Enrollments),
            "grades" | "grade" => Ok(Resource::Grades),
            other => Err(ModelError::UnknownResource(other.to_string())),
        }
    }
}

/// Declarative description of what one bulk operation expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSchema {
    pub resource: Resource,
    pub layout: CsvLayout,
    pub fields: Vec<FieldSpec>,
    pub role_split: Option<RoleSplit>,
}

impl ImportSchema {
    pub fn for_resource(resource: Resource) -> Self {
        match resource {
            Resource::Users => Self::users(),
            Resource::Advisors => Self::advisors(),
            Resource::Enrollments => Self::enrollments(),
            Resource::Grades => Self::grades(),
        }
    }

    /// `email,password,name,role_id,identifier,department,batch` without a
    /// header. Role 1 is a student (identifier is the roll number), role 2 is
    /// faculty (identifier is the employee id).
    pub fn users() -> Self {
        let columns = [
            "email",
            "password",
            "name",
            "role_id",
            "identifier",
            "department",
            "batch",
        ];
        ImportSchema {
            resource: Resource::Users,
            layout: CsvLayout::Positional {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                min_tokens: 5,
            },
            fields: vec![
                FieldSpec::text("email"),
                FieldSpec::text("password"),
                FieldSpec::text("name"),
                FieldSpec::code("role_id", &[1, 2]),
                FieldSpec::text("department").optional(),
                FieldSpec::integer("batch").optional(),
            ],
            role_split: Some(RoleSplit {
                selector: "role_id".to_string(),
                source: "identifier".to_string(),
                variants: vec![(1, "roll_number".to_string()), (2, "employee_id".to_string())],
            }),
        }
    }

    /// `roll_number,advisor_email` pairs without a header.
    pub fn advisors() -> Self {
        ImportSchema {
            resource: Resource::Advisors,
            layout: CsvLayout::Positional {
                columns: vec!["roll_number".to_string(), "advisor_email".to_string()],
                min_tokens: 2,
            },
            fields: vec![FieldSpec::text("roll_number"), FieldSpec::text("advisor_email")],
            role_split: None,
        }
    }

    pub fn enrollments() -> Self {
        ImportSchema {
            resource: Resource::Enrollments,
            layout: CsvLayout::Headered,
            fields: vec![
                FieldSpec::text("roll_number"),
                FieldSpec::text("course_code"),
                FieldSpec::integer("semester_id"),
            ],
            role_split: None,
        }
    }

    pub fn grades() -> Self {
        ImportSchema {
            resource: Resource::Grades,
            layout: CsvLayout::Headered,
            fields: vec![
                FieldSpec::text("roll_number"),
                FieldSpec::text("course_code"),
                FieldSpec::integer("semester_id"),
                FieldSpec::text("grade"),
            ],
            role_split: None,
        }
    }

    pub fn identifying_field(&self) -> &'static str {
        self.resource.identifying_field()
    }

    /// Input columns that must be present in a headered CSV.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut columns = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.source.as_str())
            .collect::<Vec<_>>();
        if let Some(split) = &self.role_split {
            columns.push(split.source.as_str());
        }
        columns
    }
}
