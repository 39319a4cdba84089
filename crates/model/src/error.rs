use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown resource: {0} (expected one of users, advisors, enrollments, grades)")]
    UnknownResource(String),

    #[error("Unknown submit strategy: {0} (expected batch or sequential)")]
    UnknownStrategy(String),

    #[error("Malformed batch result: {0}")]
    MalformedResult(String),
}
