use thiserror::Error;

/// Errors raised while loading or validating import settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The `.env` file could not be read.
    #[error("Failed to read env file {path}: {source}")]
    EnvFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid env file: line {line}: {reason}")]
    MalformedEnvLine { line: usize, reason: String },

    /// A key was set but its value could not be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Settings validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Submitting needs a backend address.
    #[error("Missing API base URL (set AIMS_API_URL or pass --api-url)")]
    MissingApiUrl,
}
