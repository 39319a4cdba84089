use connectors::{error::ConnectorError, file::error::FileError, http::error::TransportError};
use engine_config::settings::error::SettingsError;
use engine_core::error::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Connector(#[from] ConnectorError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl CliError {
    /// Errors the import session already put in front of the user through
    /// its notifier.
    pub fn already_notified(&self) -> bool {
        matches!(
            self,
            CliError::Session(
                SessionError::Parse(_) | SessionError::Submit(_) | SessionError::EmptyBatch
            )
        )
    }
}

impl From<FileError> for CliError {
    fn from(err: FileError) -> Self {
        CliError::Connector(err.into())
    }
}

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        CliError::Connector(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::file::error::ParseError;
    use engine_core::error::SubmitError;

    #[test]
    fn test_session_notified_errors_are_not_reported_twice() {
        assert!(CliError::Session(SessionError::Parse(ParseError::NoValidRows)).already_notified());
        assert!(CliError::Session(SessionError::EmptyBatch).already_notified());
        assert!(
            CliError::Session(SessionError::Submit(SubmitError::Rejected(
                "Unauthorized".into()
            )))
            .already_notified()
        );

        assert!(!CliError::Session(SessionError::InFlight).already_notified());
        assert!(!CliError::Settings(SettingsError::MissingApiUrl).already_notified());
        assert!(!CliError::ShutdownRequested.already_notified());
    }
}
