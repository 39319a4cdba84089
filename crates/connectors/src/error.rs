use crate::{
    file::error::{FileError, ParseError},
    http::error::TransportError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Reading the picked file failed.
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// The file was read but its contents could not be turned into rows.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The backend could not be reached or answered with garbage.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
