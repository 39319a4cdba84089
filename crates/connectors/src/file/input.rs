use crate::file::error::FileError;
use std::{fmt, path::Path};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_mime(mime: &str) -> Result<Self, FileError> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/csv" => Ok(InputFormat::Csv),
            "application/json" => Ok(InputFormat::Json),
            _ => Err(FileError::UnsupportedFormat(mime.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(FileError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            InputFormat::Csv => "text/csv",
            InputFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Full contents of a picked file, decoded as UTF-8.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub format: InputFormat,
    pub text: String,
}

impl RawInput {
    pub fn new(format: InputFormat, text: impl Into<String>) -> Self {
        RawInput {
            format,
            text: text.into(),
        }
    }
}

/// Reads the whole file before parsing; there is no streaming path.
///
/// `mime` wins over the file extension when given.
pub async fn read_input(path: &Path, mime: Option<&str>) -> Result<RawInput, FileError> {
    let format = match mime {
        Some(m) => InputFormat::from_mime(m)?,
        None => InputFormat::from_path(path)?,
    };

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileError::NotFound(path.display().to_string()),
        _ => FileError::IoError(e),
    })?;
    let text = String::from_utf8(bytes).map_err(|e| FileError::NotUtf8(e.to_string()))?;

    info!("Read {} bytes of {} from {}", text.len(), format, path.display());
    Ok(RawInput { format, text })
}
