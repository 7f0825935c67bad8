use thiserror::Error;

use crate::export::ExportFormat;

/// Error type that captures report building and export failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Export format is not supported: {0}")]
    UnsupportedFormat(ExportFormat),
    #[error("Invalid report period: {0}")]
    InvalidPeriod(String),
    #[error("Failed to render spreadsheet: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Render(err.to_string())
    }
}

impl ReportError {
    /// Errors the caller caused and can fix by changing the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_) | Self::InvalidPeriod(_))
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
