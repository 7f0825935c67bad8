//! Export of tabular report models into downloadable files.
//!
//! Report-specific mappers build a [`TabularReportExportModel`]; an
//! [`ExportService`] chosen by [`ExportServiceFactory`] turns it into an
//! [`ExportedFile`].

pub mod mappers;
pub mod model;
pub mod xlsx;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, ReportResult};

pub use model::{
    Alignment, CellValue, ColumnSpec, ColumnType, ReportParameter, RowData,
    TabularReportExportModel,
};
pub use xlsx::XlsxExportService;

/// Output formats known to the export layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Xlsx,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xlsx => f.write_str("XLSX"),
        }
    }
}

/// Rendered bytes ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Renders a tabular model into one specific file format.
pub trait ExportService: Send + Sync {
    fn supports(&self, format: ExportFormat) -> bool;

    fn export(&self, model: &TabularReportExportModel) -> ReportResult<ExportedFile>;
}

/// Dispatches a model to the first registered service supporting a format.
pub struct ExportServiceFactory {
    services: Vec<Box<dyn ExportService>>,
}

impl ExportServiceFactory {
    pub fn new(services: Vec<Box<dyn ExportService>>) -> Self {
        Self { services }
    }

    /// Factory with every built-in renderer registered.
    pub fn with_defaults() -> Self {
        Self::new(vec![Box::new(XlsxExportService::default())])
    }

    pub fn register(&mut self, service: Box<dyn ExportService>) {
        self.services.push(service);
    }

    pub fn supports(&self, format: ExportFormat) -> bool {
        self.services.iter().any(|service| service.supports(format))
    }

    pub fn export(
        &self,
        model: &TabularReportExportModel,
        format: ExportFormat,
    ) -> ReportResult<ExportedFile> {
        let Some(service) = self.services.iter().find(|service| service.supports(format)) else {
            tracing::warn!(%format, "rejected export request for unsupported format");
            return Err(ReportError::UnsupportedFormat(format));
        };
        let file = service.export(model)?;
        tracing::info!(
            %format,
            file_name = %file.file_name,
            bytes = file.bytes.len(),
            "exported report"
        );
        Ok(file)
    }
}

impl Default for ExportServiceFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Appends `.extension` unless the trimmed name already ends with it
/// (case-insensitively). Blank names become `report`.
pub fn ensure_extension(file_name: &str, extension: &str) -> String {
    let normalized = file_name.trim();
    if normalized.is_empty() {
        return format!("{}.{}", model::DEFAULT_FILE_NAME, extension);
    }
    let suffix = format!(".{}", extension.to_lowercase());
    if normalized.to_lowercase().ends_with(&suffix) {
        normalized.to_string()
    } else {
        format!("{}.{}", normalized, extension)
    }
}
