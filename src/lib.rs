#![doc(test(attr(deny(warnings))))]

//! Budget Reports groups categories for selection lists, aggregates expenses
//! per category and month, and exports tabular reports as spreadsheets.

pub mod collation;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod reports;
pub mod utils;

use std::sync::Once;

pub use crate::collation::{collator_for_locale, Collator, PrimaryCollator};
pub use crate::config::{ConfigManager, ReportConfig, ReportLabels};
pub use crate::core::services::{
    CategoryExpenseReportService, CategorySelectGroup, CategorySelectService,
};
pub use crate::errors::{ReportError, ReportResult};
pub use crate::export::{
    ExportFormat, ExportService, ExportServiceFactory, ExportedFile, TabularReportExportModel,
    XlsxExportService,
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Reports tracing initialized.");
    });
}
