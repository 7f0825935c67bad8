//! Turn report value objects into [`TabularReportExportModel`]s.
//!
//! [`TabularReportExportModel`]: crate::export::model::TabularReportExportModel

pub mod category_expense;
pub mod transactions;

pub use category_expense::CategoryExpenseReportExportMapper;
pub use transactions::TransactionExportMapper;
