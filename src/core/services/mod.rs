pub mod category_select_service;
pub mod expense_report_service;

pub use category_select_service::{CategorySelectGroup, CategorySelectService};
pub use expense_report_service::CategoryExpenseReportService;
