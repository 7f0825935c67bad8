//! Report value objects and aggregation.

pub mod monthly;

pub use monthly::{
    round_money, CategoryMonthlyExpenseReport, CategoryMonthlyExpenseRow, MonthlyAmountAggregator,
};
