pub mod category;
pub mod common;
pub mod month;
pub mod transaction;

pub use category::{Category, CategoryKind};
pub use common::NamedEntity;
pub use month::{ParseYearMonthError, YearMonth};
pub use transaction::{TransactionKind, TransactionRecord};
