use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::month::YearMonth;

/// A transaction as handed back by the transaction store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub amount_in_base: Option<Decimal>,
    pub kind: TransactionKind,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TransactionRecord {
    pub fn new(date: NaiveDateTime, kind: TransactionKind, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            account: None,
            category: None,
            currency: None,
            amount: Some(amount),
            amount_in_base: None,
            kind,
            direction: None,
            comment: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_amount_in_base(mut self, amount: Decimal) -> Self {
        self.amount_in_base = Some(amount);
        self
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::from_datetime(self.date)
    }

    /// Amount converted to the base currency, falling back to the raw amount.
    pub fn effective_amount(&self) -> Option<Decimal> {
        self.amount_in_base.or(self.amount)
    }

    /// Expense-category activity that is not a transfer between accounts.
    pub fn is_category_expense(&self) -> bool {
        self.kind != TransactionKind::Transfer
            && self
                .category
                .as_ref()
                .map_or(false, |category| category.is_expense())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Transfer => "Transfer",
        };
        f.write_str(label)
    }
}
