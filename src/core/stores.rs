//! Narrow read interfaces onto category and transaction persistence.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::transaction::TransactionRecord;
use crate::errors::ReportResult;

/// Lists the categories visible to a user.
pub trait CategoryStore {
    fn categories_for(&self, user_id: Uuid) -> ReportResult<Vec<Category>>;

    /// Direct children of `parent_id`.
    fn children_of(&self, user_id: Uuid, parent_id: Uuid) -> ReportResult<Vec<Category>> {
        Ok(self
            .categories_for(user_id)?
            .into_iter()
            .filter(|category| category.parent_id == Some(parent_id))
            .collect())
    }
}

/// Returns a user's transactions dated within `[from, to]`.
pub trait TransactionStore {
    fn transactions_between(
        &self,
        user_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> ReportResult<Vec<TransactionRecord>>;
}

/// Keeps everything in memory, keyed by user.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    categories: HashMap<Uuid, Vec<Category>>,
    transactions: HashMap<Uuid, Vec<TransactionRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, user_id: Uuid, category: Category) {
        self.categories.entry(user_id).or_default().push(category);
    }

    pub fn add_transaction(&mut self, user_id: Uuid, transaction: TransactionRecord) {
        self.transactions
            .entry(user_id)
            .or_default()
            .push(transaction);
    }
}

impl CategoryStore for InMemoryStore {
    fn categories_for(&self, user_id: Uuid) -> ReportResult<Vec<Category>> {
        Ok(self.categories.get(&user_id).cloned().unwrap_or_default())
    }
}

impl TransactionStore for InMemoryStore {
    fn transactions_between(
        &self,
        user_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> ReportResult<Vec<TransactionRecord>> {
        Ok(self
            .transactions
            .get(&user_id)
            .map(|all| {
                all.iter()
                    .filter(|txn| txn.date >= from && txn.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
