use std::collections::{HashSet, VecDeque};

use uuid::Uuid;

use crate::core::stores::{CategoryStore, TransactionStore};
use crate::domain::category::Category;
use crate::domain::month::YearMonth;
use crate::errors::{ReportError, ReportResult};
use crate::reports::{CategoryMonthlyExpenseReport, MonthlyAmountAggregator};

/// Builds monthly expense-by-category reports from store data.
pub struct CategoryExpenseReportService<'a, T: ?Sized, C: ?Sized> {
    transactions: &'a T,
    categories: &'a C,
}

impl<'a, T, C> CategoryExpenseReportService<'a, T, C>
where
    T: TransactionStore + ?Sized,
    C: CategoryStore + ?Sized,
{
    pub fn new(transactions: &'a T, categories: &'a C) -> Self {
        Self {
            transactions,
            categories,
        }
    }

    /// Aggregates the user's expenses from `start` through `end`.
    ///
    /// With `root_filter`, only that category and its descendants are counted.
    pub fn build_category_monthly_report(
        &self,
        user_id: Uuid,
        start: Option<YearMonth>,
        end: Option<YearMonth>,
        root_filter: Option<&Category>,
    ) -> ReportResult<CategoryMonthlyExpenseReport> {
        let (start, end) = validate_period(start, end)?;
        let from = start
            .first_day()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .ok_or_else(|| ReportError::InvalidPeriod(format!("month {start} is out of range")))?;
        let to = end
            .last_day()
            .and_then(|day| day.and_hms_opt(23, 59, 59))
            .ok_or_else(|| ReportError::InvalidPeriod(format!("month {end} is out of range")))?;

        let mut aggregator = MonthlyAmountAggregator::new(start, end);
        let allowed: Option<HashSet<Uuid>> = match root_filter {
            Some(root) => {
                let subtree = self.collect_category_tree(user_id, root)?;
                for category in subtree.iter().filter(|category| category.is_expense()) {
                    aggregator.seed(category.id, &category.name);
                }
                Some(subtree.iter().map(|category| category.id).collect())
            }
            None => None,
        };

        let mut ignored = 0usize;
        for transaction in self.transactions.transactions_between(user_id, from, to)? {
            if !transaction.is_category_expense() {
                ignored += 1;
                continue;
            }
            let Some(category) = transaction.category.as_ref() else {
                continue;
            };
            if let Some(allowed) = &allowed {
                if !allowed.contains(&category.id) {
                    ignored += 1;
                    continue;
                }
            }
            aggregator.add_fact(
                category.id,
                &category.name,
                Some(transaction.month()),
                transaction.effective_amount(),
            );
        }

        if let Some(root) = root_filter {
            aggregator.discard_if_zero(root.id);
        }
        let report = aggregator.finish();
        tracing::info!(
            %user_id,
            %start,
            %end,
            rows = report.rows().len(),
            ignored,
            grand_total = %report.grand_total(),
            "built category monthly expense report"
        );
        Ok(report)
    }

    /// The root followed by every descendant reachable through the category
    /// store, breadth first, each category once.
    fn collect_category_tree(&self, user_id: Uuid, root: &Category) -> ReportResult<Vec<Category>> {
        let mut seen = HashSet::new();
        let mut tree = Vec::new();
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.id) {
                continue;
            }
            queue.extend(self.categories.children_of(user_id, current.id)?);
            tree.push(current);
        }
        Ok(tree)
    }
}

fn validate_period(
    start: Option<YearMonth>,
    end: Option<YearMonth>,
) -> ReportResult<(YearMonth, YearMonth)> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ReportError::InvalidPeriod(format!(
            "end month {end} is before start month {start}"
        ))),
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(ReportError::InvalidPeriod(
            "start and end month are required".into(),
        )),
    }
}
