//! Category × month expense grid with exact decimal totals.

use std::collections::{HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::domain::month::YearMonth;

/// Rounds half away from zero to exactly two fractional digits.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn zero_money() -> Decimal {
    round_money(Decimal::ZERO)
}

/// Expenses of one category spread across month buckets.
///
/// Months keep the order in which they were first seen. Each bucket holds the
/// exact running sum of its inputs; every amount read back is that sum
/// rounded to cents, so the result does not depend on the order of calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMonthlyExpenseRow {
    category_id: Uuid,
    category_name: String,
    amounts: Vec<(YearMonth, Decimal)>,
    has_activity: bool,
}

impl CategoryMonthlyExpenseRow {
    /// Creates a row with a zero bucket for each of `months`.
    pub fn new(category_id: Uuid, category_name: impl Into<String>, months: &[YearMonth]) -> Self {
        let mut amounts = Vec::with_capacity(months.len());
        for month in months {
            if !amounts.iter().any(|(existing, _)| existing == month) {
                amounts.push((*month, Decimal::ZERO));
            }
        }
        Self {
            category_id,
            category_name: category_name.into(),
            amounts,
            has_activity: false,
        }
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Accumulates `amount` into `month`; a missing month or amount is ignored.
    pub fn add_amount(&mut self, month: Option<YearMonth>, amount: Option<Decimal>) {
        let (Some(month), Some(amount)) = (month, amount) else {
            return;
        };
        if !amount.is_zero() {
            self.has_activity = true;
        }
        match self.amounts.iter_mut().find(|(existing, _)| *existing == month) {
            Some((_, sum)) => *sum += amount,
            None => self.amounts.push((month, amount)),
        }
    }

    /// Rounded amount for `month`, zero when the month has no bucket.
    pub fn amount_for(&self, month: YearMonth) -> Decimal {
        self.amounts
            .iter()
            .find(|(existing, _)| *existing == month)
            .map(|(_, sum)| round_money(*sum))
            .unwrap_or_else(zero_money)
    }

    /// Rounded amounts in bucket order.
    pub fn amounts_by_month(&self) -> Vec<(YearMonth, Decimal)> {
        self.amounts
            .iter()
            .map(|(month, sum)| (*month, round_money(*sum)))
            .collect()
    }

    pub fn months(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.amounts.iter().map(|(month, _)| *month)
    }

    /// Sum of the rounded monthly amounts.
    pub fn total(&self) -> Decimal {
        round_money(
            self.amounts
                .iter()
                .map(|(_, sum)| round_money(*sum))
                .sum::<Decimal>(),
        )
    }

    /// True once a non-zero amount has been added.
    pub fn has_activity(&self) -> bool {
        self.has_activity
    }

    pub fn is_zero(&self) -> bool {
        self.amounts
            .iter()
            .all(|(_, sum)| round_money(*sum).is_zero())
    }
}

impl Serialize for CategoryMonthlyExpenseRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CategoryMonthlyExpenseRow", 4)?;
        state.serialize_field("category_id", &self.category_id)?;
        state.serialize_field("category_name", &self.category_name)?;
        state.serialize_field("amounts_by_month", &MonthMap(&self.amounts_by_month()))?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

struct MonthMap<'a>(&'a [(YearMonth, Decimal)]);

impl Serialize for MonthMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (month, amount) in self.0 {
            map.serialize_entry(month, amount)?;
        }
        map.end()
    }
}

/// Monthly expenses per category with derived column and grand totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryMonthlyExpenseReport {
    months: Vec<YearMonth>,
    rows: Vec<CategoryMonthlyExpenseRow>,
    totals_by_month: Vec<(YearMonth, Decimal)>,
    grand_total: Decimal,
}

impl CategoryMonthlyExpenseReport {
    /// Builds the report, deriving totals from `rows`.
    pub fn new(months: Vec<YearMonth>, rows: Vec<CategoryMonthlyExpenseRow>) -> Self {
        let totals_by_month: Vec<(YearMonth, Decimal)> = months
            .iter()
            .map(|month| {
                let total: Decimal = rows.iter().map(|row| row.amount_for(*month)).sum();
                (*month, round_money(total))
            })
            .collect();
        let grand_total = round_money(rows.iter().map(CategoryMonthlyExpenseRow::total).sum());
        Self {
            months,
            rows,
            totals_by_month,
            grand_total,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn rows(&self) -> &[CategoryMonthlyExpenseRow] {
        &self.rows
    }

    pub fn totals_by_month(&self) -> &[(YearMonth, Decimal)] {
        &self.totals_by_month
    }

    /// Column total for `month`; zero for months outside the report.
    pub fn total_for(&self, month: YearMonth) -> Decimal {
        self.totals_by_month
            .iter()
            .find(|(existing, _)| *existing == month)
            .map(|(_, total)| *total)
            .unwrap_or_else(zero_money)
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for CategoryMonthlyExpenseReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CategoryMonthlyExpenseReport", 4)?;
        state.serialize_field("months", &self.months)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("totals_by_month", &MonthMap(&self.totals_by_month))?;
        state.serialize_field("grand_total", &self.grand_total)?;
        state.end()
    }
}

/// Collects (category, month, amount) facts over a fixed month window.
#[derive(Debug, Clone)]
pub struct MonthlyAmountAggregator {
    months: Vec<YearMonth>,
    rows: HashMap<Uuid, CategoryMonthlyExpenseRow>,
    seeded: HashSet<Uuid>,
    skipped: usize,
}

impl MonthlyAmountAggregator {
    /// Window covering `start` through `end`, both inclusive.
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self {
            months: YearMonth::range_inclusive(start, end),
            rows: HashMap::new(),
            seeded: HashSet::new(),
            skipped: 0,
        }
    }

    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    /// Ensures a row for `category_id` exists even if no fact arrives for it.
    ///
    /// Seeded rows survive `finish` with zero amounts.
    pub fn seed(&mut self, category_id: Uuid, category_name: &str) {
        let months = &self.months;
        self.rows
            .entry(category_id)
            .or_insert_with(|| CategoryMonthlyExpenseRow::new(category_id, category_name, months));
        self.seeded.insert(category_id);
    }

    /// Removes the row for `category_id` when all of its amounts round to zero.
    pub fn discard_if_zero(&mut self, category_id: Uuid) {
        if self.rows.get(&category_id).is_some_and(CategoryMonthlyExpenseRow::is_zero) {
            self.rows.remove(&category_id);
            self.seeded.remove(&category_id);
        }
    }

    /// Adds one fact; facts without a month or amount, or outside the window,
    /// leave the grid untouched.
    pub fn add_fact(
        &mut self,
        category_id: Uuid,
        category_name: &str,
        month: Option<YearMonth>,
        amount: Option<Decimal>,
    ) {
        let (Some(month), Some(amount)) = (month, amount) else {
            self.skipped += 1;
            return;
        };
        if !self.months.contains(&month) {
            self.skipped += 1;
            return;
        }
        let months = &self.months;
        self.rows
            .entry(category_id)
            .or_insert_with(|| CategoryMonthlyExpenseRow::new(category_id, category_name, months))
            .add_amount(Some(month), Some(amount));
    }

    /// Facts ignored so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Keeps seeded rows and rows with activity, ordered by name, and derives
    /// the totals.
    pub fn finish(self) -> CategoryMonthlyExpenseReport {
        let seeded = self.seeded;
        let mut rows: Vec<CategoryMonthlyExpenseRow> = self
            .rows
            .into_values()
            .filter(|row| row.has_activity() || seeded.contains(&row.category_id))
            .collect();
        rows.sort_by(|a, b| {
            a.category_name
                .cmp(&b.category_name)
                .then_with(|| a.category_id.cmp(&b.category_id))
        });
        tracing::debug!(
            months = self.months.len(),
            rows = rows.len(),
            skipped = self.skipped,
            "aggregated monthly amounts"
        );
        CategoryMonthlyExpenseReport::new(self.months, rows)
    }
}
