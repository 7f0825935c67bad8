use chrono::NaiveDate;

use crate::config::{ReportConfig, ReportLabels};
use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::export::model::{ColumnSpec, RowData, TabularReportExportModel};

const DATE_KEY: &str = "date";
const ACCOUNT_KEY: &str = "account";
const CATEGORY_KEY: &str = "category";
const CURRENCY_KEY: &str = "currency";
const AMOUNT_KEY: &str = "amount";
const AMOUNT_BASE_KEY: &str = "amountBase";
const TYPE_KEY: &str = "type";
const DIRECTION_KEY: &str = "direction";
const COMMENT_KEY: &str = "comment";

/// One spreadsheet row per transaction.
pub struct TransactionExportMapper;

impl TransactionExportMapper {
    /// The base amount header names `config.currency`.
    pub fn to_tabular_model(
        transactions: &[TransactionRecord],
        config: &ReportConfig,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> TabularReportExportModel {
        let labels = &config.labels;
        let rows = transactions
            .iter()
            .map(|transaction| build_row(transaction, labels))
            .collect();
        TabularReportExportModel::new(build_columns(labels, &config.currency), rows)
            .with_file_name(file_name(start, end))
            .with_sheet_name(labels.transactions_sheet.as_str())
            .with_locale(config.locale.as_str())
    }
}

fn build_columns(labels: &ReportLabels, base_currency: &str) -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text(DATE_KEY, labels.date.as_str()),
        ColumnSpec::text(ACCOUNT_KEY, labels.account.as_str()),
        ColumnSpec::text(CATEGORY_KEY, labels.category.as_str()),
        ColumnSpec::text(CURRENCY_KEY, labels.currency.as_str()),
        ColumnSpec::decimal(AMOUNT_KEY, labels.amount.as_str()),
        ColumnSpec::decimal(AMOUNT_BASE_KEY, labels.amount_in_base_for(base_currency)),
        ColumnSpec::text(TYPE_KEY, labels.kind.as_str()),
        ColumnSpec::text(DIRECTION_KEY, labels.direction.as_str()),
        ColumnSpec::text(COMMENT_KEY, labels.comment.as_str()),
    ]
}

fn build_row(transaction: &TransactionRecord, labels: &ReportLabels) -> RowData {
    let category = transaction
        .category
        .as_ref()
        .map(|category| category.name.clone())
        .unwrap_or_default();
    RowData::new()
        .with(DATE_KEY, transaction.date.format("%Y-%m-%d").to_string())
        .with(ACCOUNT_KEY, transaction.account.clone().unwrap_or_default())
        .with(CATEGORY_KEY, category)
        .with(CURRENCY_KEY, transaction.currency.clone().unwrap_or_default())
        .with(AMOUNT_KEY, transaction.amount)
        .with(AMOUNT_BASE_KEY, transaction.amount_in_base)
        .with(TYPE_KEY, kind_label(transaction.kind, labels))
        .with(DIRECTION_KEY, transaction.direction.clone().unwrap_or_default())
        .with(COMMENT_KEY, transaction.comment.clone().unwrap_or_default())
}

fn kind_label(kind: TransactionKind, labels: &ReportLabels) -> &str {
    match kind {
        TransactionKind::Income => &labels.income,
        TransactionKind::Expense => &labels.expense,
        TransactionKind::Transfer => &labels.transfer,
    }
}

fn file_name(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("transactions_{start}_{end}"),
        _ => "transactions_period".to_string(),
    }
}
