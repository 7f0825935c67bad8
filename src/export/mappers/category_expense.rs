use crate::config::{ReportConfig, ReportLabels};
use crate::domain::category::Category;
use crate::domain::month::YearMonth;
use crate::export::model::{ColumnSpec, ReportParameter, RowData, TabularReportExportModel};
use crate::reports::CategoryMonthlyExpenseReport;

const CATEGORY_KEY: &str = "category";
const TOTAL_KEY: &str = "total";
const FILE_PREFIX: &str = "category-expenses";

/// Flattens a monthly category report into a spreadsheet-ready model.
pub struct CategoryExpenseReportExportMapper;

impl CategoryExpenseReportExportMapper {
    /// Columns are the category name, one per month (keyed `YYYY-MM`) and the
    /// row total. The footer repeats the monthly totals and the grand total.
    ///
    /// Labels, the file name currency suffix and the model locale come from
    /// `config`; a blank currency leaves the suffix off.
    pub fn to_tabular_model(
        report: &CategoryMonthlyExpenseReport,
        config: &ReportConfig,
        start: Option<YearMonth>,
        end: Option<YearMonth>,
        selected_category: Option<&Category>,
    ) -> TabularReportExportModel {
        let labels = &config.labels;
        TabularReportExportModel::new(build_columns(report, labels), build_rows(report))
            .with_file_name(file_name(start, end, &config.currency))
            .with_sheet_name(labels.category_expenses_sheet.as_str())
            .with_footer(Some(build_footer(report, labels)))
            .with_parameters(build_parameters(labels, start, end, selected_category))
            .with_locale(config.locale.as_str())
    }
}

fn build_columns(report: &CategoryMonthlyExpenseReport, labels: &ReportLabels) -> Vec<ColumnSpec> {
    let mut columns = Vec::with_capacity(report.months().len() + 2);
    columns.push(ColumnSpec::text(CATEGORY_KEY, labels.category.as_str()));
    columns.extend(
        report
            .months()
            .iter()
            .map(|month| ColumnSpec::decimal(month.to_string(), month.label())),
    );
    columns.push(ColumnSpec::decimal(TOTAL_KEY, labels.total.as_str()));
    columns
}

fn build_rows(report: &CategoryMonthlyExpenseReport) -> Vec<RowData> {
    report
        .rows()
        .iter()
        .map(|row| {
            let mut data = RowData::new().with(CATEGORY_KEY, row.category_name());
            for month in report.months() {
                data.insert(month.to_string(), row.amount_for(*month));
            }
            data.with(TOTAL_KEY, row.total())
        })
        .collect()
}

fn build_footer(report: &CategoryMonthlyExpenseReport, labels: &ReportLabels) -> RowData {
    let mut footer = RowData::new().with(CATEGORY_KEY, labels.total.as_str());
    for month in report.months() {
        footer.insert(month.to_string(), report.total_for(*month));
    }
    footer.with(TOTAL_KEY, report.grand_total())
}

fn build_parameters(
    labels: &ReportLabels,
    start: Option<YearMonth>,
    end: Option<YearMonth>,
    selected_category: Option<&Category>,
) -> Vec<ReportParameter> {
    let period = match (start, end) {
        (Some(start), Some(end)) => format!("{} – {}", start.label(), end.label()),
        _ => String::new(),
    };
    let category = selected_category
        .map(|category| category.name.clone())
        .unwrap_or_else(|| labels.any_category.clone());
    vec![
        ReportParameter::new(
            labels.report.as_str(),
            labels.category_expenses_title.as_str(),
        ),
        ReportParameter::new(labels.period.as_str(), period),
        ReportParameter::new(labels.category.as_str(), category),
    ]
}

fn file_name(start: Option<YearMonth>, end: Option<YearMonth>, currency: &str) -> String {
    let period = match (start, end) {
        (Some(start), Some(end)) => format!("{start}_{end}"),
        _ => "period".to_string(),
    };
    match currency.trim() {
        "" => format!("{FILE_PREFIX}_{period}"),
        code => format!("{FILE_PREFIX}_{period}_{}", code.to_lowercase()),
    }
}
