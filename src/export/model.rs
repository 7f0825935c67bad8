//! Format-agnostic description of a tabular report.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FILE_NAME: &str = "report";
pub const DEFAULT_SHEET_NAME: &str = "Report";

/// Drives how values in a column are formatted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    String,
    Decimal,
    Integer,
    Date,
}

impl ColumnType {
    /// Number format applied when the column carries no explicit format.
    pub fn default_format(&self) -> Option<&'static str> {
        match self {
            ColumnType::Decimal => Some("#,##0.00"),
            ColumnType::Integer => Some("#,##0"),
            ColumnType::Date => Some("yyyy-mm-dd"),
            ColumnType::String => None,
        }
    }
}

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Describes one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub column_type: ColumnType,
    pub format: Option<String>,
    pub alignment: Alignment,
    /// Width in character units; `None` sizes the column to its content.
    pub width: Option<f64>,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, header: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            column_type,
            format: None,
            alignment: Alignment::Left,
            width: None,
        }
    }

    pub fn text(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnType::String)
    }

    pub fn decimal(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(key, header, ColumnType::Decimal).with_alignment(Alignment::Right)
    }

    /// Blank formats are discarded so the type default applies.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.format = if format.trim().is_empty() {
            None
        } else {
            Some(format)
        };
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Explicit format, else the default for the column type.
    pub fn effective_format(&self) -> Option<&str> {
        self.format
            .as_deref()
            .or_else(|| self.column_type.default_format())
    }

    pub fn has_explicit_format(&self) -> bool {
        self.format.is_some()
    }
}

/// A single cell value, resolved to a cell type at render time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Decimal(Decimal),
    Integer(i64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Decimal(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// Values of one row keyed by column key, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowData {
    values: Vec<(String, CellValue)>,
}

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value for the same key in place.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((key, value)),
        }
    }

    /// Value for `key`; unknown keys read as [`CellValue::Empty`].
    pub fn get(&self, key: &str) -> &CellValue {
        self.values
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
            .unwrap_or(&EMPTY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when at least one value is not [`CellValue::Empty`].
    pub fn has_values(&self) -> bool {
        self.values.iter().any(|(_, value)| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for RowData
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RowData::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

/// Free-form label/value line rendered above the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParameter {
    pub label: String,
    pub value: String,
}

impl ReportParameter {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Everything a renderer needs to produce one tabular export.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularReportExportModel {
    file_name: String,
    sheet_name: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<RowData>,
    footer: Option<RowData>,
    parameters: Vec<ReportParameter>,
    locale: Option<String>,
}

impl TabularReportExportModel {
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<RowData>) -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.into(),
            sheet_name: DEFAULT_SHEET_NAME.into(),
            columns,
            rows,
            footer: None,
            parameters: Vec::new(),
            locale: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = non_blank_or(file_name.into(), DEFAULT_FILE_NAME);
        self
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = non_blank_or(sheet_name.into(), DEFAULT_SHEET_NAME);
        self
    }

    pub fn with_footer(mut self, footer: Option<RowData>) -> Self {
        self.footer = footer;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ReportParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        self.locale = if locale.trim().is_empty() {
            None
        } else {
            Some(locale)
        };
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    /// Footer to render, present only when it holds a non-empty value.
    pub fn footer(&self) -> Option<&RowData> {
        self.footer.as_ref().filter(|footer| footer.has_values())
    }

    pub fn parameters(&self) -> &[ReportParameter] {
        &self.parameters
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
