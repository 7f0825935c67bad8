//! Spreadsheet (`.xlsx`) rendering of tabular report models.
//!
//! Layout, top to bottom:
//!
//! ```text
//! | Period   | Jan 2023 – Mar 2023 |       <- parameters (bold label, plain value)
//! |          |                     |       <- separator, only after parameters
//! | Category | Jan 2023 | ... | Total |    <- header (bold, shaded, wrapped)
//! | Food     |   250.00 | ... | 250.00 |   <- data rows, formatted per column type
//! | Total    |   400.50 | ... | 400.50 |   <- optional footer (bold)
//! ```
//!
//! The view is frozen below the header row whenever the model has columns.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, FormatPattern,
    Workbook, Worksheet,
};

use crate::config::ReportConfig;
use crate::errors::{ReportError, ReportResult};

use super::model::{
    Alignment, CellValue, ColumnSpec, ColumnType, RowData, TabularReportExportModel,
    DEFAULT_SHEET_NAME,
};
use super::{ensure_extension, ExportFormat, ExportService, ExportedFile};

/// Grey fill behind header cells.
pub const DEFAULT_HEADER_FILL: u32 = 0xC0C0C0;

/// Custom document property holding the model's locale tag.
pub const LOCALE_PROPERTY: &str = "Locale";

/// Largest integer magnitude a spreadsheet number stores exactly (2^53).
const MAX_EXACT_INTEGER: i64 = 1 << 53;

const MAX_SHEET_NAME_CHARS: usize = 31;
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Row positions of each block on the sheet, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub parameter_rows: u32,
    pub header_row: u32,
    pub first_data_row: u32,
    pub data_rows: u32,
    pub footer_row: Option<u32>,
    pub freeze_row: Option<u32>,
}

impl SheetLayout {
    pub fn for_model(model: &TabularReportExportModel) -> ReportResult<Self> {
        let parameter_rows = to_row(model.parameters().len())?;
        let header_row = if parameter_rows == 0 {
            0
        } else {
            parameter_rows + 1
        };
        let first_data_row = header_row + 1;
        let data_rows = to_row(model.rows().len())?;
        let footer_row = model.footer().map(|_| first_data_row + data_rows);
        let freeze_row = if model.columns().is_empty() {
            None
        } else {
            Some(header_row + 1)
        };
        Ok(Self {
            parameter_rows,
            header_row,
            first_data_row,
            data_rows,
            footer_row,
            freeze_row,
        })
    }
}

/// Cell formats shared by every cell of the same role.
struct SheetFormats {
    header: Format,
    parameter_label: Format,
    parameter_value: Format,
    data: Vec<Format>,
    footer: Vec<Format>,
}

impl SheetFormats {
    fn build(columns: &[ColumnSpec], header_fill: u32) -> Self {
        let header = bordered(Format::new())
            .set_bold()
            .set_align(FormatAlign::Left)
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(header_fill))
            .set_text_wrap();
        let data = columns
            .iter()
            .map(|column| {
                let format = bordered(Format::new()).set_align(align_for(column.alignment));
                match column.effective_format() {
                    Some(num_format) => format.set_num_format(num_format),
                    None => format,
                }
            })
            .collect();
        let footer = columns
            .iter()
            .map(|column| {
                bordered(Format::new())
                    .set_bold()
                    .set_align(align_for(column.alignment))
            })
            .collect();
        Self {
            header,
            parameter_label: Format::new().set_bold(),
            parameter_value: Format::new(),
            data,
            footer,
        }
    }
}

/// Writes `.xlsx` workbooks with `rust_xlsxwriter`.
#[derive(Debug, Clone)]
pub struct XlsxExportService {
    header_fill: u32,
}

impl Default for XlsxExportService {
    fn default() -> Self {
        Self {
            header_fill: DEFAULT_HEADER_FILL,
        }
    }
}

impl XlsxExportService {
    pub fn new(header_fill: u32) -> Self {
        Self { header_fill }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.header_fill)
    }

    /// Renders `model` into workbook bytes.
    ///
    /// The workbook lives only for the duration of this call and is dropped
    /// on every return path, including errors.
    pub fn render(&self, model: &TabularReportExportModel) -> ReportResult<Vec<u8>> {
        let layout = SheetLayout::for_model(model)?;
        let formats = SheetFormats::build(model.columns(), self.header_fill);
        let mut workbook = Workbook::new();
        if let Some(locale) = model.locale() {
            let properties = DocProperties::new().set_custom_property(LOCALE_PROPERTY, locale);
            workbook.set_properties(&properties);
        }
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sanitize_sheet_name(model.sheet_name()))?;

        write_parameters(worksheet, model, &formats)?;
        write_header(worksheet, model, &formats, layout.header_row)?;
        for (offset, row) in model.rows().iter().enumerate() {
            let row_index = layout.first_data_row + to_row(offset)?;
            write_values(worksheet, model.columns(), row, &formats.data, row_index)?;
        }
        if let (Some(footer), Some(footer_row)) = (model.footer(), layout.footer_row) {
            write_values(worksheet, model.columns(), footer, &formats.footer, footer_row)?;
        }

        size_columns(worksheet, model.columns())?;
        if let Some(freeze_row) = layout.freeze_row {
            worksheet.set_freeze_panes(freeze_row, 0)?;
        }

        let bytes = workbook.save_to_buffer()?;
        tracing::debug!(
            sheet = model.sheet_name(),
            columns = model.columns().len(),
            rows = model.rows().len(),
            footer = layout.footer_row.is_some(),
            bytes = bytes.len(),
            "rendered xlsx workbook"
        );
        Ok(bytes)
    }
}

impl ExportService for XlsxExportService {
    fn supports(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Xlsx
    }

    fn export(&self, model: &TabularReportExportModel) -> ReportResult<ExportedFile> {
        let bytes = self.render(model).map_err(|err| {
            tracing::error!(error = %err, "failed to export report to xlsx");
            err
        })?;
        let format = ExportFormat::Xlsx;
        Ok(ExportedFile {
            bytes,
            file_name: ensure_extension(model.file_name(), format.extension()),
            content_type: format.content_type().to_string(),
        })
    }
}

fn write_parameters(
    worksheet: &mut Worksheet,
    model: &TabularReportExportModel,
    formats: &SheetFormats,
) -> ReportResult<()> {
    for (index, parameter) in model.parameters().iter().enumerate() {
        let row = to_row(index)?;
        worksheet.write_string_with_format(row, 0, &parameter.label, &formats.parameter_label)?;
        worksheet.write_string_with_format(row, 1, &parameter.value, &formats.parameter_value)?;
    }
    Ok(())
}

fn write_header(
    worksheet: &mut Worksheet,
    model: &TabularReportExportModel,
    formats: &SheetFormats,
    row: u32,
) -> ReportResult<()> {
    for (index, column) in model.columns().iter().enumerate() {
        worksheet.write_string_with_format(row, to_col(index)?, &column.header, &formats.header)?;
    }
    Ok(())
}

fn write_values(
    worksheet: &mut Worksheet,
    columns: &[ColumnSpec],
    values: &RowData,
    formats: &[Format],
    row: u32,
) -> ReportResult<()> {
    for ((index, column), format) in columns.iter().enumerate().zip(formats) {
        write_cell(worksheet, row, to_col(index)?, column, values.get(&column.key), format)?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    column: &ColumnSpec,
    value: &CellValue,
    format: &Format,
) -> ReportResult<()> {
    match value {
        CellValue::Empty => {
            worksheet.write_blank(row, col, format)?;
        }
        CellValue::Decimal(amount) => {
            let number = amount.to_f64().ok_or_else(|| {
                ReportError::Render(format!("amount {amount} cannot be written as a number"))
            })?;
            worksheet.write_number_with_format(row, col, number, format)?;
        }
        CellValue::Integer(number) => {
            if number.unsigned_abs() > MAX_EXACT_INTEGER.unsigned_abs() {
                return Err(ReportError::Render(format!(
                    "integer {number} cannot be stored exactly in a spreadsheet cell"
                )));
            }
            worksheet.write_number_with_format(row, col, *number as f64, format)?;
        }
        CellValue::Date(date) => {
            if native_dates(column) {
                worksheet.write_datetime_with_format(row, col, &excel_date(*date)?, format)?;
            } else {
                let text = date.format("%Y-%m-%d").to_string();
                worksheet.write_string_with_format(row, col, &text, format)?;
            }
        }
        CellValue::DateTime(date_time) => {
            if native_dates(column) {
                worksheet.write_datetime_with_format(
                    row,
                    col,
                    &excel_date_time(*date_time)?,
                    format,
                )?;
            } else {
                let text = date_time.format("%Y-%m-%d %H:%M:%S").to_string();
                worksheet.write_string_with_format(row, col, &text, format)?;
            }
        }
        CellValue::Text(text) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
    }
    Ok(())
}

/// Date columns with an explicit format hold real spreadsheet dates.
fn native_dates(column: &ColumnSpec) -> bool {
    column.column_type == ColumnType::Date && column.has_explicit_format()
}

fn excel_date(date: NaiveDate) -> ReportResult<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .map_err(|_| ReportError::Render(format!("date {date} is outside the spreadsheet range")))?;
    Ok(ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?)
}

fn excel_date_time(date_time: NaiveDateTime) -> ReportResult<ExcelDateTime> {
    let date = excel_date(date_time.date())?;
    Ok(date.and_hms(
        date_time.hour() as u16,
        date_time.minute() as u8,
        date_time.second(),
    )?)
}

fn size_columns(worksheet: &mut Worksheet, columns: &[ColumnSpec]) -> ReportResult<()> {
    if columns.iter().any(|column| column.width.is_none()) {
        worksheet.autofit();
    }
    for (index, column) in columns.iter().enumerate() {
        if let Some(width) = column.width {
            worksheet.set_column_width(to_col(index)?, width)?;
        }
    }
    Ok(())
}

fn bordered(format: Format) -> Format {
    format.set_border(FormatBorder::Thin)
}

fn align_for(alignment: Alignment) -> FormatAlign {
    match alignment {
        Alignment::Left => FormatAlign::Left,
        Alignment::Center => FormatAlign::Center,
        Alignment::Right => FormatAlign::Right,
    }
}

/// Makes a sheet name acceptable to spreadsheet applications.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| {
            if INVALID_SHEET_NAME_CHARS.contains(&ch) {
                '_'
            } else {
                ch
            }
        })
        .collect();
    let trimmed = replaced.trim().trim_matches('\'').trim();
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_CHARS).collect();
    let truncated = truncated.trim_end();
    if truncated.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        truncated.to_string()
    }
}

fn to_row(index: usize) -> ReportResult<u32> {
    u32::try_from(index)
        .map_err(|_| ReportError::Render(format!("row {index} exceeds the sheet size")))
}

fn to_col(index: usize) -> ReportResult<u16> {
    u16::try_from(index)
        .map_err(|_| ReportError::Render(format!("column {index} exceeds the sheet size")))
}
