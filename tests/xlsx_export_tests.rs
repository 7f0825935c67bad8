mod common;

use budget_reports::{
    errors::ReportError,
    export::model::{
        Alignment, CellValue, ColumnSpec, ColumnType, ReportParameter, RowData,
        TabularReportExportModel,
    },
    export::{ExportFormat, ExportService, ExportServiceFactory, XlsxExportService},
};
use calamine::Data;
use chrono::NaiveDate;
use common::{cell, cell_style, package_part, read_sheet};
use rust_decimal_macros::dec;

fn food_model() -> TabularReportExportModel {
    TabularReportExportModel::new(
        vec![
            ColumnSpec::text("name", "Name"),
            ColumnSpec::decimal("amount", "Amount"),
        ],
        vec![RowData::new()
            .with("name", "Food")
            .with("amount", dec!(250.00))],
    )
}

#[test]
fn renders_header_and_data_rows_from_the_top() {
    let file = ExportServiceFactory::with_defaults()
        .export(&food_model(), ExportFormat::Xlsx)
        .unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    assert_eq!(cell(&sheet, 0, 0), Data::String("Name".into()));
    assert_eq!(cell(&sheet, 0, 1), Data::String("Amount".into()));
    assert_eq!(cell(&sheet, 1, 0), Data::String("Food".into()));
    assert_eq!(cell(&sheet, 1, 1), Data::Float(250.0));
    assert_eq!(cell(&sheet, 2, 0), Data::Empty);

    let styles = package_part(&file.bytes, "xl/styles.xml");
    assert!(styles.contains(r##"formatCode="#,##0.00""##) || styles.contains(r#"numFmtId="4""#));

    let sheet_xml = package_part(&file.bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains(r#"ySplit="1""#));
    assert!(sheet_xml.contains(r#"state="frozen""#));
}

#[test]
fn exported_file_carries_name_and_content_type() {
    let model = food_model().with_file_name("expenses");
    let file = ExportServiceFactory::with_defaults()
        .export(&model, ExportFormat::Xlsx)
        .unwrap();
    assert_eq!(file.file_name, "expenses.xlsx");
    assert_eq!(
        file.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let model = food_model().with_file_name("Already.XLSX");
    let file = XlsxExportService::default().export(&model).unwrap();
    assert_eq!(file.file_name, "Already.XLSX");

    let model = food_model().with_file_name("  ");
    let file = XlsxExportService::default().export(&model).unwrap();
    assert_eq!(file.file_name, "report.xlsx");
}

#[test]
fn parameters_push_the_header_down() {
    let model = food_model().with_parameters(vec![
        ReportParameter::new("Report", "Expenses by category"),
        ReportParameter::new("Period", "Jan 2023 – Mar 2023"),
    ]);
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    assert_eq!(cell(&sheet, 0, 0), Data::String("Report".into()));
    assert_eq!(cell(&sheet, 0, 1), Data::String("Expenses by category".into()));
    assert_eq!(cell(&sheet, 1, 1), Data::String("Jan 2023 – Mar 2023".into()));
    assert_eq!(cell(&sheet, 2, 0), Data::Empty);
    assert_eq!(cell(&sheet, 3, 0), Data::String("Name".into()));
    assert_eq!(cell(&sheet, 4, 1), Data::Float(250.0));

    let sheet_xml = package_part(&file.bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains(r#"ySplit="4""#));
}

#[test]
fn footer_follows_the_last_data_row() {
    let model = food_model().with_footer(Some(
        RowData::new()
            .with("name", "Total")
            .with("amount", dec!(250.00)),
    ));
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    assert_eq!(cell(&sheet, 2, 0), Data::String("Total".into()));
    assert_eq!(cell(&sheet, 2, 1), Data::Float(250.0));
}

#[test]
fn missing_values_leave_blank_cells() {
    let model = TabularReportExportModel::new(
        vec![
            ColumnSpec::text("name", "Name"),
            ColumnSpec::decimal("amount", "Amount"),
            ColumnSpec::text("note", "Note"),
        ],
        vec![RowData::new().with("name", "Food").with("note", CellValue::Empty)],
    );
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    assert_eq!(cell(&sheet, 1, 0), Data::String("Food".into()));
    assert_eq!(cell(&sheet, 1, 1), Data::Empty);
    assert_eq!(cell(&sheet, 1, 2), Data::Empty);
}

#[test]
fn integers_and_dates_follow_their_column_type() {
    let model = TabularReportExportModel::new(
        vec![
            ColumnSpec::new("count", "Count", ColumnType::Integer).with_alignment(Alignment::Right),
            ColumnSpec::new("day", "Day", ColumnType::Date),
        ],
        vec![RowData::new()
            .with("count", 1234i64)
            .with("day", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())],
    );
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    assert_eq!(cell(&sheet, 1, 0), Data::Float(1234.0));
    assert_eq!(cell(&sheet, 1, 1), Data::String("2024-03-09".into()));

    let styles = package_part(&file.bytes, "xl/styles.xml");
    assert!(styles.contains(r##"formatCode="#,##0""##) || styles.contains(r#"numFmtId="3""#));
}

#[test]
fn explicit_widths_are_written_verbatim() {
    let model = TabularReportExportModel::new(
        vec![
            ColumnSpec::text("name", "Name").with_width(42.0),
            ColumnSpec::decimal("amount", "Amount"),
        ],
        vec![RowData::new().with("name", "Food").with("amount", dec!(1.00))],
    );
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet_xml = package_part(&file.bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains("<cols>"));
    let first = column_tag(&sheet_xml, 1);
    assert!(first.contains(r#"width="42.7109375""#), "{first}");
    assert!(first.contains(r#"customWidth="1""#));

    let second = column_tag(&sheet_xml, 2);
    assert!(second.contains(r#"width=""#), "{second}");
    assert!(!second.contains(r#"width="42.7109375""#));
}

fn column_tag(sheet_xml: &str, index: u32) -> String {
    let open = format!(r#"<col min="{index}" max="{index}""#);
    let start = sheet_xml.find(&open).expect("column entry present");
    let end = start + sheet_xml[start..].find("/>").expect("column entry closes");
    sheet_xml[start..end].to_string()
}

#[test]
fn header_cells_are_bold_shaded_wrapped_and_bordered() {
    let file = XlsxExportService::default().export(&food_model()).unwrap();

    let header = cell_style(&file.bytes, "A1");
    assert!(header.font.contains("<b/>"), "{}", header.font);
    assert!(header.fill.contains(r#"patternType="solid""#), "{}", header.fill);
    assert!(header.fill.contains("FFC0C0C0"), "{}", header.fill);
    assert!(header.xf.contains(r#"wrapText="1""#), "{}", header.xf);
    assert!(header.border.contains(r#"style="thin""#), "{}", header.border);

    let data = cell_style(&file.bytes, "A2");
    assert!(!data.font.contains("<b/>"));
    assert!(data.border.contains(r#"style="thin""#));
}

#[test]
fn header_fill_is_configurable() {
    let file = XlsxExportService::new(0xDDEBF7).export(&food_model()).unwrap();

    let header = cell_style(&file.bytes, "B1");
    assert!(header.fill.contains("FFDDEBF7"), "{}", header.fill);
}

#[test]
fn footer_cells_are_bold() {
    let model = food_model().with_footer(Some(
        RowData::new()
            .with("name", "Total")
            .with("amount", dec!(250.00)),
    ));
    let file = XlsxExportService::default().export(&model).unwrap();

    for reference in ["A3", "B3"] {
        let footer = cell_style(&file.bytes, reference);
        assert!(footer.font.contains("<b/>"), "{reference}: {}", footer.font);
        assert!(footer.border.contains(r#"style="thin""#));
    }
    assert!(!cell_style(&file.bytes, "B2").font.contains("<b/>"));
}

#[test]
fn date_columns_with_a_format_hold_real_dates() {
    let model = TabularReportExportModel::new(
        vec![ColumnSpec::new("day", "Day", ColumnType::Date).with_format("dd/mm/yyyy")],
        vec![RowData::new().with("day", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())],
    );
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Report");
    match cell(&sheet, 1, 0) {
        Data::DateTime(date) => assert_eq!(date.as_f64(), 45360.0),
        other => panic!("expected a spreadsheet date, got {other:?}"),
    }

    let styles = package_part(&file.bytes, "xl/styles.xml");
    assert!(styles.contains(r#"formatCode="dd/mm/yyyy""#));
}

#[test]
fn model_locale_is_stored_as_a_document_property() {
    let model = food_model().with_locale("uk-UA");
    let file = XlsxExportService::default().export(&model).unwrap();

    let custom = package_part(&file.bytes, "docProps/custom.xml");
    assert!(custom.contains(r#"name="Locale""#), "{custom}");
    assert!(custom.contains(">uk-UA<"), "{custom}");
}

#[test]
fn sheet_name_is_sanitized() {
    let model = food_model().with_sheet_name("Q1/Q2: summary");
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet = read_sheet(&file.bytes, "Q1_Q2_ summary");
    assert_eq!(cell(&sheet, 1, 0), Data::String("Food".into()));
}

#[test]
fn model_without_columns_renders_without_freeze_pane() {
    let model = TabularReportExportModel::new(Vec::new(), Vec::new());
    let file = XlsxExportService::default().export(&model).unwrap();

    let sheet_xml = package_part(&file.bytes, "xl/worksheets/sheet1.xml");
    assert!(!sheet_xml.contains(r#"state="frozen""#));
}

#[test]
fn factory_without_renderers_rejects_the_request() {
    let factory = ExportServiceFactory::new(Vec::new());
    let result = factory.export(&food_model(), ExportFormat::Xlsx);
    match result {
        Err(err @ ReportError::UnsupportedFormat(ExportFormat::Xlsx)) => {
            assert!(err.is_caller_error());
        }
        other => panic!("expected unsupported format, got {other:?}"),
    }
}
