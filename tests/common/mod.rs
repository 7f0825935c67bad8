#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Mutex;

use budget_reports::{
    collation::PrimaryCollator,
    domain::{
        category::{Category, CategoryKind},
        month::YearMonth,
        transaction::{TransactionKind, TransactionRecord},
    },
};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique scratch directory kept alive until the test binary exits.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn collator() -> PrimaryCollator {
    PrimaryCollator::for_locale("en-US").expect("english collation data")
}

pub fn expense(name: &str) -> Category {
    Category::new(name, CategoryKind::Expense)
}

pub fn child(name: &str, parent: &Category) -> Category {
    expense(name).with_parent(parent)
}

pub fn month(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).expect("valid month")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

/// Expense transaction whose base amount equals its raw amount.
pub fn spend(category: &Category, date: NaiveDateTime, amount: Decimal) -> TransactionRecord {
    TransactionRecord::new(date, TransactionKind::Expense, amount)
        .with_category(category.clone())
        .with_amount_in_base(amount)
}

pub fn read_sheet(bytes: &[u8], sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes.to_vec())).expect("open rendered workbook");
    workbook.worksheet_range(sheet).expect("sheet present")
}

pub fn cell(range: &Range<Data>, row: u32, col: u32) -> Data {
    range.get_value((row, col)).cloned().unwrap_or(Data::Empty)
}

/// Raw XML of one part inside the xlsx package.
pub fn package_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("zip archive");
    let mut part = archive.by_name(name).expect("package part present");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("utf-8 xml");
    xml
}

/// Style records applied to one cell of the first worksheet, as raw XML.
#[derive(Debug)]
pub struct CellStyle {
    pub xf: String,
    pub font: String,
    pub fill: String,
    pub border: String,
}

pub fn cell_style(bytes: &[u8], reference: &str) -> CellStyle {
    let sheet = package_part(bytes, "xl/worksheets/sheet1.xml");
    let open = format!(r#"<c r="{reference}""#);
    let start = sheet.find(&open).expect("cell present");
    let end = start + sheet[start..].find('>').expect("cell tag closes");
    let index = attribute(&sheet[start..end], "s").unwrap_or(0);

    let styles = package_part(bytes, "xl/styles.xml");
    let xf = nth_element(&styles, "cellXfs", "<xf ", index);
    let font = nth_element(&styles, "fonts", "<font", attribute(&xf, "fontId").unwrap_or(0));
    let fill = nth_element(&styles, "fills", "<fill", attribute(&xf, "fillId").unwrap_or(0));
    let border = nth_element(
        &styles,
        "borders",
        "<border",
        attribute(&xf, "borderId").unwrap_or(0),
    );
    CellStyle {
        xf,
        font,
        fill,
        border,
    }
}

fn attribute(tag: &str, name: &str) -> Option<usize> {
    let marker = format!(r#" {name}=""#);
    let (_, rest) = tag.split_once(&marker)?;
    rest.split('"').next()?.parse().ok()
}

fn nth_element(xml: &str, section: &str, element: &str, index: usize) -> String {
    let start = xml.find(&format!("<{section}")).expect("style section present");
    let end = start + xml[start..].find(&format!("</{section}>")).expect("section closes");
    let body = &xml[start..end];
    let body = &body[body.find('>').expect("section tag closes") + 1..];
    body.split(element)
        .skip(1)
        .nth(index)
        .map(str::to_string)
        .expect("style record present")
}
