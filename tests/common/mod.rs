#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::Data;
use tempfile::{TempDir, tempdir};
use wr_profile::workbook::{MemoryWorkbook, range_from_rows};
use zip::{ZipWriter, write::SimpleFileOptions};

/// A worksheet cell for fixture workbooks.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

pub fn t(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn n(value: f64) -> Cell {
    Cell::Number(value)
}

pub const BLANK: Cell = Cell::Blank;

pub type Sheet = (String, Vec<Vec<Cell>>);

pub fn sheet(name: &str, rows: Vec<Vec<Cell>>) -> Sheet {
    (name.to_string(), rows)
}

impl Cell {
    fn to_data(&self) -> Data {
        match self {
            Cell::Text(s) => Data::String(s.clone()),
            Cell::Number(v) => Data::Float(*v),
            Cell::Blank => Data::Empty,
        }
    }
}

pub fn memory_workbook(sheets: &[Sheet]) -> MemoryWorkbook {
    sheets.iter().fold(MemoryWorkbook::new(), |book, (name, rows)| {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(Cell::to_data).collect())
            .collect();
        book.with_sheet(name.clone(), range_from_rows(rows))
    })
}

/// Overview header row in scanner column order.
pub fn overview_header() -> Vec<Cell> {
    [
        "Table",
        "Field",
        "Type",
        "Description",
        "Max length",
        "N rows",
        "N rows checked",
        "Fraction empty",
        "Fraction unique",
        "Average",
        "Standard Deviation",
        "Min",
        "25%",
        "Median",
        "75%",
        "Max",
    ]
    .into_iter()
    .map(t)
    .collect()
}

/// Overview row with the leading columns filled and the remainder blank.
pub fn overview_row(leading: Vec<Cell>) -> Vec<Cell> {
    let mut row = leading;
    row.resize(16, BLANK);
    row
}

/// The person/visit report used across the integration tests.
pub fn sample_sheets() -> Vec<Sheet> {
    vec![
        sheet(
            "Overview",
            vec![
                overview_header(),
                overview_row(vec![
                    t("Person"),
                    t("Gender"),
                    t("Varchar"),
                    BLANK,
                    n(1.0),
                    n(100.0),
                    n(100.0),
                    n(0.0),
                    BLANK,
                ]),
                overview_row(vec![
                    BLANK,
                    t("year_of_birth"),
                    t("INT"),
                    t("Birth year"),
                    n(4.0),
                    n(100.0),
                    n(100.0),
                    n(0.1),
                    n(0.35),
                    n(1975.5),
                    n(12.25),
                    n(1930.0),
                    n(1965.0),
                    n(1976.0),
                    n(1987.0),
                    n(2005.0),
                ]),
                overview_row(vec![
                    t("CUSTOMER_TRANSACTION_HISTORY_DETAIL"),
                    t("amount"),
                    t("DECIMAL"),
                ]),
                overview_row(vec![t("visit"), t("visit_id"), t("INT")]),
            ],
        ),
        sheet(
            "Person",
            vec![
                vec![t("Gender"), t("Frequency"), t("year_of_birth"), t("Frequency")],
                vec![t("M"), n(40.0), n(1976.0), n(12.0)],
                vec![t("F"), n(58.0), n(1980.0), n(9.0)],
                vec![t("List truncated..."), n(2.0), BLANK, BLANK],
            ],
        ),
        sheet(
            "CUSTOMER_TRANSACTION_HIST",
            vec![
                vec![t("amount"), t("Frequency")],
                vec![n(9.99), n(3.0)],
                vec![n(10.0), BLANK],
            ],
        ),
    ]
}

/// Writes a minimal `.xlsx` package holding `sheets` with inline strings.
pub fn write_xlsx(path: &Path, sheets: &[Sheet]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    let file = File::create(path).expect("create xlsx");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    let mut workbook_sheets = String::new();
    let mut workbook_rels = String::new();
    for (idx, (name, _)) in sheets.iter().enumerate() {
        let id = idx + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{id}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        workbook_sheets.push_str(&format!(
            r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
            escape(name)
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
        ));
    }
    content_types.push_str("</Types>");

    let parts = [
        ("[Content_Types].xml".to_string(), content_types),
        (
            "_rels/.rels".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{workbook_sheets}</sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{workbook_rels}</Relationships>"#
            ),
        ),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).expect("start part");
        zip.write_all(body.as_bytes()).expect("write part");
    }
    for (idx, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
            .expect("start sheet");
        zip.write_all(sheet_xml(rows).as_bytes())
            .expect("write sheet");
    }
    zip.finish().expect("finish xlsx");
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_idx, row) in rows.iter().enumerate() {
        let r = row_idx + 1;
        xml.push_str(&format!(r#"<row r="{r}">"#));
        for (col_idx, cell) in row.iter().enumerate() {
            let reference = format!("{}{r}", column_letters(col_idx));
            match cell {
                Cell::Text(s) => xml.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(s)
                )),
                Cell::Number(v) => {
                    xml.push_str(&format!(r#"<c r="{reference}"><v>{v}</v></c>"#))
                }
                Cell::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes an `.xlsx` fixture at `relative` under the workspace.
    pub fn xlsx(&self, relative: &str, sheets: &[Sheet]) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        write_xlsx(&path, sheets);
        path
    }
}
