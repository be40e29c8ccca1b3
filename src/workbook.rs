//! Workbook access behind a small trait so the report readers can run against
//! a real spreadsheet file or an in-memory set of sheets.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use log::debug;

use crate::error::{ReportError, ReportResult};

pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Cell range of the named sheet, or `None` when the workbook has no such sheet.
    fn sheet(&mut self, name: &str) -> ReportResult<Option<Range<Data>>>;
}

pub struct ExcelWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
    names: Vec<String>,
}

impl ExcelWorkbook {
    pub fn open(path: &Path) -> ReportResult<Self> {
        let sheets = open_workbook_auto(path).map_err(|err| ReportError::UnreadableReport {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let names = sheets.sheet_names();
        debug!("Opened {path:?} with {} sheet(s): {names:?}", names.len());
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
            names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn sheet(&mut self, name: &str) -> ReportResult<Option<Range<Data>>> {
        if !self.names.iter().any(|candidate| candidate == name) {
            return Ok(None);
        }
        self.sheets
            .worksheet_range(name)
            .map(Some)
            .map_err(|err| ReportError::UnreadableSheet {
                sheet: name.to_string(),
                reason: err.to_string(),
            })
    }
}

/// Ordered in-memory sheets.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Range<Data>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, range: Range<Data>) -> Self {
        self.add_sheet(name, range);
        self
    }

    pub fn add_sheet(&mut self, name: impl Into<String>, range: Range<Data>) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = range,
            None => self.sheets.push((name, range)),
        }
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet(&mut self, name: &str) -> ReportResult<Option<Range<Data>>> {
        Ok(self
            .sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, range)| range.clone()))
    }
}

/// Builds a range from row-major cells anchored at A1. Short rows are padded
/// with empty cells.
pub fn range_from_rows(rows: Vec<Vec<Data>>) -> Range<Data> {
    let height = rows.len();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if height == 0 || width == 0 {
        return Range::empty();
    }
    let mut range = Range::new((0, 0), ((height - 1) as u32, (width - 1) as u32));
    for (row_idx, row) in rows.into_iter().enumerate() {
        for (col_idx, cell) in row.into_iter().enumerate() {
            range.set_value((row_idx as u32, col_idx as u32), cell);
        }
    }
    range
}

pub static EMPTY_CELL: Data = Data::Empty;

/// Cell at a position relative to the range origin; out-of-bounds reads are empty.
pub fn cell_at(range: &Range<Data>, row: usize, col: usize) -> &Data {
    range.get((row, col)).unwrap_or(&EMPTY_CELL)
}
