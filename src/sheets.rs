//! Raw sheet export.
//!
//! Dumps every sheet of a workbook to its own JSON file in column-oriented
//! form, `{ "<header>": { "<row>": <value>, ... }, ... }`, with rows counted
//! from 0 below the header. Useful for eyeballing what the scanner actually
//! wrote when the structured conversion disagrees with expectations.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use calamine::{Data, Range};
use indexmap::IndexMap;
use log::info;
use serde_json::Value;

use crate::{
    error::ReportResult,
    io_utils,
    normalize::{cell_text, is_blank, normalize_cell},
    workbook::{WorkbookSource, cell_at},
};

pub type ColumnDump = IndexMap<String, IndexMap<String, Value>>;

/// Header names for a sheet: blank headers become `Unnamed: <col>` and
/// repeats get `.1`, `.2`, ... suffixes.
pub fn column_headers(range: &Range<Data>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..range.width())
        .map(|col| {
            let cell = cell_at(range, 0, col);
            let base = if is_blank(cell) {
                format!("Unnamed: {col}")
            } else {
                cell_text(cell)
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

pub fn dump_range(range: &Range<Data>) -> ReportResult<ColumnDump> {
    let headers = column_headers(range);
    let height = range.height();
    let mut dump = ColumnDump::new();
    for (col, header) in headers.into_iter().enumerate() {
        let column = (1..height)
            .map(|row| {
                normalize_cell(cell_at(range, row, col)).map(|value| ((row - 1).to_string(), value))
            })
            .collect::<ReportResult<IndexMap<_, _>>>()?;
        dump.insert(header, column);
    }
    Ok(dump)
}

/// Writes one `<sheet>.json` per sheet into `out_dir`, returning the paths in
/// workbook order.
pub fn export_sheets(workbook: &mut dyn WorkbookSource, out_dir: &Path) -> ReportResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for name in workbook.sheet_names() {
        let Some(range) = workbook.sheet(&name)? else {
            continue;
        };
        let dump = dump_range(&range)?;
        let target = out_dir.join(format!("{name}.json"));
        io_utils::write_output(Some(&target), &io_utils::to_pretty_json(&dump)?)?;
        info!("Wrote sheet '{name}' to {target:?}");
        written.push(target);
    }
    Ok(written)
}
