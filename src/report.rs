//! Report assembly: one pass over the workbook per report.
//!
//! The workbook is opened once. The overview sheet supplies the table and
//! field skeleton, then each declared table's frequency sheet is resolved
//! against the sheet list captured at open time and merged into it.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::{info, warn};

use crate::{
    error::{ReportError, ReportResult},
    frequency::{TableSheetIndex, read_table_frequencies},
    io_utils,
    layout::{Policy, ReportLayout},
    merge::merge_frequencies,
    model::Report,
    overview::{TableMap, read_overview},
    workbook::{ExcelWorkbook, WorkbookSource},
};

pub const PROFILES_DIR: &str = "profiles";
pub const OUTPUT_SUFFIX: &str = ".white_rabbit.profile.json";

pub fn parse_report(path: &Path, layout: &ReportLayout) -> ReportResult<TableMap> {
    let mut workbook = ExcelWorkbook::open(path)?;
    info!("Parsing scan report {:?}", workbook.path());
    parse_workbook(&mut workbook, layout)
}

pub fn parse_workbook(
    workbook: &mut dyn WorkbookSource,
    layout: &ReportLayout,
) -> ReportResult<TableMap> {
    let (overview_name, mut tables) = read_overview(workbook, layout)?;

    let index = TableSheetIndex::new(
        workbook.sheet_names(),
        &[overview_name.as_str()],
        layout.sheet_match,
    );
    let table_names: Vec<String> = tables.keys().cloned().collect();
    let mut without_sheet = 0usize;
    for name in &table_names {
        let frequencies = match read_table_frequencies(workbook, &index, name, layout) {
            Ok(frequencies) => frequencies,
            Err(err @ ReportError::TableSheetNotFound { .. })
                if layout.missing_table_sheet == Policy::Skip =>
            {
                warn!("{err}; emitting table without frequencies");
                without_sheet += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        if let Some(table) = tables.get_mut(name) {
            merge_frequencies(table, frequencies, layout.unknown_field)?;
        }
    }
    info!(
        "Merged frequencies for {} of {} table(s)",
        table_names.len() - without_sheet,
        table_names.len()
    );
    Ok(tables)
}

pub fn build_document(path: &Path, pid: &str, layout: &ReportLayout) -> ReportResult<Report> {
    let tables = parse_report(path, layout)?;
    Ok(Report::new(pid, tables))
}

/// Writes the document as two-space indented JSON to `destination`, or to
/// stdout when no destination is given.
pub fn write_json(report: &Report, destination: Option<&Path>) -> ReportResult<()> {
    let bytes = io_utils::to_pretty_json(report)?;
    io_utils::write_output(destination, &bytes)
}

pub fn read_json(path: &Path) -> ReportResult<Report> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Dataset identifier from a `profiles/<id>/<file>` report path.
pub fn infer_pid(path: &Path) -> Option<String> {
    let parts: Vec<&str> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [root, pid, _file] if *root == PROFILES_DIR && !pid.is_empty() => Some(pid.to_string()),
        _ => None,
    }
}

pub fn output_file_name(pid: &str) -> String {
    format!("{pid}{OUTPUT_SUFFIX}")
}

/// Resolves the dataset identifier and destination file for a report. An
/// explicit `pid` wins over the path convention; the output directory falls
/// back to `profiles/<id>` for conventional paths and to `./` otherwise.
pub fn plan_output(
    input: &Path,
    pid: Option<&str>,
    out_dir: Option<&Path>,
) -> ReportResult<(String, PathBuf)> {
    let inferred = infer_pid(input);
    let pid = match (pid, &inferred) {
        (Some(explicit), _) => explicit.to_string(),
        (None, Some(found)) => found.clone(),
        (None, None) => return Err(ReportError::MissingDatasetId(input.to_path_buf())),
    };
    let dir = match (out_dir, &inferred) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(found)) => Path::new(PROFILES_DIR).join(found),
        (None, None) => PathBuf::from("."),
    };
    let file = dir.join(output_file_name(&pid));
    Ok((pid, file))
}
