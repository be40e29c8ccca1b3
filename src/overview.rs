//! Overview sheet reader.
//!
//! The overview sheet lists one row per field. Scanner versions disagree on
//! the sheet's name, so candidates from [`ReportLayout::overview_sheets`] are
//! tried in order. The Table column is blank-filled: a row without a table
//! name continues the most recent named table.

use std::collections::HashMap;

use calamine::{Data, Range};
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    error::{ReportError, ReportResult},
    layout::{OverviewField, ReportLayout},
    model::{FieldProfile, TableProfile},
    normalize::{cell_f64, cell_i64, cell_text, is_blank},
    workbook::{EMPTY_CELL, WorkbookSource, cell_at},
};

pub type TableMap = IndexMap<String, TableProfile>;

/// Loads the first overview sheet present, returning its name and cells.
pub fn load_overview_sheet(
    workbook: &mut dyn WorkbookSource,
    layout: &ReportLayout,
) -> ReportResult<(String, Range<Data>)> {
    for candidate in &layout.overview_sheets {
        match workbook.sheet(candidate)? {
            Some(range) => return Ok((candidate.clone(), range)),
            None => debug!("Overview sheet '{candidate}' not present"),
        }
    }
    Err(ReportError::MissingOverviewSheet {
        tried: layout.overview_sheets.clone(),
    })
}

/// Reads the table and field skeleton, returning the overview sheet's name
/// alongside it so callers can keep that sheet out of table lookups.
pub fn read_overview(
    workbook: &mut dyn WorkbookSource,
    layout: &ReportLayout,
) -> ReportResult<(String, TableMap)> {
    let (sheet_name, range) = load_overview_sheet(workbook, layout)?;
    let tables = parse_overview_range(&range, layout);
    info!(
        "Overview sheet '{sheet_name}' declares {} table(s) and {} field(s)",
        tables.len(),
        tables.values().map(|t| t.fields.len()).sum::<usize>()
    );
    Ok((sheet_name, tables))
}

/// Column positions for every binding, resolved once against the header row.
struct BoundColumns {
    table: Option<usize>,
    field: Option<usize>,
    values: Vec<(OverviewField, Option<usize>, f64)>,
}

impl BoundColumns {
    fn resolve(range: &Range<Data>, layout: &ReportLayout) -> Self {
        let width = range.width();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for col in 0..width {
            let header = cell_text(cell_at(range, 0, col)).trim().to_string();
            if !header.is_empty() {
                positions.entry(header).or_insert(col);
            }
        }
        let lookup = |header: &str| positions.get(header.trim()).copied();

        let mut table = None;
        let mut field = None;
        let mut values = Vec::new();
        for binding in &layout.columns {
            let position = lookup(&binding.header);
            if position.is_none() {
                debug!("Overview column '{}' not present", binding.header);
            }
            match binding.target {
                OverviewField::Table => table = position,
                OverviewField::Field => field = position,
                target => values.push((target, position, binding.default)),
            }
        }
        Self {
            table,
            field,
            values,
        }
    }
}

pub fn parse_overview_range(range: &Range<Data>, layout: &ReportLayout) -> TableMap {
    let mut tables = TableMap::new();
    let (height, width) = range.get_size();
    if height == 0 {
        return tables;
    }
    let columns = BoundColumns::resolve(range, layout);

    let mut current_table: Option<String> = None;
    for row in 1..height {
        if (0..width).all(|col| is_blank(cell_at(range, row, col))) {
            continue;
        }

        if let Some(cell) = columns
            .table
            .map(|col| cell_at(range, row, col))
            .filter(|cell| !is_blank(cell))
        {
            current_table = Some(cell_text(cell));
        }
        let Some(table_name) = current_table.as_ref() else {
            warn!("Overview row {} has no table and none precedes it; skipping", row + 1);
            continue;
        };

        let field_name = columns
            .field
            .map(|col| cell_text(cell_at(range, row, col)))
            .unwrap_or_default();
        let profile = build_field(range, row, &field_name, &columns);

        let table = tables
            .entry(table_name.clone())
            .or_insert_with(|| TableProfile::new(table_name.clone()));
        if table.fields.insert(field_name.clone(), profile).is_some() {
            debug!("Field '{field_name}' repeated in table '{table_name}'; last row wins");
        }
    }
    tables
}

fn build_field(
    range: &Range<Data>,
    row: usize,
    field_name: &str,
    columns: &BoundColumns,
) -> FieldProfile {
    let mut profile = FieldProfile::new(field_name);
    for &(target, position, default) in &columns.values {
        let cell = position.map_or(&EMPTY_CELL, |col| cell_at(range, row, col));
        if target.is_text() {
            let text = cell_text(cell);
            match target {
                OverviewField::Type => profile.data_type = text,
                OverviewField::Description => profile.description = text,
                _ => {}
            }
            continue;
        }
        let stats = &mut profile.statistics;
        match target {
            OverviewField::Length => profile.length = cell_i64(cell, default as i64),
            OverviewField::Rows => profile.row_count = cell_i64(cell, default as i64),
            OverviewField::RowsChecked => profile.rows_checked = cell_i64(cell, default as i64),
            OverviewField::Emptiness => profile.empty_fraction = cell_f64(cell, default),
            OverviewField::Uniqueness => profile.unique_fraction = cell_f64(cell, default),
            OverviewField::Mean => stats.mean = cell_f64(cell, default),
            OverviewField::StandardDeviation => stats.standard_deviation = cell_f64(cell, default),
            OverviewField::Min => stats.min = cell_f64(cell, default),
            OverviewField::P25 => stats.p25 = cell_f64(cell, default),
            OverviewField::Median => stats.median = cell_f64(cell, default),
            OverviewField::P75 => stats.p75 = cell_f64(cell, default),
            OverviewField::Max => stats.max = cell_f64(cell, default),
            _ => {}
        }
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{MemoryWorkbook, range_from_rows};

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn blank_table_cells_continue_previous_table() {
        let range = range_from_rows(vec![
            vec![s("Table"), s("Field"), s("Type")],
            vec![s("person"), s("person_id"), s("INT")],
            vec![Data::Empty, s("gender"), s("VARCHAR")],
            vec![Data::Empty, s("year_of_birth"), s("INT")],
            vec![s("visit"), s("visit_id"), s("INT")],
        ]);
        let tables = parse_overview_range(&range, &ReportLayout::default());
        let names: Vec<_> = tables.keys().cloned().collect();
        assert_eq!(names, vec!["person", "visit"]);
        let person: Vec<_> = tables["person"].fields.keys().cloned().collect();
        assert_eq!(person, vec!["person_id", "gender", "year_of_birth"]);
        assert_eq!(tables["person"].fields["gender"].data_type, "VARCHAR");
    }

    #[test]
    fn leading_rows_without_table_are_skipped() {
        let range = range_from_rows(vec![
            vec![s("Table"), s("Field")],
            vec![Data::Empty, s("orphan")],
            vec![s("person"), s("person_id")],
        ]);
        let tables = parse_overview_range(&range, &ReportLayout::default());
        assert_eq!(tables.len(), 1);
        assert!(!tables["person"].fields.contains_key("orphan"));
    }

    #[test]
    fn table_names_keep_surrounding_whitespace() {
        let range = range_from_rows(vec![
            vec![s("Table"), s("Field")],
            vec![s("Person "), s("Gender")],
            vec![s("   "), s("year_of_birth")],
        ]);
        let tables = parse_overview_range(&range, &ReportLayout::default());
        let names: Vec<_> = tables.keys().cloned().collect();
        assert_eq!(names, vec!["Person "]);
        assert_eq!(tables["Person "].name, "Person ");
        assert_eq!(tables["Person "].fields.len(), 2);
    }

    #[test]
    fn missing_columns_and_blank_cells_default() {
        let range = range_from_rows(vec![
            vec![s("Table"), s("Field"), s("Fraction unique"), s("N rows")],
            vec![s("person"), s("gender"), Data::Empty, Data::Float(100.0)],
        ]);
        let tables = parse_overview_range(&range, &ReportLayout::default());
        let field = &tables["person"].fields["gender"];
        assert_eq!(field.unique_fraction, -1.0);
        assert_eq!(field.row_count, 100);
        assert_eq!(field.length, -1);
        assert_eq!(field.statistics.median, -1.0);
        assert_eq!(field.description, "");
    }

    #[test]
    fn falls_back_to_second_overview_name() {
        let mut workbook = MemoryWorkbook::new().with_sheet(
            "Field Overview",
            range_from_rows(vec![vec![s("Table"), s("Field")], vec![s("t"), s("f")]]),
        );
        let (name, tables) = read_overview(&mut workbook, &ReportLayout::default()).unwrap();
        assert_eq!(name, "Field Overview");
        assert!(tables["t"].fields.contains_key("f"));
    }

    #[test]
    fn no_overview_sheet_is_an_error() {
        let mut workbook = MemoryWorkbook::new().with_sheet("person", Range::empty());
        let err = read_overview(&mut workbook, &ReportLayout::default()).unwrap_err();
        match err {
            ReportError::MissingOverviewSheet { tried } => {
                assert_eq!(tried, vec!["Overview", "Field Overview"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
