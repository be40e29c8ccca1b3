//! Per-table frequency sheets.
//!
//! Each table gets its own sheet laid out as adjacent (value, frequency)
//! column pairs, one pair per field. The value column's header names the
//! field; the frequency column's header carries no meaning. The scanner caps
//! long value lists with a row whose value starts with a truncation marker.
//!
//! Sheet names are capped in length by the spreadsheet format, so a table's
//! sheet is found by prefix: any sheet whose full name is a prefix of the
//! table name qualifies.

use calamine::{Data, Range};
use indexmap::IndexMap;
use log::{debug, warn};

use crate::{
    error::{ReportError, ReportResult},
    layout::{ReportLayout, SheetMatch},
    model::Frequencies,
    normalize::{cell_text, frequency_count, frequency_key, is_blank},
    workbook::{WorkbookSource, cell_at},
};

/// Field name → histogram, in sheet column order.
pub type FieldFrequencies = IndexMap<String, Frequencies>;

/// Sheet names eligible to hold table frequencies, captured once per workbook.
#[derive(Debug, Clone)]
pub struct TableSheetIndex {
    names: Vec<String>,
    mode: SheetMatch,
}

impl TableSheetIndex {
    /// Builds the index from workbook order, leaving out sheets that serve
    /// another role (the overview).
    pub fn new(names: Vec<String>, excluded: &[&str], mode: SheetMatch) -> Self {
        let names = names
            .into_iter()
            .filter(|name| !excluded.contains(&name.as_str()))
            .collect();
        Self { names, mode }
    }

    pub fn resolve(&self, table: &str) -> Option<&str> {
        let mut candidates = self
            .names
            .iter()
            .filter(|name| !name.is_empty() && table.starts_with(name.as_str()));
        let chosen = match self.mode {
            SheetMatch::First => candidates.next(),
            // max_by_key keeps the last maximum, so reverse to let workbook order break ties
            SheetMatch::Longest => candidates.rev().max_by_key(|name| name.len()),
        };
        chosen.map(String::as_str)
    }
}

pub fn read_table_frequencies(
    workbook: &mut dyn WorkbookSource,
    index: &TableSheetIndex,
    table: &str,
    layout: &ReportLayout,
) -> ReportResult<FieldFrequencies> {
    let sheet_name = index
        .resolve(table)
        .ok_or_else(|| ReportError::TableSheetNotFound {
            table: table.to_string(),
        })?;
    if sheet_name != table {
        debug!("Table '{table}' resolved to truncated sheet '{sheet_name}'");
    }
    let range = workbook
        .sheet(sheet_name)?
        .ok_or_else(|| ReportError::TableSheetNotFound {
            table: table.to_string(),
        })?;
    Ok(parse_frequency_range(&range, &layout.truncation_marker))
}

pub fn parse_frequency_range(range: &Range<Data>, truncation_marker: &str) -> FieldFrequencies {
    let mut fields = FieldFrequencies::new();
    let (height, width) = range.get_size();
    if height == 0 {
        return fields;
    }

    for value_col in (0..width).step_by(2) {
        let has_data = (1..height).any(|row| {
            let (value, freq) = pair_at(range, row, value_col);
            !is_blank(value) || !is_blank(freq)
        });
        if !has_data {
            continue;
        }

        let header = cell_at(range, 0, value_col);
        if is_blank(header) {
            warn!(
                "Frequency column {} has data but no field name; skipping",
                value_col + 1
            );
            continue;
        }
        let field = cell_text(header);
        if fields.contains_key(&field) {
            warn!(
                "Frequency column {} repeats field '{field}'; keeping the first column",
                value_col + 1
            );
            continue;
        }

        let histogram = fields.entry(field.clone()).or_default();
        for row in 1..height {
            let (value, freq) = pair_at(range, row, value_col);
            if cell_text(value).starts_with(truncation_marker) {
                debug!("Values for '{field}' truncated after {} row(s)", row - 1);
                break;
            }
            if is_blank(value) && is_blank(freq) {
                continue;
            }
            let count = frequency_count(freq).unwrap_or_else(|raw| {
                warn!("Non-numeric frequency '{raw}' for '{field}' at row {}", row + 1);
                None
            });
            histogram.insert(frequency_key(value), count);
        }
    }
    fields
}

// A trailing unpaired column reads its frequencies as blank.
fn pair_at(range: &Range<Data>, row: usize, value_col: usize) -> (&Data, &Data) {
    (
        cell_at(range, row, value_col),
        cell_at(range, row, value_col + 1),
    )
}
