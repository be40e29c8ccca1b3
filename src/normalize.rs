//! Cell coercion and JSON number normalization.
//!
//! Workbook cells arrive as [`calamine::Data`]. Nothing downstream should have
//! to care which concrete variant the workbook library produced, so this module
//! owns every conversion out of that type:
//!
//! - **Normalization**: [`normalize_cell`] and [`normalize_cells`] map cells to
//!   portable [`serde_json::Value`]s. Integers stay integers, floats stay floats,
//!   and anything JSON cannot hold (NaN, cell errors) is rejected rather than
//!   smuggled through as a string.
//! - **Typed reads**: [`cell_text`], [`cell_i64`] and [`cell_f64`] back the
//!   overview column bindings, each with an explicit default for blank cells.
//! - **Histogram keys and counts**: [`frequency_key`] and [`frequency_count`].

use calamine::Data;
use chrono::NaiveDateTime;
use serde_json::{Number, Value};

use crate::error::{ReportError, ReportResult};

/// Key used for a histogram entry whose value cell is blank.
pub const NULL_KEY: &str = "null";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
// Largest magnitude at which every integer is exactly representable as f64.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn normalize_cell(cell: &Data) -> ReportResult<Value> {
    match cell {
        Data::Empty => Ok(Value::Null),
        Data::Int(i) => Ok(Value::Number(Number::from(*i))),
        Data::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| ReportError::UnrepresentableValue(format!("non-finite number {f}"))),
        Data::Bool(b) => Ok(Value::Bool(*b)),
        Data::String(s) => Ok(Value::String(s.clone())),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            Ok(Value::String(cell_text(cell)))
        }
        Data::Error(e) => Err(ReportError::UnrepresentableValue(format!(
            "cell error {e:?}"
        ))),
    }
}

pub fn normalize_cells(cells: &[Data]) -> ReportResult<Value> {
    cells
        .iter()
        .map(normalize_cell)
        .collect::<ReportResult<Vec<_>>>()
        .map(Value::Array)
}

/// Text rendering of a cell. Integral floats drop their fractional part so a
/// value typed as `7` in the workbook reads back as `7`, not `7.0`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => format_datetime(&value),
            None => format_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
    }
}

pub fn cell_i64(cell: &Data, default: i64) -> i64 {
    match cell {
        Data::Int(i) => *i,
        Data::Float(f) => float_to_i64(*f).unwrap_or(default),
        Data::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(float_to_i64))
                .unwrap_or(default)
        }
        Data::Bool(b) => i64::from(*b),
        _ => default,
    }
}

pub fn cell_f64(cell: &Data, default: f64) -> f64 {
    let value = match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

pub fn frequency_key(cell: &Data) -> String {
    if is_blank(cell) {
        NULL_KEY.to_string()
    } else {
        cell_text(cell)
    }
}

/// Occurrence count for a histogram entry. `Ok(None)` for a blank cell, `Err`
/// with the rendered text when the cell holds something other than a count.
pub fn frequency_count(cell: &Data) -> Result<Option<i64>, String> {
    if is_blank(cell) {
        return Ok(None);
    }
    match cell {
        Data::Int(i) => Ok(Some(*i)),
        Data::Float(f) => float_to_i64(*f).map(Some).ok_or_else(|| cell_text(cell)),
        Data::String(s) => s.trim().parse::<i64>().map(Some).map_err(|_| s.clone()),
        other => Err(cell_text(other)),
    }
}

fn float_to_i64(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_INT_LIMIT)
        .then_some(value as i64)
}

fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn format_float(value: f64) -> String {
    match float_to_i64(value) {
        Some(int) => int.to_string(),
        None => value.to_string(),
    }
}
