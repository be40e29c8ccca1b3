//! Report layout: which sheet names, headers and sentinels the scanner writes,
//! and how strictly drift from that layout is handled.
//!
//! The defaults describe the WhiteRabbit scan report. A YAML file can override
//! any subset of fields, e.g. to accept a renamed overview sheet:
//!
//! ```yaml
//! overview_sheets: ["Overview", "Field Overview", "Table Overview"]
//! missing_table_sheet: fail
//! sheet_match: longest
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ReportError, ReportResult},
    model::UNKNOWN,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    #[default]
    Skip,
    Fail,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetMatch {
    /// First sheet, in workbook order, whose name prefixes the table name.
    #[default]
    First,
    /// Longest prefixing sheet name; equal lengths fall back to workbook order.
    Longest,
}

/// Field of a [`crate::model::FieldProfile`] an overview column feeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OverviewField {
    Table,
    Field,
    Type,
    Description,
    Length,
    Rows,
    RowsChecked,
    Emptiness,
    Uniqueness,
    Mean,
    StandardDeviation,
    Min,
    P25,
    Median,
    P75,
    Max,
}

impl OverviewField {
    pub fn is_text(self) -> bool {
        matches!(
            self,
            OverviewField::Table | OverviewField::Field | OverviewField::Type | OverviewField::Description
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnBinding {
    pub header: String,
    pub target: OverviewField,
    /// Value used when the column is missing or the cell is blank. Ignored for
    /// text targets, which default to an empty string.
    #[serde(default = "unknown_default")]
    pub default: f64,
}

fn unknown_default() -> f64 {
    UNKNOWN as f64
}

impl ColumnBinding {
    fn new(header: &str, target: OverviewField) -> Self {
        Self {
            header: header.to_string(),
            target,
            default: unknown_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportLayout {
    pub overview_sheets: Vec<String>,
    pub truncation_marker: String,
    pub columns: Vec<ColumnBinding>,
    pub missing_table_sheet: Policy,
    pub unknown_field: Policy,
    pub sheet_match: SheetMatch,
}

impl Default for ReportLayout {
    fn default() -> Self {
        use OverviewField as F;
        Self {
            overview_sheets: vec!["Overview".to_string(), "Field Overview".to_string()],
            truncation_marker: "List truncated".to_string(),
            columns: vec![
                ColumnBinding::new("Table", F::Table),
                ColumnBinding::new("Field", F::Field),
                ColumnBinding::new("Type", F::Type),
                ColumnBinding::new("Description", F::Description),
                ColumnBinding::new("Max length", F::Length),
                ColumnBinding::new("N rows", F::Rows),
                ColumnBinding::new("N rows checked", F::RowsChecked),
                ColumnBinding::new("Fraction empty", F::Emptiness),
                ColumnBinding::new("Fraction unique", F::Uniqueness),
                ColumnBinding::new("Average", F::Mean),
                ColumnBinding::new("Standard Deviation", F::StandardDeviation),
                ColumnBinding::new("Min", F::Min),
                ColumnBinding::new("25%", F::P25),
                ColumnBinding::new("Median", F::Median),
                ColumnBinding::new("75%", F::P75),
                ColumnBinding::new("Max", F::Max),
            ],
            missing_table_sheet: Policy::Skip,
            unknown_field: Policy::Skip,
            sheet_match: SheetMatch::First,
        }
    }
}

impl ReportLayout {
    pub fn load(path: &Path) -> ReportResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> ReportResult<Self> {
        let layout: Self =
            serde_yaml::from_str(raw).map_err(|err| ReportError::Layout(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.overview_sheets.is_empty() {
            return Err(ReportError::Layout(
                "at least one overview sheet name is required".to_string(),
            ));
        }
        if self.truncation_marker.is_empty() {
            return Err(ReportError::Layout(
                "truncation marker must not be empty".to_string(),
            ));
        }
        for required in [OverviewField::Table, OverviewField::Field] {
            if !self.columns.iter().any(|c| c.target == required) {
                return Err(ReportError::Layout(format!(
                    "no column bound to {required:?}"
                )));
            }
        }
        Ok(())
    }

    pub fn binding(&self, target: OverviewField) -> Option<&ColumnBinding> {
        self.columns.iter().find(|c| c.target == target)
    }
}
