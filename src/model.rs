//! Profile document types and their JSON shape.
//!
//! Field names on the wire are fixed by existing consumers of the document,
//! misspellings included (`decription`, `uniqeness`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel for a numeric attribute the report does not provide.
pub const UNKNOWN: i64 = -1;

/// Ordered value → occurrence count histogram. A `None` count means the
/// report listed the value without a frequency.
pub type Frequencies = IndexMap<String, Option<i64>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub pid: String,
    #[serde(rename = "dataClasses")]
    pub data_classes: IndexMap<String, TableProfile>,
}

impl Report {
    pub fn new(pid: impl Into<String>, data_classes: IndexMap<String, TableProfile>) -> Self {
        Self {
            pid: pid.into(),
            data_classes,
        }
    }

    pub fn table_count(&self) -> usize {
        self.data_classes.len()
    }

    pub fn field_count(&self) -> usize {
        self.data_classes.values().map(|t| t.fields.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableProfile {
    pub name: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldProfile>,
}

impl TableProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldProfile {
    pub field: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(rename = "decription")]
    pub description: String,
    pub length: i64,
    #[serde(rename = "rows")]
    pub row_count: i64,
    pub rows_checked: i64,
    #[serde(rename = "emptiness", serialize_with = "sentinel_or_float")]
    pub empty_fraction: f64,
    #[serde(rename = "uniqeness", serialize_with = "sentinel_or_float")]
    pub unique_fraction: f64,
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<Frequencies>,
}

impl FieldProfile {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            data_type: String::new(),
            description: String::new(),
            length: UNKNOWN,
            row_count: UNKNOWN,
            rows_checked: UNKNOWN,
            empty_fraction: UNKNOWN as f64,
            unique_fraction: UNKNOWN as f64,
            statistics: Statistics::default(),
            frequencies: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    #[serde(serialize_with = "sentinel_or_float")]
    pub mean: f64,
    #[serde(serialize_with = "sentinel_or_float")]
    pub standard_deviation: f64,
    #[serde(serialize_with = "sentinel_or_float")]
    pub min: f64,
    #[serde(rename = "25_percentile", serialize_with = "sentinel_or_float")]
    pub p25: f64,
    #[serde(serialize_with = "sentinel_or_float")]
    pub median: f64,
    #[serde(rename = "75_percentile", serialize_with = "sentinel_or_float")]
    pub p75: f64,
    #[serde(serialize_with = "sentinel_or_float")]
    pub max: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        let unknown = UNKNOWN as f64;
        Self {
            mean: unknown,
            standard_deviation: unknown,
            min: unknown,
            p25: unknown,
            median: unknown,
            p75: unknown,
            max: unknown,
        }
    }
}

// The sentinel goes out as the integer -1, every measured value as a float.
fn sentinel_or_float<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *value == UNKNOWN as f64 {
        serializer.serialize_i64(UNKNOWN)
    } else {
        serializer.serialize_f64(*value)
    }
}
