use std::path::PathBuf;

use thiserror::Error;

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unreadable report {path:?}: {reason}")]
    UnreadableReport { path: PathBuf, reason: String },

    #[error("Unreadable sheet '{sheet}': {reason}")]
    UnreadableSheet { sheet: String, reason: String },

    #[error("No overview sheet found (tried {})", .tried.join(", "))]
    MissingOverviewSheet { tried: Vec<String> },

    #[error("No sheet name is a prefix of table '{table}'")]
    TableSheetNotFound { table: String },

    #[error("Frequency sheet for table '{table}' references undeclared field '{field}'")]
    UnknownFieldInFrequencyTable { table: String, field: String },

    #[error("Cell value cannot be represented in JSON: {0}")]
    UnrepresentableValue(String),

    #[error("No dataset identifier given and {0:?} does not follow profiles/<id>/<file>")]
    MissingDatasetId(PathBuf),

    #[error("Invalid report layout: {0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
