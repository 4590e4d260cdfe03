//! Error types for autochart

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a chart request can fail with
#[derive(Debug, Error)]
pub enum Error {
    /// A cell reference or range was rejected
    #[error(transparent)]
    Reference(#[from] autochart_core::Error),

    /// A required form field was left empty
    #[error("Please provide the {0}")]
    MissingField(&'static str),

    /// The workbook could not be opened as an XLSX package
    #[error("Failed to open workbook '{}': {message}", path.display())]
    WorkbookOpenFailed { path: PathBuf, message: String },

    /// No sheet with this name exists in the workbook
    #[error("Worksheet '{0}' does not exist")]
    SheetNotFound(String),

    /// Building, inserting or saving the chart failed
    #[error("Failed to create chart: {0}")]
    ChartConstructionFailed(String),

    /// IO error while reading a batch file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed batch file
    #[error("Invalid batch file: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the request was rejected before any file was touched
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Reference(_) | Error::MissingField(_))
    }
}
