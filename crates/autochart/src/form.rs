//! Raw chart form input and its validation
//!
//! A [`ChartForm`] holds the fields exactly as a user typed them. Nothing
//! is opened or written until [`ChartForm::validate`] has turned it into a
//! [`ChartRequest`].

use std::path::PathBuf;

use autochart_chart::ChartKind;
use autochart_core::{CellAddress, CellRange};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::ChartRequest;

/// Unvalidated chart request, one string per form field
///
/// Batch files are arrays of these objects; missing keys read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartForm {
    #[serde(alias = "file_path")]
    pub file: String,
    #[serde(alias = "sheet")]
    pub source_sheet: String,
    pub target_sheet: Option<String>,
    #[serde(alias = "start")]
    pub start_cell: String,
    #[serde(alias = "end")]
    pub end_cell: String,
    pub chart_type: String,
    pub title: String,
}

impl ChartForm {
    /// Check every field and build the request
    ///
    /// Empty fields are reported in form order, then both cell references
    /// are parsed and their order checked. An empty target sheet means
    /// "same as source". An unrecognised chart type becomes a bar chart.
    pub fn validate(&self) -> Result<ChartRequest> {
        if self.file.is_empty() {
            return Err(Error::MissingField("file"));
        }
        if self.source_sheet.is_empty() {
            return Err(Error::MissingField("source sheet"));
        }
        if self.start_cell.is_empty() || self.end_cell.is_empty() {
            return Err(Error::MissingField("start cell and end cell"));
        }
        if self.chart_type.is_empty() {
            return Err(Error::MissingField("chart type"));
        }
        if self.title.is_empty() {
            return Err(Error::MissingField("title"));
        }

        let start = CellAddress::parse(&self.start_cell)?;
        let end = CellAddress::parse(&self.end_cell)?;
        let range = CellRange::new(start, end)?;

        let chart_kind = match ChartKind::try_from_tag(&self.chart_type) {
            Some(kind) => kind,
            None => {
                tracing::debug!(
                    chart_type = %self.chart_type,
                    "Unknown chart type, using {}",
                    ChartKind::default()
                );
                ChartKind::default()
            }
        };

        let target_sheet = self
            .target_sheet
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned();

        Ok(ChartRequest {
            file_path: PathBuf::from(&self.file),
            source_sheet: self.source_sheet.clone(),
            target_sheet,
            range,
            chart_kind,
            title: self.title.clone(),
        })
    }
}
