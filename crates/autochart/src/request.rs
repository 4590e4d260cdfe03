//! Validated chart requests

use std::path::PathBuf;

use autochart_chart::ChartKind;
use autochart_core::CellRange;

/// Everything needed to add one chart to a workbook
///
/// Built by [`ChartForm::validate`](crate::ChartForm::validate) or directly
/// from already-typed values. The range has passed the order check by
/// construction.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartRequest {
    /// Workbook to update in place
    pub file_path: PathBuf,
    /// Sheet the data is read from
    pub source_sheet: String,
    /// Sheet the chart is placed on; the source sheet when absent
    pub target_sheet: Option<String>,
    /// Header row plus category column plus one column per series
    pub range: CellRange,
    /// Chart family
    pub chart_kind: ChartKind,
    /// Chart title
    pub title: String,
}

impl ChartRequest {
    /// Create a request that places the chart on the source sheet
    pub fn new<P, S, T>(
        file_path: P,
        source_sheet: S,
        range: CellRange,
        chart_kind: ChartKind,
        title: T,
    ) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            file_path: file_path.into(),
            source_sheet: source_sheet.into(),
            target_sheet: None,
            range,
            chart_kind,
            title: title.into(),
        }
    }

    /// Place the chart on another sheet
    pub fn with_target_sheet<S: Into<String>>(mut self, sheet: S) -> Self {
        self.target_sheet = Some(sheet.into());
        self
    }
}
