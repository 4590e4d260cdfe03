//! Chart types

use std::fmt;

use autochart_core::{CellAddress, CellRange};

use crate::axis::Axis;
use crate::data_table::DataTable;
use crate::layout::ChartSize;
use crate::legend::Legend;
use crate::options::ChartOptions;
use crate::series::{DataReference, DataSeries};

/// Chart families autochart can insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Area,
    Bubble,
    Radar,
    Pie,
    Doughnut,
    Scatter,
}

impl ChartKind {
    /// Every family, in the order the chart-type picker lists them
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Area,
        ChartKind::Bubble,
        ChartKind::Radar,
        ChartKind::Doughnut,
        ChartKind::Scatter,
    ];

    /// Resolve a chart-type tag, falling back to [`ChartKind::Bar`]
    ///
    /// Accepts the short tag (`"pie"`) and the picker label (`"Pie Chart"`),
    /// ignoring case and surrounding whitespace. Anything else is a bar chart.
    pub fn from_tag(tag: &str) -> Self {
        Self::try_from_tag(tag).unwrap_or_default()
    }

    /// Resolve a chart-type tag without the fallback
    pub fn try_from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let short = tag.strip_suffix(" chart").unwrap_or(&tag);
        Self::ALL.into_iter().find(|kind| kind.tag() == short)
    }

    /// Short lowercase tag
    pub fn tag(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Bubble => "bubble",
            ChartKind::Radar => "radar",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Scatter => "scatter",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Area => "Area Chart",
            ChartKind::Bubble => "Bubble Chart",
            ChartKind::Radar => "Radar Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Doughnut => "Doughnut Chart",
            ChartKind::Scatter => "Scatter Chart",
        }
    }

    /// Whether series are X/Y pairs rather than values over categories
    pub fn is_xy(&self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::Bubble)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Chart definition
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart family
    pub kind: ChartKind,
    /// Chart title
    pub title: Option<String>,
    /// Built-in style number
    pub style: u8,
    /// Data series
    pub series: Vec<DataSeries>,
    /// Axes, empty for pie and doughnut charts
    pub axes: Vec<Axis>,
    /// Legend
    pub legend: Option<Legend>,
    /// Data table under the plot area
    pub data_table: Option<DataTable>,
    /// Display size
    pub size: ChartSize,
    /// Top-left cell on the target sheet
    pub anchor: CellAddress,
}

impl Chart {
    /// Create an empty chart of the given family anchored at A1
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: None,
            style: ChartOptions::default().style,
            series: Vec::new(),
            axes: Axis::pair_for(kind),
            legend: None,
            data_table: None,
            size: ChartSize::default(),
            anchor: CellAddress::A1,
        }
    }

    /// Build the chart for a block of cells
    ///
    /// The first row of `range` holds series names and the first column holds
    /// categories. Each remaining column becomes one series whose name is its
    /// header cell and whose values are the rows below it.
    pub fn for_range(
        kind: ChartKind,
        title: &str,
        sheet: &str,
        range: &CellRange,
        options: &ChartOptions,
    ) -> Self {
        let start = range.start();
        let end = range.end();
        let header_row = start.row();
        let first_data_row = start.row() + 1;

        let categories =
            DataReference::column_span(sheet, start.col(), first_data_row, end.row());

        let mut chart = Self::new(kind).with_title(title);
        chart.style = options.style;
        chart.legend = Some(Legend::new(options.legend_position));
        chart.data_table = Some(options.data_table);
        chart.size = ChartSize::for_range(range);

        for col in (start.col() + 1)..=end.col() {
            let series = DataSeries::new(DataReference::column_span(
                sheet,
                col,
                first_data_row,
                end.row(),
            ))
            .with_name(DataReference::column_span(sheet, col, header_row, header_row))
            .with_categories(categories.clone());
            chart.add_series(series);
        }

        chart
    }

    /// Set chart title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a data series
    pub fn add_series(&mut self, series: DataSeries) {
        self.series.push(series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(ChartKind::from_tag("bar"), ChartKind::Bar);
        assert_eq!(ChartKind::from_tag("Line Chart"), ChartKind::Line);
        assert_eq!(ChartKind::from_tag("DOUGHNUT"), ChartKind::Doughnut);
        assert_eq!(ChartKind::from_tag(" scatter chart "), ChartKind::Scatter);
        assert_eq!(ChartKind::from_tag("PIE CHART"), ChartKind::Pie);
        assert_eq!(ChartKind::from_tag("Radar Chart"), ChartKind::Radar);
    }

    #[test]
    fn test_kind_unknown_falls_back_to_bar() {
        assert_eq!(ChartKind::from_tag("waterfall"), ChartKind::Bar);
        assert_eq!(ChartKind::from_tag(""), ChartKind::Bar);
        assert_eq!(ChartKind::try_from_tag("waterfall"), None);
    }

    #[test]
    fn test_kind_labels_roundtrip() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_tag(kind.label()), kind);
            assert_eq!(ChartKind::from_tag(kind.tag()), kind);
        }
    }

    #[test]
    fn test_for_range_series_layout() {
        let range = CellRange::parse("A1", "C5").unwrap();
        let chart = Chart::for_range(
            ChartKind::Line,
            "Sales",
            "Data",
            &range,
            &ChartOptions::default(),
        );

        assert_eq!(chart.title.as_deref(), Some("Sales"));
        assert_eq!(chart.style, 10);
        assert_eq!(chart.series.len(), 2);

        let first = &chart.series[0];
        assert_eq!(first.name.as_ref().unwrap().formula, "Data!$B$1");
        assert_eq!(first.values.formula, "Data!$B$2:$B$5");
        assert_eq!(
            first.categories.as_ref().unwrap().formula,
            "Data!$A$2:$A$5"
        );

        let second = &chart.series[1];
        assert_eq!(second.name.as_ref().unwrap().formula, "Data!$C$1");
        assert_eq!(second.values.formula, "Data!$C$2:$C$5");

        assert!(chart.legend.is_some());
        assert_eq!(chart.data_table, Some(DataTable::default()));
    }

    #[test]
    fn test_for_range_single_column_has_no_series() {
        let range = CellRange::parse("A1", "A5").unwrap();
        let chart = Chart::for_range(
            ChartKind::Bar,
            "Empty",
            "Data",
            &range,
            &ChartOptions::default(),
        );
        assert!(chart.series.is_empty());
    }

    #[test]
    fn test_axes_per_family() {
        assert!(Chart::new(ChartKind::Pie).axes.is_empty());
        assert!(Chart::new(ChartKind::Doughnut).axes.is_empty());

        let bar = Chart::new(ChartKind::Bar);
        assert_eq!(bar.axes.len(), 2);
        assert_eq!(bar.axes[0].kind, AxisKind::Category);

        let scatter = Chart::new(ChartKind::Scatter);
        assert!(scatter.axes.iter().all(|a| a.kind == AxisKind::Value));
    }
}
