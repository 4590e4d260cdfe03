//! # autochart-chart
//!
//! The chart model autochart writes into workbooks.
//!
//! A [`Chart`] is built from a validated [`CellRange`](autochart_core::CellRange):
//! the first row of the range names the series, the first column holds the
//! categories, and every further column becomes one [`DataSeries`].
//! [`layout`] holds the sizing rule and the column-A placement scan.

mod axis;
mod chart;
mod data_table;
mod legend;
pub mod layout;
mod options;
mod series;

pub use axis::{Axis, AxisKind, AxisPosition};
pub use chart::{Chart, ChartKind};
pub use data_table::DataTable;
pub use layout::{ChartSize, ColumnOccupancy};
pub use legend::{Legend, LegendPosition};
pub use options::ChartOptions;
pub use series::{quote_sheet_name, DataCache, DataReference, DataSeries};
