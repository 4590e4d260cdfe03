//! Presentation settings applied to every chart

use crate::data_table::DataTable;
use crate::legend::LegendPosition;

/// Settings that do not come from the request itself
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChartOptions {
    /// Built-in chart style number (1-48)
    pub style: u8,
    /// Where the legend sits
    pub legend_position: LegendPosition,
    /// Data table flags
    pub data_table: DataTable,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            style: 10,
            legend_position: LegendPosition::Right,
            data_table: DataTable::default(),
        }
    }
}
