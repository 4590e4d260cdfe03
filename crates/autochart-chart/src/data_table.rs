//! Data table shown under the plot area

/// Which parts of the data table are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataTable {
    pub show_horz_border: bool,
    pub show_vert_border: bool,
    pub show_outline: bool,
    pub show_keys: bool,
}

impl Default for DataTable {
    fn default() -> Self {
        Self {
            show_horz_border: true,
            show_vert_border: true,
            show_outline: true,
            show_keys: true,
        }
    }
}
