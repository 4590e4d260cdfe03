//! Legend types

/// Chart legend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Legend {
    /// Position
    pub position: LegendPosition,
    /// Whether legend overlays the chart
    pub overlay: bool,
}

impl Legend {
    /// Create a new legend
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            overlay: false,
        }
    }
}

/// Legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LegendPosition {
    #[default]
    Right,
    Top,
    Bottom,
    Left,
    TopRight,
}

impl LegendPosition {
    /// Value of the DrawingML `legendPos` attribute
    pub fn xml_value(&self) -> &'static str {
        match self {
            LegendPosition::Right => "r",
            LegendPosition::Top => "t",
            LegendPosition::Bottom => "b",
            LegendPosition::Left => "l",
            LegendPosition::TopRight => "tr",
        }
    }
}
