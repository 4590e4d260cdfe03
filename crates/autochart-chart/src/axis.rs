//! Axis types

use crate::chart::ChartKind;

/// Chart axis
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Identifier referenced by the plot's `axId` elements
    pub id: u32,
    /// The axis this one crosses
    pub cross_id: u32,
    /// Category or value axis
    pub kind: AxisKind,
    /// Position
    pub position: AxisPosition,
}

impl Axis {
    /// Create a new axis
    pub fn new(id: u32, cross_id: u32, kind: AxisKind, position: AxisPosition) -> Self {
        Self {
            id,
            cross_id,
            kind,
            position,
        }
    }

    /// The axis pair a chart family plots against
    ///
    /// Pie and doughnut charts have no axes. Scatter and bubble charts plot
    /// two value axes; every other family pairs a category axis with a value
    /// axis.
    pub fn pair_for(kind: ChartKind) -> Vec<Axis> {
        const X_ID: u32 = 10;
        const Y_ID: u32 = 100;

        match kind {
            ChartKind::Pie | ChartKind::Doughnut => Vec::new(),
            ChartKind::Scatter | ChartKind::Bubble => vec![
                Axis::new(X_ID, Y_ID, AxisKind::Value, AxisPosition::Bottom),
                Axis::new(Y_ID, X_ID, AxisKind::Value, AxisPosition::Left),
            ],
            ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Radar => vec![
                Axis::new(X_ID, Y_ID, AxisKind::Category, AxisPosition::Bottom),
                Axis::new(Y_ID, X_ID, AxisKind::Value, AxisPosition::Left),
            ],
        }
    }
}

/// Axis flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Category,
    Value,
}

/// Axis position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

impl AxisPosition {
    /// Value of the DrawingML `axPos` attribute
    pub fn xml_value(&self) -> &'static str {
        match self {
            AxisPosition::Bottom => "b",
            AxisPosition::Top => "t",
            AxisPosition::Left => "l",
            AxisPosition::Right => "r",
        }
    }
}
