//! Prelude module - common imports for autochart users
//!
//! ```rust
//! use autochart::prelude::*;
//! ```

pub use crate::{
    list_sheets,
    // Cell types
    CellAddress,
    CellRange,
    // Chart types
    ChartForm,
    ChartKind,
    ChartOptions,
    ChartReport,
    ChartRequest,
    // Error types
    Error,
    LegendPosition,
    Orchestrator,
    Result,
};
