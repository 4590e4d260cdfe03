//! # autochart
//!
//! Add charts to existing Excel workbooks.
//!
//! Point autochart at an `.xlsx` file, a sheet and a block of cells, and it
//! draws a chart of that block next to the data: the first row names the
//! series, the first column holds the categories, and the chart lands in
//! column A below everything already there.
//!
//! ## Features
//!
//! - Eight chart families: bar, line, area, bubble, radar, pie, doughnut, scatter
//! - Validates cell references and range order before touching the file
//! - Keeps every other part of the workbook byte-for-byte, existing charts included
//! - Saves atomically through a temporary file in the same directory
//! - Runs JSON batch files of requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use autochart::prelude::*;
//!
//! let form = ChartForm {
//!     file: "sales.xlsx".into(),
//!     source_sheet: "Data".into(),
//!     start_cell: "a1".into(),
//!     end_cell: "c6".into(),
//!     chart_type: "Line Chart".into(),
//!     title: "Monthly sales".into(),
//!     ..ChartForm::default()
//! };
//!
//! let report = Orchestrator::new().submit(&form)?;
//! println!("{}", report);
//! # Ok::<(), autochart::Error>(())
//! ```

pub mod builder;
pub mod error;
pub mod form;
pub mod orchestrator;
pub mod prelude;
pub mod request;

pub use builder::ChartBuilder;
pub use error::{Error, Result};
pub use form::ChartForm;
pub use orchestrator::{list_sheets, ChartReport, Orchestrator};
pub use request::ChartRequest;

// Re-export core types
pub use autochart_core::{CellAddress, CellRange, MAX_COLS, MAX_ROWS};

// Re-export chart types
pub use autochart_chart::{Chart, ChartKind, ChartOptions, DataTable, LegendPosition};

// Re-export package types
pub use autochart_xlsx::{XlsxError, XlsxPackage};
