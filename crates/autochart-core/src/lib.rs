//! # autochart-core
//!
//! Cell addressing for autochart.
//!
//! This crate provides the two value types every other autochart crate builds on:
//! - [`CellAddress`] - a single cell reference such as `"C7"`, parsed and bounds-checked
//! - [`CellRange`] - a start/end pair whose ordering has already been validated
//!
//! ## Example
//!
//! ```rust
//! use autochart_core::{CellAddress, CellRange};
//!
//! let start = CellAddress::parse("A1").unwrap();
//! let end = CellAddress::parse("C6").unwrap();
//! let range = CellRange::new(start, end).unwrap();
//!
//! assert_eq!(range.col_count(), 3);
//! assert_eq!(range.row_count(), 6);
//! assert_eq!(range.to_string(), "A1:C6");
//! ```

pub mod cell;
pub mod error;

pub use cell::{CellAddress, CellRange};
pub use error::{Error, Result};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
