//! # autochart-xlsx
//!
//! XLSX (Office Open XML) package access for autochart.
//!
//! A workbook is loaded as an [`XlsxPackage`]: every part of the zip archive
//! is held in memory and written back unchanged unless it has to be patched.
//! [`XlsxReader`] answers the questions chart insertion needs (sheet names,
//! cell values, which rows of column A are taken) and [`XlsxWriter`] adds a
//! chart part, its drawing, and the relationships that tie them to a sheet.

pub mod content_types;
pub mod error;
pub mod package;
pub mod reader;
pub mod rels;
pub mod writer;

mod xml;

pub use error::{XlsxError, XlsxResult};
pub use package::XlsxPackage;
pub use reader::{CellContent, CellGrid, SheetEntry, XlsxReader};
pub use writer::{ChartInsertion, XlsxWriter};
