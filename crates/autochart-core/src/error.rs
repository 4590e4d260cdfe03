//! Error types for autochart-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing cell references and building ranges
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The string is not `<1-3 letters><digits>`
    #[error("Invalid cell reference '{0}': expected a reference such as A1 or BG23")]
    InvalidFormat(String),

    /// Column index past the last worksheet column
    #[error("Column reference '{reference}' exceeds the maximum column XFD ({max})")]
    ColumnOutOfRange { reference: String, max: u16 },

    /// Row zero or past the last worksheet row
    #[error("Row number in '{reference}' must be between 1 and {max}")]
    RowOutOfRange { reference: String, max: u32 },

    /// End cell precedes start cell
    #[error("Start cell {start} must come before end cell {end}")]
    InvalidRangeOrder { start: String, end: String },
}
