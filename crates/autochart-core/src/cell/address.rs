//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use lazy_regex::regex_captures;
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "BG23")
///
/// Both coordinates are 1-based, the way they are written in a worksheet:
/// column `A` is 1 and `XFD` is 16384, row numbers run from 1 to 1048576.
/// An address can only be built through [`CellAddress::parse`] or
/// [`CellAddress::new`], so its coordinates are always within those bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct CellAddress {
    col: u16,
    row: u32,
}

impl CellAddress {
    /// The top-left cell of a sheet
    pub const A1: CellAddress = CellAddress { col: 1, row: 1 };

    /// Create an address from 1-based column and row indices
    pub fn new(col: u16, row: u32) -> Result<Self> {
        if col == 0 || col > MAX_COLS {
            return Err(Error::ColumnOutOfRange {
                reference: format!("column {}", col),
                max: MAX_COLS,
            });
        }
        if row == 0 || row > MAX_ROWS {
            return Err(Error::RowOutOfRange {
                reference: format!("row {}", row),
                max: MAX_ROWS,
            });
        }
        Ok(Self { col, row })
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Lowercase letters are accepted and folded to uppercase before matching
    /// `^[A-Z]{1,3}[0-9]+$`. Absolute markers (`$`) are not part of the
    /// accepted syntax.
    ///
    /// # Examples
    /// ```
    /// use autochart_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("BG23").unwrap();
    /// assert_eq!(addr.col(), 59);
    /// assert_eq!(addr.row(), 23);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        let (_, letters, digits) = regex_captures!(r"^([A-Z]{1,3})([0-9]+)$", &upper)
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))?;

        let col = Self::letters_to_column(letters)?;

        // Digit strings too long for u32 are out of range by definition
        let row = match digits.parse::<u32>() {
            Ok(row) if (1..=MAX_ROWS).contains(&row) => row,
            _ => {
                return Err(Error::RowOutOfRange {
                    reference: upper,
                    max: MAX_ROWS,
                })
            }
        };

        Ok(Self { col, row })
    }

    /// 1-based column index (A = 1)
    pub fn col(&self) -> u16 {
        self.col
    }

    /// 1-based row number
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() || letters.len() > 3 {
            return Err(Error::InvalidFormat(letters.to_string()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidFormat(letters.to_string()));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }

        if col > MAX_COLS as u32 {
            return Err(Error::ColumnOutOfRange {
                reference: letters.to_ascii_uppercase(),
                max: MAX_COLS,
            });
        }

        Ok(col as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }

    /// Format as an absolute reference (`$A$1`), the form chart formulas use
    pub fn to_absolute_string(&self) -> String {
        format!("${}${}", Self::column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl From<CellAddress> for String {
    fn from(addr: CellAddress) -> Self {
        addr.to_a1_string()
    }
}

impl TryFrom<String> for CellAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A validated range of cells (e.g., "A1:C6")
///
/// The start must precede or equal the end in column-major reading order:
/// either the start column is left of the end column, or both share a column
/// and the start row is not below the end row. Rows are deliberately not
/// compared when the columns differ, so `A10:C2` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    /// Create a range, rejecting an end that precedes the start
    pub fn new(start: CellAddress, end: CellAddress) -> Result<Self> {
        let ordered = start.col < end.col || (start.col == end.col && start.row <= end.row);
        if !ordered {
            return Err(Error::InvalidRangeOrder {
                start: start.to_a1_string(),
                end: end.to_a1_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends of a range and validate their order
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(CellAddress::parse(start)?, CellAddress::parse(end)?)
    }

    /// Start address (first column, header row)
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// End address
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Get the number of rows in the range
    ///
    /// Counted as `end.row - start.row + 1`; for a range whose end row sits
    /// above its start row this is zero or negative, which is why it is signed.
    pub fn row_count(&self) -> i64 {
        self.end.row as i64 - self.start.row as i64 + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(1), "A");
        assert_eq!(CellAddress::column_to_letters(2), "B");
        assert_eq!(CellAddress::column_to_letters(26), "Z");
        assert_eq!(CellAddress::column_to_letters(27), "AA");
        assert_eq!(CellAddress::column_to_letters(28), "AB");
        assert_eq!(CellAddress::column_to_letters(702), "ZZ");
        assert_eq!(CellAddress::column_to_letters(703), "AAA");
        assert_eq!(CellAddress::column_to_letters(16384), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 27);
        assert_eq!(CellAddress::letters_to_column("BG").unwrap(), 59);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 27);
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!((addr.col(), addr.row()), (1, 1));

        assert_eq!(CellAddress::parse("Z1").unwrap().col(), 26);
        assert_eq!(CellAddress::parse("AA1").unwrap().col(), 27);
        assert_eq!(CellAddress::parse("XFD1").unwrap().col(), 16384);
        assert_eq!(CellAddress::parse("A1048576").unwrap().row(), 1_048_576);

        let addr = CellAddress::parse("bg23").unwrap();
        assert_eq!((addr.col(), addr.row()), (59, 23));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(matches!(CellAddress::parse(""), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("1"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("$A$1"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("ABCD1"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse("A1B"), Err(Error::InvalidFormat(_))));
        assert!(matches!(CellAddress::parse(" A1"), Err(Error::InvalidFormat(_))));

        assert!(matches!(
            CellAddress::parse("XFE1"),
            Err(Error::ColumnOutOfRange { .. })
        ));
        assert!(matches!(
            CellAddress::parse("ZZZ1"),
            Err(Error::ColumnOutOfRange { .. })
        ));

        assert!(matches!(CellAddress::parse("A0"), Err(Error::RowOutOfRange { .. })));
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::RowOutOfRange { .. })
        ));
        assert!(matches!(
            CellAddress::parse("A99999999999"),
            Err(Error::RowOutOfRange { .. })
        ));
    }

    #[test]
    fn test_cell_address_new_bounds() {
        assert!(CellAddress::new(1, 1).is_ok());
        assert!(CellAddress::new(16384, 1_048_576).is_ok());
        assert!(CellAddress::new(0, 1).is_err());
        assert!(CellAddress::new(16385, 1).is_err());
        assert!(CellAddress::new(1, 0).is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(1, 1).unwrap().to_string(), "A1");
        assert_eq!(CellAddress::new(3, 100).unwrap().to_string(), "C100");
        assert_eq!(
            CellAddress::new(2, 5).unwrap().to_absolute_string(),
            "$B$5"
        );
    }

    #[test]
    fn test_range_order() {
        let range = CellRange::parse("A1", "C6").unwrap();
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.row_count(), 6);
        assert_eq!(range.to_string(), "A1:C6");

        // Single cell
        let range = CellRange::parse("C3", "C3").unwrap();
        assert_eq!(range.to_string(), "C3");

        assert!(matches!(
            CellRange::parse("B5", "A10"),
            Err(Error::InvalidRangeOrder { .. })
        ));
        assert!(matches!(
            CellRange::parse("A10", "A5"),
            Err(Error::InvalidRangeOrder { .. })
        ));
    }

    #[test]
    fn test_range_rows_unchecked_across_columns() {
        let range = CellRange::parse("A10", "C2").unwrap();
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.row_count(), -7);
    }
}
