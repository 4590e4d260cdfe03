//! Chart sizing and placement on a sheet
//!
//! Charts are sized from the block they plot and placed in column A at the
//! first row nothing else claims.

use std::collections::BTreeSet;

use autochart_core::{CellRange, MAX_ROWS};

/// EMUs per centimetre
pub const EMU_PER_CM: f64 = 360_000.0;

/// Height of a default worksheet row (15pt) in EMUs
pub const DEFAULT_ROW_HEIGHT_EMU: i64 = 190_500;

/// Display size of a chart, in centimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width_cm: 15.0,
            height_cm: 7.5,
        }
    }
}

impl ChartSize {
    /// Size for a plotted block: `16 + 0.8 × columns` wide, `8 + 0.5 × rows` tall
    pub fn for_range(range: &CellRange) -> Self {
        Self {
            width_cm: 16.0 + 0.8 * range.col_count() as f64,
            height_cm: 8.0 + 0.5 * range.row_count() as f64,
        }
    }

    /// Width in EMUs
    pub fn width_emu(&self) -> i64 {
        ((self.width_cm * EMU_PER_CM).round() as i64).max(0)
    }

    /// Height in EMUs
    pub fn height_emu(&self) -> i64 {
        ((self.height_cm * EMU_PER_CM).round() as i64).max(0)
    }
}

/// Number of default-height rows an object of `height_emu` spans (at least one)
pub fn rows_spanned(height_emu: i64) -> u32 {
    if height_emu <= 0 {
        return 1;
    }
    let rows = (height_emu + DEFAULT_ROW_HEIGHT_EMU - 1) / DEFAULT_ROW_HEIGHT_EMU;
    rows.clamp(1, u32::MAX as i64) as u32
}

/// Which rows of column A are taken, by cell values or by drawings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOccupancy {
    rows: BTreeSet<u32>,
    spans: Vec<(u32, u32)>,
}

impl ColumnOccupancy {
    /// Create an empty occupancy map
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a 1-based row as holding a value
    pub fn mark_row(&mut self, row: u32) {
        self.rows.insert(row);
    }

    /// Mark an inclusive span of 1-based rows as covered by a drawing
    ///
    /// Rows past the last worksheet row are dropped.
    pub fn mark_span(&mut self, first: u32, last: u32) {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        if first <= MAX_ROWS {
            self.spans.push((first, last.min(MAX_ROWS)));
        }
    }

    /// Whether a row is taken
    fn is_occupied(&self, row: u32) -> bool {
        self.rows.contains(&row) || self.span_end(row).is_some()
    }

    /// Scan down from row 1 and return the first row that is free
    ///
    /// Returns `MAX_ROWS + 1` when every worksheet row is taken.
    pub fn first_free_row(&self) -> u32 {
        let mut row = 1u32;
        while row <= MAX_ROWS {
            if !self.is_occupied(row) {
                return row;
            }
            row = match self.span_end(row) {
                Some(last) => last + 1,
                None => row + 1,
            };
        }
        MAX_ROWS + 1
    }

    /// Last row of the furthest-reaching span covering `row`
    fn span_end(&self, row: u32) -> Option<u32> {
        self.spans
            .iter()
            .filter(|&&(a, b)| (a..=b).contains(&row))
            .map(|&(_, b)| b)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_size_for_range() {
        let range = CellRange::parse("A1", "C5").unwrap();
        let size = ChartSize::for_range(&range);
        assert!((size.width_cm - 18.4).abs() < 1e-9);
        assert!((size.height_cm - 10.5).abs() < 1e-9);
        assert_eq!(size.width_emu(), 6_624_000);
        assert_eq!(size.height_emu(), 3_780_000);
    }

    #[test]
    fn test_rows_spanned() {
        assert_eq!(rows_spanned(0), 1);
        assert_eq!(rows_spanned(DEFAULT_ROW_HEIGHT_EMU), 1);
        assert_eq!(rows_spanned(DEFAULT_ROW_HEIGHT_EMU + 1), 2);
        assert_eq!(rows_spanned(3_780_000), 20);
    }

    #[test]
    fn test_first_free_row_empty() {
        assert_eq!(ColumnOccupancy::new().first_free_row(), 1);
    }

    #[test]
    fn test_first_free_row_after_values() {
        let mut occ = ColumnOccupancy::new();
        for row in 1..=4 {
            occ.mark_row(row);
        }
        assert_eq!(occ.first_free_row(), 5);
    }

    #[test]
    fn test_first_free_row_stops_at_gap() {
        let mut occ = ColumnOccupancy::new();
        occ.mark_row(1);
        occ.mark_row(2);
        occ.mark_row(4);
        assert_eq!(occ.first_free_row(), 3);
    }

    #[test]
    fn test_first_free_row_skips_drawings() {
        let mut occ = ColumnOccupancy::new();
        occ.mark_row(1);
        occ.mark_span(2, 21);
        occ.mark_row(22);
        assert_eq!(occ.first_free_row(), 23);
        assert!(occ.is_occupied(10));
        assert!(!occ.is_occupied(23));
    }

    #[test]
    fn test_first_free_row_with_oversized_span() {
        // A corrupt drawing can claim rows far past the sheet end
        let mut occ = ColumnOccupancy::new();
        occ.mark_span(1, u32::MAX);
        assert!(occ.is_occupied(MAX_ROWS));
        assert_eq!(occ.first_free_row(), MAX_ROWS + 1);

        let mut occ = ColumnOccupancy::new();
        occ.mark_row(1);
        occ.mark_span(u32::MAX, 2);
        assert_eq!(occ.first_free_row(), MAX_ROWS + 1);
    }

    #[test]
    fn test_first_free_row_below_sheet_end() {
        let mut occ = ColumnOccupancy::new();
        occ.mark_span(1, MAX_ROWS - 1);
        assert_eq!(occ.first_free_row(), MAX_ROWS);
    }
}
