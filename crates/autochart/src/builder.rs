//! Chart construction against an open workbook

use std::ops::RangeInclusive;

use autochart_chart::{Chart, ChartOptions, DataCache};
use autochart_core::{CellAddress, CellRange};
use autochart_xlsx::{
    CellContent, CellGrid, ChartInsertion, SheetEntry, XlsxPackage, XlsxReader, XlsxWriter,
};

use crate::error::{Error, Result};
use crate::request::ChartRequest;

/// Builds a chart from a request and adds it to the target sheet
#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    options: ChartOptions,
}

impl ChartBuilder {
    /// Create a builder with the given presentation settings
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    /// Settings applied to every chart
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Build the chart for `request` and insert it on `target`
    ///
    /// Data is read from `source`. The chart is anchored in column A at the
    /// first row that holds no value and lies under no column-A drawing.
    /// The package is only modified in memory; saving is up to the caller.
    pub fn build(
        &self,
        pkg: &mut XlsxPackage,
        source: &SheetEntry,
        target: &SheetEntry,
        request: &ChartRequest,
    ) -> Result<ChartInsertion> {
        let grid = XlsxReader::read_cells(pkg, source, &cache_range(&request.range))
            .map_err(construction_failed)?;
        let mut chart = self.chart_for(request, &grid);

        let row = XlsxReader::column_a_occupancy(pkg, target)
            .map_err(construction_failed)?
            .first_free_row();
        chart.anchor = CellAddress::new(1, row).map_err(|_| {
            Error::ChartConstructionFailed(format!(
                "Column A of '{}' has no free row left",
                target.name
            ))
        })?;

        XlsxWriter::insert_chart(pkg, target, &chart).map_err(construction_failed)
    }

    /// The chart for `request`, carrying cached values read from `grid`
    pub fn chart_for(&self, request: &ChartRequest, grid: &CellGrid) -> Chart {
        let range = &request.range;
        let mut chart = Chart::for_range(
            request.chart_kind,
            &request.title,
            &request.source_sheet,
            range,
            &self.options,
        );

        let start = range.start();
        let header_row = start.row();
        let rows = data_rows(range);

        let categories = category_cache(grid, start.col(), rows.clone());
        for (series, col) in chart.series.iter_mut().zip(start.col() + 1..) {
            if let Some(name) = series.name.as_mut() {
                name.cache = DataCache::Strings(vec![cell(grid, col, header_row)
                    .map(|content| content.to_string())]);
            }
            series.values.cache = DataCache::Numbers(
                rows.clone()
                    .map(|row| cell(grid, col, row).and_then(CellContent::as_number))
                    .collect(),
            );
            if let Some(cats) = series.categories.as_mut() {
                cats.cache = categories.clone();
            }
        }

        chart
    }
}

/// Rows below the header, in sheet order
fn data_rows(range: &CellRange) -> RangeInclusive<u32> {
    let first = range.start().row() + 1;
    let last = range.end().row();
    first.min(last)..=first.max(last)
}

/// Every cell the chart references, header row included
fn cache_range(range: &CellRange) -> CellRange {
    let (start, end) = (range.start(), range.end());
    let rows = data_rows(range);
    let top = start.row().min(*rows.start());
    let bottom = (*rows.end()).max(start.row());

    match (
        CellAddress::new(start.col(), top),
        CellAddress::new(end.col(), bottom),
    ) {
        (Ok(from), Ok(to)) => CellRange::new(from, to).unwrap_or(*range),
        _ => *range,
    }
}

fn cell(grid: &CellGrid, col: u16, row: u32) -> Option<&CellContent> {
    CellAddress::new(col, row)
        .ok()
        .and_then(|addr| grid.get(&addr))
}

/// Numeric categories stay numeric; anything else is cached as text
fn category_cache(grid: &CellGrid, col: u16, rows: RangeInclusive<u32>) -> DataCache {
    let cells: Vec<Option<&CellContent>> = rows.map(|row| cell(grid, col, row)).collect();
    let numeric = cells
        .iter()
        .flatten()
        .all(|content| matches!(content, CellContent::Number(_)));

    if numeric {
        DataCache::Numbers(
            cells
                .into_iter()
                .map(|c| c.and_then(CellContent::as_number))
                .collect(),
        )
    } else {
        DataCache::Strings(
            cells
                .into_iter()
                .map(|c| c.map(|content| content.to_string()))
                .collect(),
        )
    }
}

fn construction_failed(err: autochart_xlsx::XlsxError) -> Error {
    Error::ChartConstructionFailed(err.to_string())
}
