//! Request orchestration: open, build, save, report
//!
//! Each call opens the workbook fresh, makes all changes in memory and
//! writes the result back over the original file in one atomic step.
//! Validation and sheet lookup failures leave the file untouched.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use autochart_chart::{ChartKind, ChartOptions};
use autochart_core::CellAddress;
use autochart_xlsx::{SheetEntry, XlsxPackage, XlsxReader};

use crate::builder::ChartBuilder;
use crate::error::{Error, Result};
use crate::form::ChartForm;
use crate::request::ChartRequest;

/// What a successful request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartReport {
    /// Workbook that was updated
    pub file: PathBuf,
    /// Sheet the chart was placed on
    pub target_sheet: String,
    /// Top-left cell of the chart
    pub anchor: CellAddress,
    /// Zip entry name of the new chart part
    pub chart_part: String,
    /// Chart family that was drawn
    pub kind: ChartKind,
}

impl fmt::Display for ChartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} chart to '{}'!{} in {}",
            self.kind,
            self.target_sheet,
            self.anchor,
            self.file.display()
        )
    }
}

/// Runs chart requests against workbooks on disk
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    builder: ChartBuilder,
}

impl Orchestrator {
    /// Create an orchestrator with default chart settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator with custom chart settings
    pub fn with_options(options: ChartOptions) -> Self {
        Self {
            builder: ChartBuilder::new(options),
        }
    }

    /// Chart settings in use
    pub fn options(&self) -> &ChartOptions {
        self.builder.options()
    }

    /// Add the requested chart to its workbook and save it in place
    pub fn create_chart(&self, request: &ChartRequest) -> Result<ChartReport> {
        let path = request.file_path.as_path();
        tracing::info!("Opening workbook: {}", path.display());

        let mut pkg = open_workbook(path)?;
        let sheets = XlsxReader::sheets(&pkg).map_err(|e| open_failed(path, e))?;

        let source = find_sheet(&sheets, &request.source_sheet)
            .ok_or_else(|| Error::SheetNotFound(request.source_sheet.clone()))?;
        let target = resolve_target(&sheets, source, request.target_sheet.as_deref());

        tracing::info!(
            "Processing range: {} to {}",
            request.range.start(),
            request.range.end()
        );
        let inserted = self.builder.build(&mut pkg, source, target, request)?;
        tracing::info!(
            "Chart created successfully. Type: {}, Title: {}",
            request.chart_kind,
            request.title
        );

        tracing::info!("Saving workbook");
        pkg.save(path)
            .map_err(|e| Error::ChartConstructionFailed(e.to_string()))?;
        tracing::info!("Workbook saved successfully");

        Ok(ChartReport {
            file: request.file_path.clone(),
            target_sheet: target.name.clone(),
            anchor: inserted.anchor,
            chart_part: inserted.chart_part,
            kind: request.chart_kind,
        })
    }

    /// Validate a raw form and run it
    pub fn submit(&self, form: &ChartForm) -> Result<ChartReport> {
        let request = form.validate()?;
        tracing::debug!(?request, "Validated form");
        self.create_chart(&request)
    }

    /// Run forms one after another, stopping at the first failure
    pub fn run_forms(&self, forms: &[ChartForm]) -> Result<Vec<ChartReport>> {
        let mut reports = Vec::with_capacity(forms.len());
        for (index, form) in forms.iter().enumerate() {
            tracing::debug!(index, "Running batch entry");
            reports.push(self.submit(form)?);
        }
        Ok(reports)
    }

    /// Run every form in a JSON batch file
    ///
    /// The file holds an array of [`ChartForm`] objects. Entries run in
    /// order and the first failure stops the batch; charts already saved by
    /// earlier entries stay in place.
    pub fn run_batch<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ChartReport>> {
        let text = fs::read_to_string(path.as_ref())?;
        let forms: Vec<ChartForm> = serde_json::from_str(&text)?;
        tracing::info!("Running {} chart requests", forms.len());
        self.run_forms(&forms)
    }
}

/// Sheet names of a workbook, in workbook order
pub fn list_sheets<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let pkg = open_workbook(path)?;
    XlsxReader::sheet_names(&pkg).map_err(|e| open_failed(path, e))
}

fn open_workbook(path: &Path) -> Result<XlsxPackage> {
    XlsxPackage::open(path).map_err(|e| open_failed(path, e))
}

fn open_failed(path: &Path, err: autochart_xlsx::XlsxError) -> Error {
    Error::WorkbookOpenFailed {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn find_sheet<'a>(sheets: &'a [SheetEntry], name: &str) -> Option<&'a SheetEntry> {
    sheets.iter().find(|sheet| sheet.name == name)
}

fn resolve_target<'a>(
    sheets: &'a [SheetEntry],
    source: &'a SheetEntry,
    requested: Option<&str>,
) -> &'a SheetEntry {
    match requested {
        None => source,
        Some(name) => match find_sheet(sheets, name) {
            Some(sheet) => sheet,
            None => {
                tracing::debug!(
                    "Target sheet '{}' not found, using '{}'",
                    name,
                    source.name
                );
                source
            }
        },
    }
}
