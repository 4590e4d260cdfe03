//! Batch files of chart requests

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use autochart::prelude::*;
use pretty_assertions::assert_eq;

const TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;
const ROOT_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
const WORKBOOK: &str = r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Q1 Sales" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
const WORKBOOK_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
const SHEET: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Region</t></is></c><c r="B1" t="inlineStr"><is><t>Units</t></is></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>East</t></is></c><c r="B2"><v>4</v></c></row><row r="3"><c r="A3" t="inlineStr"><is><t>West</t></is></c><c r="B3"><v>6</v></c></row></sheetData></worksheet>"#;

fn write_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("regions.xlsx");
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in [
            ("[Content_Types].xml", TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    fs::write(&path, buf).unwrap();
    path
}

fn entry(book: &Path, chart_type: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "file": book.to_string_lossy(),
        "source_sheet": "Q1 Sales",
        "start_cell": "A1",
        "end_cell": "B3",
        "chart_type": chart_type,
        "title": title,
    })
}

fn write_batch(dir: &Path, entries: &[serde_json::Value]) -> PathBuf {
    let path = dir.join("requests.json");
    fs::write(&path, serde_json::to_vec_pretty(entries).unwrap()).unwrap();
    path
}

/// Every entry runs, in order, against the same workbook
#[test]
fn test_batch_runs_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let book = write_workbook(dir.path());
    let batch = write_batch(
        dir.path(),
        &[
            entry(&book, "doughnut", "Share"),
            entry(&book, "Bubble Chart", "Size"),
        ],
    );

    let reports = Orchestrator::new().run_batch(&batch).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].kind, ChartKind::Doughnut);
    assert_eq!(reports[1].kind, ChartKind::Bubble);
    assert_eq!(reports[0].anchor.to_string(), "A4");
    assert!(reports[1].anchor.row() > reports[0].anchor.row());

    let pkg = autochart::XlsxPackage::open(&book).unwrap();
    let chart = String::from_utf8(pkg.part("xl/charts/chart1.xml").unwrap().to_vec()).unwrap();
    assert!(chart.contains("<c:f>&apos;Q1 Sales&apos;!$B$2:$B$3</c:f>"));
}

/// The first failing entry stops the batch; earlier charts are kept
#[test]
fn test_batch_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let book = write_workbook(dir.path());

    let mut bad = entry(&book, "line", "Broken");
    bad["end_cell"] = serde_json::json!("");
    let batch = write_batch(
        dir.path(),
        &[
            entry(&book, "line", "Good"),
            bad,
            entry(&book, "area", "Never"),
        ],
    );

    let err = Orchestrator::new().run_batch(&batch).unwrap_err();
    assert!(matches!(err, Error::MissingField("start cell and end cell")));

    let pkg = autochart::XlsxPackage::open(&book).unwrap();
    assert!(pkg.has_part("xl/charts/chart1.xml"));
    assert!(!pkg.has_part("xl/charts/chart2.xml"));
}

/// Unreadable and malformed batch files
#[test]
fn test_batch_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let err = Orchestrator::new()
        .run_batch(dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"file\": ").unwrap();
    let err = Orchestrator::new().run_batch(&path).unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let path = dir.path().join("empty.json");
    fs::write(&path, "[]").unwrap();
    assert!(Orchestrator::new().run_batch(&path).unwrap().is_empty());
}
