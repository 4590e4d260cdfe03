//! XLSX reader
//!
//! Reads just enough of a package to plan a chart: the sheet list, cell
//! values inside a block, and what already sits in column A.

mod drawing;
mod sheet;

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use autochart_chart::ColumnOccupancy;
use autochart_core::{CellAddress, CellRange};

use crate::error::{XlsxError, XlsxResult};
use crate::package::XlsxPackage;
use crate::rels::{
    rels_path_for, resolve_target, Relationships, REL_DRAWING, REL_OFFICE_DOCUMENT,
    REL_SHARED_STRINGS, REL_WORKSHEET,
};
use crate::xml::{attr_value, decode_excel_escapes};

pub use drawing::{parse_drawing, AnchorKind, DrawingAnchor, DrawingInfo};
pub use sheet::CellContent;

const DEFAULT_WORKBOOK_PART: &str = "xl/workbook.xml";

/// A worksheet listed in the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// Sheet tab name
    pub name: String,
    /// Zip entry name of the worksheet part
    pub path: String,
    /// Position in the workbook's sheet list
    pub index: usize,
}

/// Cell values keyed by address
pub type CellGrid = HashMap<CellAddress, CellContent>;

/// XLSX package reader
pub struct XlsxReader;

impl XlsxReader {
    /// Zip entry name of the workbook part
    pub fn workbook_path(pkg: &XlsxPackage) -> XlsxResult<String> {
        let rels = Relationships::parse_or_default(pkg.part("_rels/.rels"))?;
        Ok(rels
            .find_by_type(REL_OFFICE_DOCUMENT)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PART.to_string()))
    }

    /// Worksheets in workbook order
    ///
    /// Chartsheets and dialog sheets are not listed.
    pub fn sheets(pkg: &XlsxPackage) -> XlsxResult<Vec<SheetEntry>> {
        let workbook = Self::workbook_path(pkg)?;
        let data = pkg.required_part(&workbook)?;
        let rels = Relationships::parse_or_default(pkg.part(&rels_path_for(&workbook)))?;

        let mut xml = Reader::from_reader(data);
        xml.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    if let (Some(name), Some(r_id)) = (attr_value(e, b"name"), attr_value(e, b"id"))
                    {
                        match rels.get(&r_id) {
                            Some(rel) if rel.rel_type == REL_WORKSHEET => {
                                sheets.push(SheetEntry {
                                    name,
                                    path: resolve_target(&workbook, &rel.target),
                                    index: sheets.len(),
                                });
                            }
                            Some(_) => tracing::debug!("Skipping non-worksheet sheet {name}"),
                            None => {
                                return Err(XlsxError::Parse(format!(
                                    "Sheet '{}' refers to unknown relationship {}",
                                    name, r_id
                                )))
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Names of all worksheets, in workbook order
    pub fn sheet_names(pkg: &XlsxPackage) -> XlsxResult<Vec<String>> {
        Ok(Self::sheets(pkg)?.into_iter().map(|s| s.name).collect())
    }

    /// Look up a worksheet by its exact name
    pub fn sheet_by_name(pkg: &XlsxPackage, name: &str) -> XlsxResult<Option<SheetEntry>> {
        Ok(Self::sheets(pkg)?.into_iter().find(|s| s.name == name))
    }

    /// Read the shared strings table
    pub fn shared_strings(pkg: &XlsxPackage) -> XlsxResult<Vec<String>> {
        let workbook = Self::workbook_path(pkg)?;
        let rels = Relationships::parse_or_default(pkg.part(&rels_path_for(&workbook)))?;
        let path = rels
            .find_by_type(REL_SHARED_STRINGS)
            .map(|rel| resolve_target(&workbook, &rel.target))
            .unwrap_or_else(|| "xl/sharedStrings.xml".to_string());

        let mut strings = Vec::new();

        let data = match pkg.part(&path) {
            Some(d) => d,
            None => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(data);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        // Decode Excel's _xHHHH_ escape sequences
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read the values of every populated cell inside `range`
    ///
    /// Rows are taken from the upper to the lower of the two ends, whichever
    /// order they were given in.
    pub fn read_cells(
        pkg: &XlsxPackage,
        sheet: &SheetEntry,
        range: &CellRange,
    ) -> XlsxResult<CellGrid> {
        let data = pkg.required_part(&sheet.path)?;
        let shared = Self::shared_strings(pkg)?;

        let (start, end) = (range.start(), range.end());
        let cols = start.col()..=end.col();
        let rows = start.row().min(end.row())..=start.row().max(end.row());

        let mut grid = CellGrid::new();
        sheet::scan_cells(data, &shared, |cell| {
            let addr = cell.address;
            if cols.contains(&addr.col()) && rows.contains(&addr.row()) {
                if let Some(content) = cell.content {
                    grid.insert(addr, content);
                }
            }
        })?;

        tracing::debug!(sheet = %sheet.name, cells = grid.len(), "Read {}", range);
        Ok(grid)
    }

    /// Rows of column A that hold a value or sit under an object anchored in
    /// column A
    pub fn column_a_occupancy(
        pkg: &XlsxPackage,
        sheet: &SheetEntry,
    ) -> XlsxResult<ColumnOccupancy> {
        let data = pkg.required_part(&sheet.path)?;
        let shared = Self::shared_strings(pkg)?;

        let mut occupancy = ColumnOccupancy::new();
        sheet::scan_cells(data, &shared, |cell| {
            if cell.address.col() == 1 && cell.is_populated() {
                occupancy.mark_row(cell.address.row());
            }
        })?;

        if let Some(drawing_path) = Self::sheet_drawing_part(pkg, sheet)? {
            if let Some(drawing) = pkg.part(&drawing_path) {
                for anchor in parse_drawing(drawing)?.anchors {
                    if anchor.from_col != 0 {
                        continue;
                    }
                    if let Some((first, last)) = anchor.row_span() {
                        occupancy.mark_span(first, last);
                    }
                }
            }
        }

        Ok(occupancy)
    }

    /// Relationship id of the sheet's `<drawing>` element, if it has one
    pub fn sheet_drawing_rel_id(sheet_xml: &[u8]) -> XlsxResult<Option<String>> {
        let mut xml = Reader::from_reader(sheet_xml);
        xml.trim_text(true);
        let mut buf = Vec::new();
        let mut depth = 0usize;

        loop {
            match xml.read_event_into(&mut buf) {
                Ok(Event::Start(ref e) | Event::Empty(ref e))
                    if depth == 1 && e.local_name().as_ref() == b"drawing" =>
                {
                    return Ok(attr_value(e, b"id"));
                }
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => return Ok(None),
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Zip entry name of the drawing part attached to a sheet, if any
    pub fn sheet_drawing_part(
        pkg: &XlsxPackage,
        sheet: &SheetEntry,
    ) -> XlsxResult<Option<String>> {
        let data = pkg.required_part(&sheet.path)?;
        let Some(r_id) = Self::sheet_drawing_rel_id(data)? else {
            return Ok(None);
        };

        let rels = Relationships::parse_or_default(pkg.part(&rels_path_for(&sheet.path)))?;
        match rels.get(&r_id) {
            Some(rel) if rel.rel_type == REL_DRAWING => {
                Ok(Some(resolve_target(&sheet.path, &rel.target)))
            }
            _ => Err(XlsxError::Parse(format!(
                "Drawing of '{}' refers to unknown relationship {}",
                sheet.name, r_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn build_package(files: &[(&str, &str)]) -> XlsxPackage {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, body) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        XlsxPackage::read(Cursor::new(buf)).unwrap()
    }

    const TYPES: &str = r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
    const ROOT_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    const WORKBOOK: &str = r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/><sheet name="Q1 &amp; Q2" sheetId="2" r:id="rId2"/></sheets></workbook>"#;
    const WORKBOOK_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;
    const SHARED: &str = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Month</t></si><si><r><t>Sa</t></r><r><t>les</t></r><rPh><t>x</t></rPh></si><si/><si><t>Jan</t></si></sst>"#;
    const SHEET1: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row><row r="2"><c r="A2" t="s"><v>3</v></c><c r="B2"><v>10</v></c></row><row r="3"><c r="A3" s="2"/><c r="B3"><v>12</v></c></row></sheetData></worksheet>"#;
    const SHEET2: &str = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData><drawing r:id="rId4"/></worksheet>"#;
    const SHEET2_RELS: &str = r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/></Relationships>"#;
    const DRAWING1: &str = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing"><xdr:oneCellAnchor><xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:ext cx="100" cy="381000"/><xdr:clientData/></xdr:oneCellAnchor></xdr:wsDr>"#;

    fn sample() -> XlsxPackage {
        build_package(&[
            ("[Content_Types].xml", TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET2),
            ("xl/worksheets/_rels/sheet2.xml.rels", SHEET2_RELS),
            ("xl/drawings/drawing1.xml", DRAWING1),
        ])
    }

    #[test]
    fn test_sheets() {
        let pkg = sample();
        let sheets = XlsxReader::sheets(&pkg).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].path, "xl/worksheets/sheet1.xml");
        assert_eq!(sheets[1].name, "Q1 & Q2");
        assert_eq!(sheets[1].path, "xl/worksheets/sheet2.xml");
        assert_eq!(sheets[1].index, 1);

        assert!(XlsxReader::sheet_by_name(&pkg, "data").unwrap().is_none());
        assert!(XlsxReader::sheet_by_name(&pkg, "Data").unwrap().is_some());
    }

    #[test]
    fn test_shared_strings_skip_phonetic_runs() {
        let strings = XlsxReader::shared_strings(&sample()).unwrap();
        assert_eq!(strings, vec!["Month", "Sales", "", "Jan"]);
    }

    #[test]
    fn test_read_cells_in_range() {
        let pkg = sample();
        let sheet = XlsxReader::sheet_by_name(&pkg, "Data").unwrap().unwrap();
        let range = CellRange::parse("A1", "B2").unwrap();
        let grid = XlsxReader::read_cells(&pkg, &sheet, &range).unwrap();

        assert_eq!(grid.len(), 4);
        let b1 = CellAddress::parse("B1").unwrap();
        assert_eq!(grid[&b1], CellContent::Text("Sales".into()));
        let b2 = CellAddress::parse("B2").unwrap();
        assert_eq!(grid[&b2], CellContent::Number(10.0));
    }

    #[test]
    fn test_column_a_occupancy_from_values() {
        let pkg = sample();
        let sheet = XlsxReader::sheet_by_name(&pkg, "Data").unwrap().unwrap();
        let occ = XlsxReader::column_a_occupancy(&pkg, &sheet).unwrap();
        // A3 carries only a style
        assert_eq!(occ.first_free_row(), 3);
    }

    #[test]
    fn test_column_a_occupancy_includes_drawings() {
        let pkg = sample();
        let sheet = XlsxReader::sheet_by_name(&pkg, "Q1 & Q2").unwrap().unwrap();
        assert_eq!(
            XlsxReader::sheet_drawing_part(&pkg, &sheet).unwrap().as_deref(),
            Some("xl/drawings/drawing1.xml")
        );

        // A1 holds a value, the drawing covers rows 2 and 3
        let occ = XlsxReader::column_a_occupancy(&pkg, &sheet).unwrap();
        assert_eq!(occ.first_free_row(), 4);
    }

    #[test]
    fn test_drawing_rel_id_tag_forms() {
        let ns = r#"xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;
        let empty = format!(r#"<worksheet {ns}><sheetData/><drawing r:id="rId3"/></worksheet>"#);
        let paired = format!(r#"<worksheet {ns}><sheetData/><drawing r:id="rId7"></drawing></worksheet>"#);
        let nested = format!(r#"<worksheet {ns}><extLst><ext><drawing r:id="rId9"/></ext></extLst></worksheet>"#);

        assert_eq!(
            XlsxReader::sheet_drawing_rel_id(empty.as_bytes()).unwrap().as_deref(),
            Some("rId3")
        );
        assert_eq!(
            XlsxReader::sheet_drawing_rel_id(paired.as_bytes()).unwrap().as_deref(),
            Some("rId7")
        );
        assert_eq!(XlsxReader::sheet_drawing_rel_id(nested.as_bytes()).unwrap(), None);
    }

    #[test]
    fn test_missing_workbook_part() {
        let pkg = build_package(&[("[Content_Types].xml", TYPES)]);
        let err = XlsxReader::sheets(&pkg).unwrap_err();
        assert!(matches!(err, XlsxError::MissingPart(_)));
    }
}
