//! XLSX writer
//!
//! Adds a chart to a sheet of an already loaded package. Every part the
//! chart does not need is left exactly as it was read.

mod chart;
mod drawing;

use autochart_chart::Chart;
use autochart_core::CellAddress;

use crate::content_types::{add_override, CONTENT_TYPES_PART, CT_CHART, CT_DRAWING};
use crate::error::XlsxResult;
use crate::package::XlsxPackage;
use crate::reader::{parse_drawing, SheetEntry, XlsxReader};
use crate::rels::{
    rels_path_for, relative_target, Relationships, OFFICE_REL_NS, REL_CHART, REL_DRAWING,
};
use crate::xml::{child_insertion_point, escape_xml, splice};

use drawing::ChartFrame;

/// Worksheet children that must come after `<drawing>`
const AFTER_DRAWING: &[&[u8]] = &[
    b"legacyDrawing",
    b"legacyDrawingHF",
    b"drawingHF",
    b"picture",
    b"oleObjects",
    b"controls",
    b"webPublishItems",
    b"tableParts",
    b"extLst",
];

/// Where a chart ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInsertion {
    /// Zip entry name of the new chart part
    pub chart_part: String,
    /// Zip entry name of the drawing that holds the chart frame
    pub drawing_part: String,
    /// Top-left cell of the chart
    pub anchor: CellAddress,
}

/// XLSX package writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Add `chart` to `sheet`, anchored at `chart.anchor`
    ///
    /// Reuses the sheet's drawing when it has one, otherwise creates a new
    /// drawing part and links it from the sheet.
    pub fn insert_chart(
        pkg: &mut XlsxPackage,
        sheet: &SheetEntry,
        chart: &Chart,
    ) -> XlsxResult<ChartInsertion> {
        let sheet_xml = pkg.required_part(&sheet.path)?.to_vec();
        let content_types = pkg.required_part(CONTENT_TYPES_PART)?.to_vec();

        // Find or create the drawing
        let existing = XlsxReader::sheet_drawing_part(pkg, sheet)?;
        let (drawing_part, linked) = match existing {
            Some(path) => (path, true),
            None => (pkg.next_part_name("xl/drawings/drawing", ".xml"), false),
        };
        let existing_drawing = pkg.part(&drawing_part).map(|d| d.to_vec());

        let chart_part = pkg.next_part_name("xl/charts/chart", ".xml");

        // drawing -> chart
        let drawing_rels_path = rels_path_for(&drawing_part);
        let mut drawing_rels = Relationships::parse_or_default(pkg.part(&drawing_rels_path))?;
        let chart_rel_id =
            drawing_rels.add(REL_CHART, &relative_target(&drawing_part, &chart_part));

        let object_id = match existing_drawing {
            Some(ref data) => parse_drawing(data)?.max_object_id.max(1) + 1,
            None => 2,
        };
        let frame = ChartFrame {
            anchor: chart.anchor,
            size: chart.size,
            object_id,
            chart_rel_id: &chart_rel_id,
        };

        let drawing_xml = match existing_drawing {
            Some(ref data) => {
                let point = child_insertion_point(data, &[])?;
                splice(data, point.offset, &drawing::anchor_xml(&frame, true))
            }
            None => drawing::drawing_xml(&frame),
        };

        let chart_xml = chart::chart_xml(chart)?;

        // sheet -> drawing
        let sheet_update = if linked {
            None
        } else {
            let sheet_rels_path = rels_path_for(&sheet.path);
            let mut sheet_rels = Relationships::parse_or_default(pkg.part(&sheet_rels_path))?;
            let drawing_rel_id =
                sheet_rels.add(REL_DRAWING, &relative_target(&sheet.path, &drawing_part));

            let point = child_insertion_point(&sheet_xml, AFTER_DRAWING)?;
            let element = format!(
                r#"<{}drawing xmlns:r="{}" r:id="{}"/>"#,
                point.prefix,
                OFFICE_REL_NS,
                escape_xml(&drawing_rel_id)
            );
            Some((
                splice(&sheet_xml, point.offset, &element),
                sheet_rels_path,
                sheet_rels.to_xml(),
            ))
        };

        let content_types = add_override(&content_types, &chart_part, CT_CHART)?;
        let content_types = add_override(&content_types, &drawing_part, CT_DRAWING)?;

        // Nothing has failed; commit every part
        pkg.set_part(chart_part.clone(), chart_xml);
        pkg.set_part(drawing_part.clone(), drawing_xml);
        pkg.set_part(drawing_rels_path, drawing_rels.to_xml());
        if let Some((sheet_xml, sheet_rels_path, sheet_rels)) = sheet_update {
            pkg.set_part(sheet.path.clone(), sheet_xml);
            pkg.set_part(sheet_rels_path, sheet_rels);
        }
        pkg.set_part(CONTENT_TYPES_PART, content_types);

        tracing::debug!(
            sheet = %sheet.name,
            chart = %chart_part,
            drawing = %drawing_part,
            "Inserted {} chart at {}",
            chart.kind,
            chart.anchor
        );

        Ok(ChartInsertion {
            chart_part,
            drawing_part,
            anchor: chart.anchor,
        })
    }
}
