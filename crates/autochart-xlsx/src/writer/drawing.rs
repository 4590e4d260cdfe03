//! Drawing part markup for chart frames

use autochart_chart::ChartSize;
use autochart_core::CellAddress;

use crate::rels::OFFICE_REL_NS;

const SPREADSHEET_DRAWING_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const DRAWING_MAIN_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const CHART_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

/// A chart frame to place on a drawing
pub(crate) struct ChartFrame<'a> {
    pub anchor: CellAddress,
    pub size: ChartSize,
    /// `cNvPr` id, unique within the drawing
    pub object_id: u32,
    /// Relationship id from the drawing to the chart part
    pub chart_rel_id: &'a str,
}

/// `oneCellAnchor` element for a chart frame
///
/// With `declare_namespaces` the element carries its own `xdr`, `a` and `r`
/// declarations so it can be spliced into a drawing whatever prefixes that
/// drawing uses.
pub(crate) fn anchor_xml(frame: &ChartFrame<'_>, declare_namespaces: bool) -> String {
    let mut xml = String::new();

    if declare_namespaces {
        xml.push_str(&format!(
            r#"<xdr:oneCellAnchor xmlns:xdr="{}" xmlns:a="{}" xmlns:r="{}">"#,
            SPREADSHEET_DRAWING_NS, DRAWING_MAIN_NS, OFFICE_REL_NS
        ));
    } else {
        xml.push_str("<xdr:oneCellAnchor>");
    }

    // Markers are 0-based
    xml.push_str(&format!(
        "<xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>",
        frame.anchor.col() - 1,
        frame.anchor.row() - 1
    ));
    xml.push_str(&format!(
        r#"<xdr:ext cx="{}" cy="{}"/>"#,
        frame.size.width_emu(),
        frame.size.height_emu()
    ));

    xml.push_str(r#"<xdr:graphicFrame macro="">"#);
    xml.push_str(&format!(
        r#"<xdr:nvGraphicFramePr><xdr:cNvPr id="{}" name="Chart {}"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr>"#,
        frame.object_id,
        frame.object_id.saturating_sub(1).max(1)
    ));
    xml.push_str(r#"<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>"#);
    xml.push_str(&format!(
        r#"<a:graphic><a:graphicData uri="{ns}"><c:chart xmlns:c="{ns}" r:id="{}"/></a:graphicData></a:graphic>"#,
        frame.chart_rel_id,
        ns = CHART_NS
    ));
    xml.push_str("</xdr:graphicFrame>");
    xml.push_str("<xdr:clientData/>");
    xml.push_str("</xdr:oneCellAnchor>");
    xml
}

/// A complete drawing part holding a single chart frame
pub(crate) fn drawing_xml(frame: &ChartFrame<'_>) -> Vec<u8> {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<xdr:wsDr xmlns:xdr="{}" xmlns:a="{}" xmlns:r="{}">"#,
        SPREADSHEET_DRAWING_NS, DRAWING_MAIN_NS, OFFICE_REL_NS
    ));
    xml.push_str(&anchor_xml(frame, false));
    xml.push_str("</xdr:wsDr>");
    xml.into_bytes()
}
