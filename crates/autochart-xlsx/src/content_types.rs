//! `[Content_Types].xml` maintenance

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, child_insertion_point, escape_xml, splice};

/// Zip entry name of the content types part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

pub const CT_CHART: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
pub const CT_DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";

/// Whether an `Override` for `part_name` (zip entry name, no leading slash)
/// is already declared
pub fn has_override(xml: &[u8], part_name: &str) -> XlsxResult<bool> {
    let wanted = format!("/{}", part_name);
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Override" =>
            {
                if attr_value(e, b"PartName").as_deref() == Some(wanted.as_str()) {
                    return Ok(true);
                }
            }
            Ok(Event::Eof) => return Ok(false),
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Declare the content type of a part, leaving the document untouched if it
/// already has an override for it
pub fn add_override(xml: &[u8], part_name: &str, content_type: &str) -> XlsxResult<Vec<u8>> {
    if has_override(xml, part_name)? {
        return Ok(xml.to_vec());
    }

    let point = child_insertion_point(xml, &[])?;
    let markup = format!(
        "<{}Override PartName=\"/{}\" ContentType=\"{}\"/>",
        point.prefix,
        escape_xml(part_name),
        escape_xml(content_type)
    );
    Ok(splice(xml, point.offset, &markup))
}
