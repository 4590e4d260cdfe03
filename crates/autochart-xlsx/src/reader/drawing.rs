//! Drawing part scanning

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use autochart_chart::layout::rows_spanned;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::attr_value;

/// How a drawing object is tied to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    OneCell,
    TwoCell,
    Absolute,
}

/// One anchored object of a drawing part
///
/// Positions are 0-based, as stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingAnchor {
    pub kind: AnchorKind,
    pub from_col: u32,
    pub from_row: u32,
    pub to_row: Option<u32>,
    /// Height from the anchor's own `ext` element
    pub height_emu: Option<i64>,
}

impl DrawingAnchor {
    /// Inclusive 1-based worksheet rows the object covers, if it is tied to cells
    pub fn row_span(&self) -> Option<(u32, u32)> {
        let first = self.from_row.saturating_add(1);
        match self.kind {
            AnchorKind::TwoCell => {
                let last = self.to_row.unwrap_or(self.from_row).saturating_add(1);
                Some((first, last.max(first)))
            }
            AnchorKind::OneCell => {
                let rows = rows_spanned(self.height_emu.unwrap_or(0));
                Some((first, first.saturating_add(rows - 1)))
            }
            AnchorKind::Absolute => None,
        }
    }
}

/// Anchors and object ids found in a drawing part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawingInfo {
    pub anchors: Vec<DrawingAnchor>,
    /// Highest `cNvPr` id in use
    pub max_object_id: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Marker {
    From,
    To,
}

struct OpenAnchor {
    anchor: DrawingAnchor,
    depth: usize,
}

/// Collect the anchors of a drawing part
///
/// Anchors wrapped in `mc:AlternateContent` are picked up from every branch.
pub fn parse_drawing(data: &[u8]) -> XlsxResult<DrawingInfo> {
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut info = DrawingInfo::default();
    let mut buf = Vec::new();
    let mut depth = 0usize;

    let mut open: Option<OpenAnchor> = None;
    let mut marker: Option<Marker> = None;
    let mut field: Option<&'static str> = None;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"oneCellAnchor" | b"twoCellAnchor" | b"absoluteAnchor" => {
                        open = Some(OpenAnchor {
                            anchor: new_anchor(e),
                            depth,
                        });
                    }
                    b"from" if open.is_some() => marker = Some(Marker::From),
                    b"to" if open.is_some() => marker = Some(Marker::To),
                    b"col" if marker.is_some() => field = Some("col"),
                    b"row" if marker.is_some() => field = Some("row"),
                    _ => note_element(e, depth, open.as_mut(), &mut info),
                }
            }
            Ok(Event::Empty(ref e)) => note_element(e, depth + 1, open.as_mut(), &mut info),
            Ok(Event::Text(ref e)) => {
                if let (Some(current), Some(m), Some(f)) = (open.as_mut(), marker, field) {
                    let text = e.unescape()?;
                    let value = text.trim().parse::<u32>().map_err(|_| {
                        XlsxError::Parse(format!("Invalid anchor {} '{}'", f, text))
                    })?;
                    match (m, f) {
                        (Marker::From, "col") => current.anchor.from_col = value,
                        (Marker::From, _) => current.anchor.from_row = value,
                        (Marker::To, "row") => current.anchor.to_row = Some(value),
                        (Marker::To, _) => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                match e.local_name().as_ref() {
                    b"oneCellAnchor" | b"twoCellAnchor" | b"absoluteAnchor" => {
                        if let Some(done) = open.take() {
                            info.anchors.push(done.anchor);
                        }
                        marker = None;
                    }
                    b"from" | b"to" => marker = None,
                    b"col" | b"row" => field = None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

fn new_anchor(e: &BytesStart<'_>) -> DrawingAnchor {
    let kind = match e.local_name().as_ref() {
        b"oneCellAnchor" => AnchorKind::OneCell,
        b"twoCellAnchor" => AnchorKind::TwoCell,
        _ => AnchorKind::Absolute,
    };
    DrawingAnchor {
        kind,
        from_col: 0,
        from_row: 0,
        to_row: None,
        height_emu: None,
    }
}

// `depth` is the depth the element itself sits at.
fn note_element(
    e: &BytesStart<'_>,
    depth: usize,
    open: Option<&mut OpenAnchor>,
    info: &mut DrawingInfo,
) {
    match e.local_name().as_ref() {
        b"cNvPr" => {
            if let Some(id) = attr_value(e, b"id").and_then(|v| v.parse::<u32>().ok()) {
                info.max_object_id = info.max_object_id.max(id);
            }
        }
        b"ext" => {
            if let Some(current) = open {
                if depth == current.depth + 1 {
                    current.anchor.height_emu =
                        attr_value(e, b"cy").and_then(|v| v.parse::<i64>().ok());
                }
            }
        }
        _ => {}
    }
}
