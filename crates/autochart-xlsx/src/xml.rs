//! Small XML helpers shared by the reader and writer

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{XlsxError, XlsxResult};

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Value of the attribute whose local name is `name`, ignoring any prefix
pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Value of the attribute whose full (possibly prefixed) name is `name`
pub(crate) fn attr_exact(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Namespace prefix of an element name including the colon (`"x:"`), or `""`
pub(crate) fn prefix_of(e: &BytesStart<'_>) -> String {
    let name = e.name();
    match name.prefix() {
        Some(prefix) => format!("{}:", String::from_utf8_lossy(prefix.as_ref())),
        None => String::new(),
    }
}

/// Where a new child element can be spliced into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    /// Byte offset of the `<` the new markup goes in front of
    pub offset: usize,
    /// Namespace prefix of the root element (`"x:"` or `""`)
    pub prefix: String,
}

/// Find the offset in front of the first child of the root element whose
/// local name is in `before`, or in front of the root's closing tag
///
/// Only direct children of the root are considered. A self-closing root has
/// no place to splice into and is reported as a parse error.
pub(crate) fn child_insertion_point(data: &[u8], before: &[&[u8]]) -> XlsxResult<InsertionPoint> {
    let mut xml = Reader::from_reader(data);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut prefix = String::new();

    loop {
        let pos = xml.buffer_position();
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local = e.local_name();
                if depth == 0 {
                    prefix = prefix_of(e);
                } else if depth == 1 && before.contains(&local.as_ref()) {
                    return Ok(InsertionPoint {
                        offset: tag_start(data, pos),
                        prefix,
                    });
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                let local = e.local_name();
                if depth == 0 {
                    return Err(XlsxError::Parse(format!(
                        "<{}/> has no body to insert into",
                        String::from_utf8_lossy(local.as_ref())
                    )));
                }
                if depth == 1 && before.contains(&local.as_ref()) {
                    return Ok(InsertionPoint {
                        offset: tag_start(data, pos),
                        prefix,
                    });
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(InsertionPoint {
                        offset: tag_start(data, pos),
                        prefix,
                    });
                }
            }
            Ok(Event::Eof) => {
                return Err(XlsxError::Parse("Document has no root element".into()))
            }
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Splice `markup` into `data` at `offset`
pub(crate) fn splice(data: &[u8], offset: usize, markup: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + markup.len());
    out.extend_from_slice(&data[..offset]);
    out.extend_from_slice(markup.as_bytes());
    out.extend_from_slice(&data[offset..]);
    out
}

// After a text event the reader has already consumed the next `<`.
fn tag_start(data: &[u8], pos: usize) -> usize {
    if data.get(pos) == Some(&b'<') {
        return pos;
    }
    data[..pos.min(data.len())]
        .iter()
        .rposition(|&b| b == b'<')
        .unwrap_or(pos)
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' || chars.peek() != Some(&'x') {
            result.push(c);
            continue;
        }
        chars.next(); // consume 'x'

        let mut hex_chars = String::new();
        while hex_chars.len() < 4 {
            match chars.peek() {
                Some(&ch) if ch.is_ascii_hexdigit() => {
                    hex_chars.push(ch);
                    chars.next();
                }
                _ => break,
            }
        }

        let decoded = if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
            u32::from_str_radix(&hex_chars, 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(ch) => {
                chars.next(); // consume closing '_'
                result.push(ch);
            }
            None => {
                // Not a valid escape sequence, output what we consumed
                result.push_str("_x");
                result.push_str(&hex_chars);
            }
        }
    }

    result
}
