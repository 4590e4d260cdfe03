//! Worksheet cell scanning

use std::fmt;

use quick_xml::events::Event;
use quick_xml::Reader;

use autochart_core::CellAddress;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, decode_excel_escapes};

/// The value a cell holds, as stored in the file
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellContent {
    /// Numeric value, if the cell holds a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellContent::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellContent::Text(s) => f.write_str(s),
            CellContent::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellContent::Error(e) => f.write_str(e),
        }
    }
}

/// One `<c>` element of a worksheet
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScannedCell {
    pub address: CellAddress,
    pub content: Option<CellContent>,
    pub has_formula: bool,
}

impl ScannedCell {
    /// Whether the cell holds anything a reader would see as a value
    pub fn is_populated(&self) -> bool {
        self.content.is_some() || self.has_formula
    }
}

struct CellState {
    address: CellAddress,
    cell_type: Option<String>,
    value: Option<String>,
    inline: Option<String>,
    has_formula: bool,
}

/// Walk every cell of a worksheet part in document order
///
/// Cells without an `r` attribute take the position after the previous cell
/// of their row; rows without one follow the previous row.
pub(crate) fn scan_cells<F>(data: &[u8], shared_strings: &[String], mut visit: F) -> XlsxResult<()>
where
    F: FnMut(ScannedCell),
{
    let mut xml = Reader::from_reader(data);
    xml.trim_text(true);

    let mut buf = Vec::new();
    let mut row: u32 = 0;
    let mut col: u16 = 0;

    let mut cell: Option<CellState> = None;
    let mut in_value = false;
    let mut in_inline_str = false;
    let mut in_inline_text = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = next_row(attr_value(e, b"r").as_deref(), row);
                    col = 0;
                }
                b"c" => {
                    let state = start_cell(e, &mut row, &mut col)?;
                    cell = Some(state);
                }
                b"v" if cell.is_some() => in_value = true,
                b"f" => {
                    if let Some(state) = cell.as_mut() {
                        state.has_formula = true;
                    }
                }
                b"is" => {
                    if let Some(state) = cell.as_mut() {
                        in_inline_str = true;
                        state.inline.get_or_insert_with(String::new);
                    }
                }
                b"t" if in_inline_str => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = next_row(attr_value(e, b"r").as_deref(), row);
                    col = 0;
                }
                b"c" => {
                    let state = start_cell(e, &mut row, &mut col)?;
                    visit(finish_cell(state, shared_strings)?);
                }
                b"f" => {
                    if let Some(state) = cell.as_mut() {
                        state.has_formula = true;
                    }
                }
                b"v" => {
                    if let Some(state) = cell.as_mut() {
                        state.value.get_or_insert_with(String::new);
                    }
                }
                b"is" => {
                    if let Some(state) = cell.as_mut() {
                        state.inline.get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if let Some(state) = cell.as_mut() {
                    if in_value {
                        let text = e.unescape()?;
                        state
                            .value
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    } else if in_inline_text {
                        let text = e.unescape()?;
                        state
                            .inline
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(state) = cell.take() {
                        visit(finish_cell(state, shared_strings)?);
                    }
                    in_value = false;
                    in_inline_str = false;
                    in_inline_text = false;
                }
                b"v" => {
                    if in_value {
                        if let Some(state) = cell.as_mut() {
                            state.value.get_or_insert_with(String::new);
                        }
                    }
                    in_value = false;
                }
                b"is" => in_inline_str = false,
                b"t" => in_inline_text = false,
                b"sheetData" => break,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn next_row(r: Option<&str>, previous: u32) -> u32 {
    match r.map(|r| (r, r.parse::<u32>())) {
        Some((_, Ok(row))) => row,
        Some((r, Err(_))) => {
            tracing::warn!("Ignoring unparsable row number '{}'", r);
            previous.saturating_add(1)
        }
        None => previous.saturating_add(1),
    }
}

fn start_cell(
    e: &quick_xml::events::BytesStart<'_>,
    row: &mut u32,
    col: &mut u16,
) -> XlsxResult<CellState> {
    let address = match attr_value(e, b"r") {
        Some(r) => {
            let addr = CellAddress::parse(&r).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", r, err))
            })?;
            *row = addr.row();
            addr
        }
        None => CellAddress::new(col.saturating_add(1), (*row).max(1))?,
    };
    *col = address.col();

    Ok(CellState {
        address,
        cell_type: attr_value(e, b"t"),
        value: None,
        inline: None,
        has_formula: false,
    })
}

fn finish_cell(state: CellState, shared_strings: &[String]) -> XlsxResult<ScannedCell> {
    let content = match (state.cell_type.as_deref(), state.value, state.inline) {
        (Some("inlineStr"), _, Some(text)) => Some(CellContent::Text(decode_excel_escapes(&text))),
        (_, None, Some(text)) => Some(CellContent::Text(decode_excel_escapes(&text))),
        (_, None, None) => None,

        // Shared string
        (Some("s"), Some(v), _) => {
            let idx: usize = v.trim().parse().map_err(|_| {
                XlsxError::Parse(format!("Invalid shared string index: {}", v))
            })?;
            let s = shared_strings.get(idx).ok_or_else(|| {
                XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
            })?;
            Some(CellContent::Text(s.clone()))
        }

        // Boolean
        (Some("b"), Some(v), _) => Some(CellContent::Bool(
            v == "1" || v.eq_ignore_ascii_case("true"),
        )),

        // Error
        (Some("e"), Some(v), _) => Some(CellContent::Error(v)),

        // String (explicit type) - decode Excel escape sequences
        (Some("str"), Some(v), _) | (Some("inlineStr"), Some(v), _) => {
            Some(CellContent::Text(decode_excel_escapes(&v)))
        }

        // Number (default type or explicit "n"); an empty <v/> holds nothing
        (None, Some(v), _) | (Some("n"), Some(v), _) => {
            let v = v.trim();
            if v.is_empty() {
                None
            } else {
                Some(match v.parse::<f64>() {
                    Ok(n) => CellContent::Number(n),
                    Err(_) => CellContent::Text(v.to_string()),
                })
            }
        }

        // Unknown type - treat as string
        (Some(_), Some(v), _) => Some(CellContent::Text(v)),
    };

    Ok(ScannedCell {
        address: state.address,
        content,
        has_formula: state.has_formula,
    })
}
