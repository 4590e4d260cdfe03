//! Package relationships (`_rels/*.rels` parts)

use std::io::BufReader;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr_value, escape_xml};

const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
pub const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
pub const REL_CHART: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";

/// Namespace of `r:` attributes in workbook, sheet and drawing parts
pub const OFFICE_REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A single relationship entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `External` for links outside the package
    pub target_mode: Option<String>,
}

/// The relationships of one part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part
    pub fn parse(data: &[u8]) -> XlsxResult<Self> {
        let mut xml = Reader::from_reader(BufReader::new(data));
        xml.trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            match xml.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(e, b"Id");
                    let rel_type = attr_value(e, b"Type");
                    let target = attr_value(e, b"Target");
                    match (id, rel_type, target) {
                        (Some(id), Some(rel_type), Some(target)) => entries.push(Relationship {
                            id,
                            rel_type,
                            target,
                            target_mode: attr_value(e, b"TargetMode"),
                        }),
                        _ => {
                            return Err(XlsxError::Parse(
                                "Relationship is missing Id, Type or Target".into(),
                            ))
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { entries })
    }

    /// Parse a `.rels` part if present, or start an empty set
    pub fn parse_or_default(data: Option<&[u8]>) -> XlsxResult<Self> {
        match data {
            Some(data) => Self::parse(data),
            None => Ok(Self::new()),
        }
    }

    /// All entries, in document order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Look up a relationship by id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// First relationship of the given type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Add an internal relationship and return its new id (`rIdN`)
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = (1u32..)
            .map(|n| format!("rId{}", n))
            .find(|id| self.get(id).is_none())
            .unwrap_or_else(|| format!("rId{}", self.entries.len() + 1));

        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: None,
        });
        id
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> Vec<u8> {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.push_str(&format!("<Relationships xmlns=\"{}\">", RELS_NS));
        for rel in &self.entries {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"",
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(" TargetMode=\"{}\"", escape_xml(mode)));
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml.into_bytes()
    }
}

/// Path of the `.rels` part that belongs to `part`
///
/// `xl/worksheets/sheet1.xml` has its relationships in
/// `xl/worksheets/_rels/sheet1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns it
///
/// Targets starting with `/` are package-absolute; anything else is relative
/// to the owning part's directory. The result has no leading slash, matching
/// zip entry names.
pub fn resolve_target(base_part: &str, target: &str) -> String {
    if let Some(abs) = target.strip_prefix('/') {
        return normalize(abs.split('/'));
    }
    let mut segments: Vec<&str> = match base_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    segments.extend(target.split('/'));
    normalize(segments.into_iter())
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out.join("/")
}

/// Relative target from one part to another, as written in `.rels` parts
///
/// `relative_target("xl/drawings/drawing1.xml", "xl/charts/chart1.xml")`
/// is `../charts/chart1.xml`.
pub fn relative_target(from_part: &str, to_part: &str) -> String {
    let from_dir: Vec<&str> = match from_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to: Vec<&str> = to_part.split('/').collect();

    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat("..")
        .take(from_dir.len() - common)
        .collect();
    parts.extend(&to[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_and_lookup() {
        let rels = Relationships::parse(WORKBOOK_RELS.as_bytes()).unwrap();
        assert_eq!(rels.iter().count(), 3);
        assert_eq!(rels.get("rId1").unwrap().target, "worksheets/sheet1.xml");

        let link = rels.get("rId9").unwrap();
        assert_eq!(link.target_mode.as_deref(), Some("External"));
        assert_eq!(link.target, "https://example.com/?a=1&b=2");

        assert_eq!(
            rels.find_by_type(REL_WORKSHEET).unwrap().id,
            "rId2"
        );
    }

    #[test]
    fn test_add_picks_free_id() {
        let mut rels = Relationships::parse(WORKBOOK_RELS.as_bytes()).unwrap();
        assert_eq!(rels.add(REL_DRAWING, "../drawings/drawing1.xml"), "rId3");
        assert_eq!(rels.add(REL_CHART, "../charts/chart1.xml"), "rId4");
    }

    #[test]
    fn test_to_xml_reparses() {
        let mut rels = Relationships::new();
        rels.add(REL_CHART, "../charts/chart1.xml");
        let xml = rels.to_xml();

        let again = Relationships::parse(&xml).unwrap();
        assert_eq!(again, rels);
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("xl/worksheets/sheet1.xml"),
            "xl/worksheets/_rels/sheet1.xml.rels"
        );
        assert_eq!(rels_path_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "../drawings/drawing1.xml"),
            "xl/drawings/drawing1.xml"
        );
        assert_eq!(
            resolve_target("xl/workbook.xml", "/xl/worksheets/sheet3.xml"),
            "xl/worksheets/sheet3.xml"
        );
        assert_eq!(resolve_target("", "xl/workbook.xml"), "xl/workbook.xml");
        assert_eq!(
            resolve_target("xl/workbook.xml", "./sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("xl/drawings/drawing1.xml", "xl/charts/chart1.xml"),
            "../charts/chart1.xml"
        );
        assert_eq!(
            relative_target("xl/worksheets/sheet1.xml", "xl/drawings/drawing2.xml"),
            "../drawings/drawing2.xml"
        );
        assert_eq!(
            relative_target("xl/workbook.xml", "xl/worksheets/sheet1.xml"),
            "worksheets/sheet1.xml"
        );
    }
}
