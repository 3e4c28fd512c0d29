//! XLIFF 1.2 translation document: in-memory model plus load/save.
//!
//! Loading goes through `roxmltree` (whole-document parse, no partial results);
//! saving goes through `quick_xml::Writer` and always produces the same bytes
//! for the same model, so an unchanged document never shows up in a diff.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use xlfsync_core::{Loadable, Savable, State, TransUnit, XlfError};

const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "urn:oasis:names:tc:xliff:document:1.2 xliff-core-1.2-transitional.xsd";

pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";
pub const DEFAULT_DATATYPE: &str = "xml";
/// `original` of a freshly created document; replaced on first reconciliation.
pub const PLACEHOLDER_ORIGINAL: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XlfDocument {
    source_language: String,
    target_language: String,
    original: String,
    datatype: String,
    units: Vec<TransUnit>,
    legacy_empty_group: bool,
}

impl XlfDocument {
    /// Minimal valid document for `target_language` with no units.
    pub fn new(target_language: &str) -> Self {
        Self::with_languages(DEFAULT_SOURCE_LANGUAGE, target_language)
    }

    pub fn with_languages(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            original: PLACEHOLDER_ORIGINAL.to_string(),
            datatype: DEFAULT_DATATYPE.to_string(),
            units: Vec::new(),
            legacy_empty_group: false,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, XlfError> {
        let file = File::open(path)?;
        let mut doc = Self::new("");
        doc.load(BufReader::new(file))?;
        Ok(doc)
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn set_original(&mut self, original: &str) {
        self.original = original.to_string();
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn units(&self) -> &[TransUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut Vec<TransUnit> {
        &mut self.units
    }

    pub fn unit(&self, id: &str) -> Option<&TransUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Whether the body still carries the empty `<group>` left by older tooling.
    pub fn has_legacy_empty_group(&self) -> bool {
        self.legacy_empty_group
    }

    /// Drops the legacy empty `<group>`; returns true if there was one.
    pub fn remove_legacy_empty_group(&mut self) -> bool {
        std::mem::take(&mut self.legacy_empty_group)
    }

    pub fn to_xml_string(&self) -> Result<String, XlfError> {
        let mut buf = Vec::new();
        self.save(&mut buf)?;
        String::from_utf8(buf).map_err(|e| XlfError::Structure(e.to_string()))
    }

    /// Write the document next to `path` and rename it into place.
    pub fn save_to_path(&self, path: &Path) -> Result<(), XlfError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.save(BufWriter::new(tmp.as_file_mut()))?;
        tmp.persist(path).map_err(|e| XlfError::Io(e.error))?;
        tracing::debug!(event = "xlf_saved", path = %path.display(), units = self.units.len());
        Ok(())
    }
}

impl FromStr for XlfDocument {
    type Err = XlfError;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        parse_document(xml)
    }
}

impl Loadable for XlfDocument {
    fn load<R: Read>(&mut self, mut reader: R) -> Result<(), XlfError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        *self = parse_document(&text)?;
        Ok(())
    }
}

impl Savable for XlfDocument {
    fn save<W: Write>(&self, writer: W) -> Result<(), XlfError> {
        let mut w = Writer::new_with_indent(writer, b' ', 2);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;

        let mut root = BytesStart::new("xliff");
        root.push_attribute(("xmlns", XLIFF_NS));
        root.push_attribute(("xmlns:xsi", XSI_NS));
        root.push_attribute(("version", "1.2"));
        root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
        w.write_event(Event::Start(root)).map_err(write_err)?;

        let mut file = BytesStart::new("file");
        push_attr(&mut file, "datatype", &self.datatype);
        push_attr(&mut file, "source-language", &self.source_language);
        push_attr(&mut file, "target-language", &self.target_language);
        push_attr(&mut file, "original", &self.original);
        w.write_event(Event::Start(file)).map_err(write_err)?;
        w.write_event(Event::Start(BytesStart::new("body")))
            .map_err(write_err)?;

        if self.legacy_empty_group {
            w.write_event(Event::Empty(BytesStart::new("group")))
                .map_err(write_err)?;
        }
        for unit in &self.units {
            write_unit(&mut w, unit)?;
        }

        w.write_event(Event::End(BytesEnd::new("body")))
            .map_err(write_err)?;
        w.write_event(Event::End(BytesEnd::new("file")))
            .map_err(write_err)?;
        w.write_event(Event::End(BytesEnd::new("xliff")))
            .map_err(write_err)?;

        let mut inner = w.into_inner();
        inner.write_all(b"\n")?;
        inner.flush()?;
        Ok(())
    }
}

fn write_unit<W: Write>(w: &mut Writer<W>, unit: &TransUnit) -> Result<(), XlfError> {
    let mut tu = BytesStart::new("trans-unit");
    push_attr(&mut tu, "id", &unit.id);
    w.write_event(Event::Start(tu)).map_err(write_err)?;

    write_text_element(w, BytesStart::new("source"), &unit.source)?;
    let mut target = BytesStart::new("target");
    push_attr(&mut target, "state", unit.state.as_str());
    write_text_element(w, target, &unit.target)?;
    if unit.note.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("note")))
            .map_err(write_err)?;
    } else {
        write_text_element(w, BytesStart::new("note"), &unit.note)?;
    }

    w.write_event(Event::End(BytesEnd::new("trans-unit")))
        .map_err(write_err)?;
    Ok(())
}

fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), XlfError> {
    let end = start.to_end().into_owned();
    w.write_event(Event::Start(start)).map_err(write_err)?;
    w.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
        .map_err(write_err)?;
    w.write_event(Event::End(end)).map_err(write_err)?;
    Ok(())
}

// Parsers normalize raw CR in text and raw TAB/LF/CR in attribute values,
// so those are written as character references.
fn escape_text(s: &str) -> String {
    partial_escape(s).replace('\r', "&#13;")
}

fn escape_attr(s: &str) -> String {
    escape(s)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

fn push_attr(start: &mut BytesStart<'_>, key: &str, value: &str) {
    let value = escape_attr(value);
    start.push_attribute(Attribute::from((key.as_bytes(), value.as_bytes())));
}

fn write_err(e: impl std::fmt::Display) -> XlfError {
    XlfError::Io(std::io::Error::other(e.to_string()))
}

fn parse_document(xml: &str) -> Result<XlfDocument, XlfError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| XlfError::Parse(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "xliff" {
        return Err(XlfError::Structure(format!(
            "root element is <{}>, expected <xliff>",
            root.tag_name().name()
        )));
    }
    let file = child_element(root, "file")
        .ok_or_else(|| XlfError::Structure("missing <file>".into()))?;
    let body = child_element(file, "body")
        .ok_or_else(|| XlfError::Structure("missing <body>".into()))?;

    let mut out = XlfDocument {
        source_language: file
            .attribute("source-language")
            .unwrap_or(DEFAULT_SOURCE_LANGUAGE)
            .to_string(),
        target_language: required_attr(file, "target-language")?.to_string(),
        original: required_attr(file, "original")?.to_string(),
        datatype: file
            .attribute("datatype")
            .unwrap_or(DEFAULT_DATATYPE)
            .to_string(),
        units: Vec::new(),
        legacy_empty_group: false,
    };

    for child in body.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "trans-unit" => out.units.push(parse_unit(child)?),
            "group" if !child.children().any(|n| n.is_element()) => {
                out.legacy_empty_group = true;
            }
            "group" => {
                return Err(XlfError::Structure(
                    "nested <group> content is not supported".into(),
                ))
            }
            other => {
                return Err(XlfError::Structure(format!(
                    "unexpected <{other}> inside <body>"
                )))
            }
        }
    }

    Ok(out)
}

fn parse_unit(node: roxmltree::Node<'_, '_>) -> Result<TransUnit, XlfError> {
    let id = required_attr(node, "id")?.to_string();
    let source = child_element(node, "source")
        .ok_or_else(|| XlfError::Structure(format!("trans-unit '{id}' has no <source>")))?;
    let target = child_element(node, "target")
        .ok_or_else(|| XlfError::Structure(format!("trans-unit '{id}' has no <target>")))?;
    let state = target.attribute("state").ok_or_else(|| {
        XlfError::Structure(format!("trans-unit '{id}' has a <target> without state"))
    })?;
    let note = child_element(node, "note").map(text_of).unwrap_or_default();

    Ok(TransUnit {
        source: text_of(source),
        target: text_of(target),
        state: State::from(state),
        note,
        id,
    })
}

fn child_element<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn required_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str, XlfError> {
    node.attribute(name).ok_or_else(|| {
        XlfError::Structure(format!(
            "<{}> is missing the '{name}' attribute",
            node.tag_name().name()
        ))
    })
}

fn text_of(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
