//! [`Document`] to canonical, pretty-printed XML text.
//!
//! Every element occupies its own line, indented by two spaces per level.
//! Elements that carry only text (options) stay on a single line. Line breaks
//! inside values are written as character references, so the layout never
//! depends on the data.

use std::borrow::Cow;

use quick_xml::{
    escape::{escape, partial_escape},
    events::{attributes::Attribute, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    name::QName,
    Writer,
};
use thiserror::Error;

use super::{Document, ElementId};


const INDENT_SIZE: usize = 2;


#[derive(Error, Debug)]
#[error("failed to write XML: {0}")]
pub struct SerializeError(String);


/// Serializes the attached part of `document`, starting at its root.
pub fn serialize_document(document: &Document) -> Result<String, SerializeError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", None, None)))?;
    write_element(document, document.root(), &mut writer)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|error| SerializeError(error.to_string()))?;
    xml.push('\n');

    Ok(xml)
}

fn write_element(
    document: &Document,
    id: ElementId,
    writer: &mut Writer<Vec<u8>>,
) -> Result<(), SerializeError> {
    let element = document.element(id);

    let mut start = BytesStart::new(element.tag());
    for (name, value) in element.attributes() {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.text().is_none() && element.children().is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;

    if let Some(text) = element.text() {
        write_event(writer, Event::Text(BytesText::from_escaped(escape_text(text))))?;
    }

    for child in element.children() {
        write_element(document, *child, writer)?;
    }

    write_event(writer, Event::End(BytesEnd::new(element.tag())))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SerializeError> {
    writer
        .write_event(event)
        .map_err(|error| SerializeError(error.to_string()))
}

/// Markup characters plus the line breaks a parser would otherwise normalize away.
fn escape_text(text: &str) -> String {
    partial_escape(text)
        .replace('\r', "&#xD;")
        .replace('\n', "&#xA;")
}

fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\r', "&#xD;")
        .replace('\n', "&#xA;")
        .replace('\t', "&#x9;")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    #[test]
    fn empty_document_is_a_self_closed_root() {
        assert_eq!(
            serialize_document(&Document::empty()).unwrap(),
            "<?xml version=\"1.0\"?>\n<Configuration/>\n"
        );
    }

    #[test]
    fn nested_layout() {
        let mut document = Document::empty();
        let root = document.root();

        let binaries = document.create_element("Binaries");
        let binary = document.create_element("Binary");
        let option = document.create_element("option");
        let empty = document.create_element("Empty");

        document.set_attribute(binary, "name", "someBinary");
        document.set_attribute(option, "name", "debug");
        document.set_text(option, "true");

        document.append_child(root, binaries);
        document.append_child(binaries, binary);
        document.append_child(binary, option);
        document.append_child(root, empty);

        let expected = concat!(
            "<?xml version=\"1.0\"?>\n",
            "<Configuration>\n",
            "  <Binaries>\n",
            "    <Binary name=\"someBinary\">\n",
            "      <option name=\"debug\">true</option>\n",
            "    </Binary>\n",
            "  </Binaries>\n",
            "  <Empty/>\n",
            "</Configuration>\n",
        );
        assert_eq!(serialize_document(&document).unwrap(), expected);
    }

    #[test]
    fn detached_elements_are_skipped() {
        let mut document = Document::empty();
        let root = document.root();

        let kept = document.create_element("Kept");
        let dropped = document.create_element("Dropped");
        document.append_child(root, kept);
        document.append_child(root, dropped);
        document.detach(dropped);

        let xml = serialize_document(&document).unwrap();
        assert!(xml.contains("<Kept/>"));
        assert!(!xml.contains("Dropped"));
    }

    #[test]
    fn special_characters_survive_a_reparse() {
        let mut document = Document::empty();
        let root = document.root();

        let section = document.create_element("Paths");
        let option = document.create_element("option");
        document.set_attribute(section, "label", "say \"hi\" & <leave>");
        document.set_attribute(option, "name", "script");
        document.set_text(option, "line one\nline <two> & 'three'");
        document.append_child(root, section);
        document.append_child(section, option);

        let xml = serialize_document(&document).unwrap();
        assert_eq!(xml.lines().count(), 6);

        let reparsed = parse_document(&xml).unwrap();
        let section = reparsed.element(reparsed.root()).children()[0];
        let option = reparsed.element(section).children()[0];

        assert_eq!(
            reparsed.element(section).attribute("label"),
            Some("say \"hi\" & <leave>")
        );
        assert_eq!(
            reparsed.element(option).text(),
            Some("line one\nline <two> & 'three'")
        );
    }
}
