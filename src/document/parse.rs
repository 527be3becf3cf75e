//! XML text to [`Document`].

use thiserror::Error;

use super::{Document, ElementId, OPTION_TAG, ROOT_TAG};


#[derive(Error, Debug)]
pub enum DocumentParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element must be <Configuration>, found <{0}>")]
    UnexpectedRoot(String),
}


/// Parses a configuration document.
///
/// Whitespace-only text between elements is layout and is dropped, except
/// inside option elements, where it is the value.
pub fn parse_document(xml: &str) -> Result<Document, DocumentParseError> {
    let parsed = roxmltree::Document::parse(xml)?;

    let root = parsed.root_element();
    if root.tag_name().name() != ROOT_TAG {
        return Err(DocumentParseError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    let mut document = Document::empty();
    let document_root = document.root();
    copy_children(&mut document, document_root, root);

    Ok(document)
}

fn copy_children(document: &mut Document, target: ElementId, source: roxmltree::Node) {
    for child in source.children().filter(|node| node.is_element()) {
        let element = document.create_element(child.tag_name().name());

        for attribute in child.attributes() {
            document.set_attribute(element, attribute.name(), attribute.value());
        }

        let text = child
            .children()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect::<String>();
        let is_value = child.tag_name().name() == OPTION_TAG && !text.is_empty();
        if is_value || !text.trim().is_empty() {
            document.set_text(element, text);
        }

        document.append_child(target, element);
        copy_children(document, element, child);
    }
}
