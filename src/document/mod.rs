//! The backing document the configuration tree is materialized into.
//!
//! A [`Document`] is a small arena of elements rooted at a single
//! `<Configuration>` element. Sections map to same-named elements carrying
//! their attributes, options map to `<option name="...">value</option>`
//! elements. Elements are addressed through [`ElementId`] handles, which
//! stay valid for the lifetime of the document, even after the element
//! has been detached from the tree.
//!
//! Reading and writing the textual form lives in [`parse`] and
//! [`serialize`]; the persistence backends live in [`store`].

pub mod parse;
pub mod serialize;
pub mod store;

pub use parse::parse_document;
pub use serialize::serialize_document;
pub use store::{DocumentStore, LoadedDocument, MemoryStore, XmlFileStore};


/// Tag of the root element.
pub const ROOT_TAG: &str = "Configuration";

/// Tag of the elements that hold option values.
pub const OPTION_TAG: &str = "option";

/// Attribute of an option element that holds the option name.
pub const OPTION_NAME_ATTRIBUTE: &str = "name";


/// Whether `character` may appear in an XML 1.0 document, even as a character reference.
pub fn is_xml_char(character: char) -> bool {
    matches!(
        character,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}


/// Handle of an element inside a [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ElementId(usize);


#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attribute_name, _)| attribute_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }
}


/// An in-memory element tree.
#[derive(Clone, Debug)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
}

impl Document {
    /// Creates a document that only contains an empty `<Configuration>` root.
    pub fn empty() -> Self {
        Self::with_root(ROOT_TAG)
    }

    pub(crate) fn with_root<S: Into<String>>(root_tag: S) -> Self {
        Self {
            elements: vec![Element::new(root_tag.into())],
            root: ElementId(0),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// # Panics
    /// Panics if `id` was issued by a different document.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Creates a new, detached element. Use [`Self::append_child`] to attach it.
    pub fn create_element<S: Into<String>>(&mut self, tag: S) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(tag.into()));
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// An element that is already attached somewhere is moved.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);

        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
    }

    /// Removes `id` (and with it, its subtree) from its parent.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.element_mut(id).parent.take() else {
            return;
        };

        self.element_mut(parent)
            .children
            .retain(|child| *child != id);
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }

            match self.element(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Sets an attribute, overwriting any previous value of the same name.
    pub fn set_attribute<N, V>(&mut self, id: ElementId, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();

        let attributes = &mut self.element_mut(id).attributes;
        match attributes
            .iter_mut()
            .find(|(attribute_name, _)| *attribute_name == name)
        {
            Some((_, existing_value)) => *existing_value = value,
            None => attributes.push((name, value)),
        }
    }

    /// Replaces the text content of an element.
    pub fn set_text<S: Into<String>>(&mut self, id: ElementId, text: S) {
        self.element_mut(id).text = Some(text.into());
    }

    /// Child elements of `id` with the given tag, in document order.
    pub fn children_by_tag<'a>(
        &'a self,
        id: ElementId,
        tag: &'a str,
    ) -> impl Iterator<Item = ElementId> + 'a {
        self.element(id)
            .children
            .iter()
            .copied()
            .filter(move |child| self.element(*child).tag == tag)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
