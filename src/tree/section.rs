use std::fmt::{self, Debug, Display, Formatter};

use super::{attribute, Attribute, ConfigOption, Configurator, SectionSelector};
use crate::document::ElementId;


/// Handle of a section inside the [`Configurator`] that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SectionId(pub(crate) usize);


/// Whether a section currently has an element in the backing document.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Materialization {
    Unmaterialized,
    Materialized(ElementId),
}


/// Arena storage of a section. Sections own their options and (through
/// their ids) their subsections; the parent link is a plain id.
#[derive(Debug)]
pub(crate) struct SectionNode {
    pub name: String,
    pub parent: Option<SectionId>,
    pub options: Vec<ConfigOption>,
    pub sub_sections: Vec<SectionId>,
    pub attributes: Vec<Attribute>,
    pub state: Materialization,
}

impl SectionNode {
    pub fn new(name: String, parent: Option<SectionId>, attributes: Vec<Attribute>) -> Self {
        Self {
            name,
            parent,
            options: Vec::new(),
            sub_sections: Vec::new(),
            attributes,
            state: Materialization::Unmaterialized,
        }
    }

    pub fn matches(&self, selector: &SectionSelector) -> bool {
        selector.matches(&self.name, &self.attributes)
    }

    /// First option with this name, in insertion order.
    pub fn option(&self, name: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|option| option.name() == name)
    }

    pub fn option_index(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|option| option.name() == name)
    }

    /// Adds `attribute`, replacing one of the same name.
    pub fn put_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.name() == attribute.name())
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }
}


/// Read-only view of a section.
///
/// Obtained from [`Configurator::section`]; mutations go through the
/// [`Configurator`] so they can be written through to the backing store.
#[derive(Clone, Copy)]
pub struct Section<'a> {
    configurator: &'a Configurator,
    id: SectionId,
    node: &'a SectionNode,
}

impl<'a> Section<'a> {
    pub(crate) fn new(configurator: &'a Configurator, id: SectionId, node: &'a SectionNode) -> Self {
        Self {
            configurator,
            id,
            node,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn configurator(&self) -> &'a Configurator {
        self.configurator
    }

    /// Names from the top-level section down to this one, joined with `.`.
    ///
    /// Attributes are not part of the path.
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}.{}", parent.path(), self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn parent(&self) -> Option<Section<'a>> {
        self.node
            .parent
            .and_then(|parent| self.configurator.section(parent))
    }

    pub fn is_top_level(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn options(&self) -> &'a [ConfigOption] {
        &self.node.options
    }

    pub fn option(&self, name: &str) -> Option<&'a ConfigOption> {
        self.node.option(name)
    }

    pub fn sub_sections(&self) -> impl Iterator<Item = Section<'a>> + 'a {
        let configurator = self.configurator;
        self.node
            .sub_sections
            .iter()
            .filter_map(move |id| configurator.section(*id))
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        &self.node.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.node
            .attributes
            .iter()
            .find(|attribute| attribute.name() == name)
    }

    /// True iff every attribute in `predicate` is present here with an equal
    /// value. Attributes of this section that are not in `predicate` do not matter.
    pub fn contains_attributes(&self, predicate: &[Attribute]) -> bool {
        attribute::contains_all(&self.node.attributes, predicate)
    }

    /// Whether an equal option (same name and value) belongs to this section.
    pub fn contains_option(&self, option: &ConfigOption) -> bool {
        self.node.options.contains(option)
    }

    pub fn contains_attribute(&self, attribute: &Attribute) -> bool {
        self.node.attributes.contains(attribute)
    }

    /// Whether a direct subsection is equal to `section`.
    pub fn contains_sub_section(&self, section: &Section<'_>) -> bool {
        self.sub_sections().any(|sub_section| sub_section == *section)
    }

    /// Like [`Self::contains_sub_section`], at any depth.
    pub fn contains_descendant(&self, section: &Section<'_>) -> bool {
        self.sub_sections().any(|sub_section| {
            sub_section == *section || sub_section.contains_descendant(section)
        })
    }

    pub fn has_options(&self) -> bool {
        !self.node.options.is_empty()
    }

    pub fn has_sub_sections(&self) -> bool {
        !self.node.sub_sections.is_empty()
    }

    pub fn has_attributes(&self) -> bool {
        !self.node.attributes.is_empty()
    }

    /// No options and no subsections. Attributes do not count.
    pub fn is_empty(&self) -> bool {
        !self.has_options() && !self.has_sub_sections()
    }

    pub fn materialization(&self) -> Materialization {
        self.node.state
    }
}

/// Structural equality: same name, same configurator, same path, equal
/// option lists (in order) and equal attribute sets. Subsections are not compared.
impl PartialEq for Section<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.configurator == other.configurator
            && self.path() == other.path()
            && self.options() == other.options()
            && attribute::same_set(self.attributes(), other.attributes())
    }
}

impl Display for Section<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;

        if self.has_attributes() {
            f.write_str("[")?;
            for (index, attribute) in self.attributes().iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{attribute}")?;
            }
            f.write_str("]")?;
        }

        Ok(())
    }
}

impl Debug for Section<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("attributes", &self.node.attributes)
            .field("options", &self.node.options)
            .field("sub_sections", &self.node.sub_sections)
            .field("state", &self.node.state)
            .finish()
    }
}
