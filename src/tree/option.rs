use std::fmt::{self, Display, Formatter};

use super::SectionId;
use crate::document::ElementId;


/// A named scalar value attached to a section.
///
/// The name is fixed at creation. The value changes through
/// [`Configurator::set_option`][crate::Configurator::set_option], which
/// writes the change through to the backing store.
#[derive(Clone, Debug)]
pub struct ConfigOption {
    name: String,
    value: String,
    section: SectionId,
    pub(crate) element: Option<ElementId>,
}

impl ConfigOption {
    pub(crate) fn new(name: String, value: String, section: SectionId) -> Self {
        Self {
            name,
            value,
            section,
            element: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The section that owns this option.
    pub fn section(&self) -> SectionId {
        self.section
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }
}

/// Options compare by name and value only. Equal options may belong to
/// different sections.
impl PartialEq for ConfigOption {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Eq for ConfigOption {}

impl Display for ConfigOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
