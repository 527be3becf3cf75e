use std::fmt::{self, Display, Formatter};


/// A name/value pair that tells sibling sections of the same name apart.
///
/// Attributes are never user-facing configuration data; they only take part
/// in path matching and section equality.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}


/// Whether every attribute of `predicate` appears, with an equal value, in `attributes`.
///
/// Extra entries in `attributes` are ignored; an empty predicate always matches.
pub fn contains_all(attributes: &[Attribute], predicate: &[Attribute]) -> bool {
    predicate.iter().all(|needle| attributes.contains(needle))
}

/// Set equality, ignoring order.
pub(crate) fn same_set(first: &[Attribute], second: &[Attribute]) -> bool {
    first.len() == second.len() && contains_all(first, second)
}
