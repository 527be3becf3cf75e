//! The in-memory configuration tree.
//!
//! A [`Configurator`] owns every section in an arena and hands out
//! [`SectionId`]s. Read access goes through borrowed [`Section`] views,
//! mutation through the configurator itself, which writes every change
//! through to its backing document.

pub mod attribute;
mod configurator;
mod option;
pub mod path;
mod section;

pub use attribute::Attribute;
pub use configurator::{Configurator, Scope, SharedConfigurator};
pub use option::ConfigOption;
pub use path::SectionSelector;
pub use section::{Materialization, Section, SectionId};
pub(crate) use section::SectionNode;
