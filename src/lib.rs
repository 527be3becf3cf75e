//! Path-addressable, attribute-aware hierarchical configuration, persisted as XML.
//!
//! Sections nest and carry options (named string values) and attributes
//! (name/value pairs that tell same-named siblings apart). Both are
//! addressed with dotted paths such as `Binaries.Binary[name=tool].debug`.
//!
//! ```no_run
//! use configurator::{Configurator, Logger, Scope};
//!
//! # fn main() -> configurator::error::Result<()> {
//! let mut configurator = Configurator::new(".tool.xml", Scope::Local, Logger::inherit())?;
//!
//! configurator.add_option_by_path("Binaries.Binary[name=tool].debug", "true")?;
//! let debug = configurator.get_option_by_path("Binaries.Binary[name=tool].debug")?;
//! assert_eq!(debug.value(), "true");
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod logging;
pub mod tree;

pub use error::{ConfiguratorError, StoreError};
pub use logging::Logger;
pub use tree::{
    Attribute,
    ConfigOption,
    Configurator,
    Materialization,
    Scope,
    Section,
    SectionId,
    SectionSelector,
    SharedConfigurator,
};
