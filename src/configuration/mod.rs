//! Settings of the `configurator` binary itself (not to be confused with the
//! XML configuration documents it edits).
//!
//! Your starting point should probably be [`Configuration::load_from_default_path`].
//!
//! # Internals
//! Settings are deserialized into unvalidated ("unresolved") structures first.
//! Calling their `resolve` method turns them (and recursively their tables) into
//! validated ("resolved") versions, which is where paths get created,
//! canonicalized and have their placeholders filled in.
//!
//! Every table is optional; missing tables and a missing default settings
//! file fall back to built-in defaults.

#![allow(rustdoc::private_intra_doc_links)]

mod structure;
mod traits;
mod utilities;

pub use structure::*;
