//! Error types shared by the configuration tree and its document store.

use std::{io, path::PathBuf};

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::tree::SectionId;


/// Errors raised by the backing document store.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("I/O failure on {}", path.display())]
    #[diagnostic(code(configurator::store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The persisted document could not be parsed.
    ///
    /// [`Configurator`][crate::Configurator] recovers from this by discarding
    /// the document, so callers of the engine never see it.
    #[error("document at {} is corrupt: {reason}", path.display())]
    #[diagnostic(code(configurator::store::corrupt))]
    DocumentCorrupt { path: PathBuf, reason: String },

    #[error("could not serialize document for {}: {reason}", path.display())]
    #[diagnostic(code(configurator::store::serialize))]
    Serialize { path: PathBuf, reason: String },

    #[error("could not determine the home directory of the current user")]
    #[diagnostic(
        code(configurator::store::no_home),
        help("pass a global (absolute) configuration file path instead")
    )]
    HomeDirectoryUnavailable,
}

impl StoreError {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}


/// Errors raised by path resolution and tree mutation.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfiguratorError {
    /// A lookup-only resolution hit a missing segment.
    ///
    /// `valid_prefix` is the longest prefix of the path that does resolve
    /// (empty if not even the first segment does), `remainder` is the rest.
    #[error("no section `{remainder}` below `{valid_prefix}`")]
    #[diagnostic(code(configurator::path_not_found))]
    PathNotFound {
        valid_prefix: String,
        remainder: String,
    },

    #[error("section `{section}` has no option named `{option}`")]
    #[diagnostic(code(configurator::option_not_found))]
    OptionNotFound { section: String, option: String },

    #[error("malformed path `{path}`: {reason}")]
    #[diagnostic(code(configurator::malformed_path))]
    MalformedPath {
        #[source_code]
        path: String,
        #[label("here")]
        span: SourceSpan,
        reason: String,
    },

    /// A value contains characters an XML document cannot hold.
    #[error("value {value:?} cannot be stored: {reason}")]
    #[diagnostic(
        code(configurator::invalid_value),
        help("control characters other than tab, line feed and carriage return are not allowed")
    )]
    InvalidValue {
        #[source_code]
        value: String,
        #[label("here")]
        span: SourceSpan,
        reason: String,
    },

    /// A path segment names an option where a section was expected.
    #[error("`{path}` is an option, not a section")]
    #[diagnostic(
        code(configurator::not_a_section),
        help("the last segment of an option path names the option itself")
    )]
    NotASection { path: String, option: String },

    #[error("{0:?} does not belong to this configurator")]
    #[diagnostic(code(configurator::unknown_section))]
    UnknownSection(SectionId),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

impl ConfiguratorError {
    pub(crate) fn malformed<S, R>(path: S, offset: usize, length: usize, reason: R) -> Self
    where
        S: Into<String>,
        R: Into<String>,
    {
        Self::MalformedPath {
            path: path.into(),
            span: (offset, length).into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ConfiguratorError> = std::result::Result<T, E>;
