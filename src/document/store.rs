//! Persistence backends for [`Document`]s.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{parse_document, serialize_document, Document};
use crate::error::StoreError;


/// Outcome of [`DocumentStore::load`].
#[derive(Debug)]
pub enum LoadedDocument {
    /// Nothing has been persisted yet.
    Missing,
    Loaded(Document),
}


/// Loads, persists and discards the backing document of a
/// [`Configurator`][crate::Configurator].
///
/// A document that exists but cannot be parsed is reported as
/// [`StoreError::DocumentCorrupt`]; deciding what to do about it is up to the caller.
pub trait DocumentStore: Send {
    /// Where the document lives. Two configurators are equal iff their
    /// stores share a location.
    fn location(&self) -> &Path;

    fn load(&mut self) -> Result<LoadedDocument, StoreError>;

    /// Replaces the whole persisted document.
    fn save(&mut self, document: &Document) -> Result<(), StoreError>;

    /// Removes the persisted document, if any.
    fn discard(&mut self) -> Result<(), StoreError>;
}


/// Stores the document as an XML file on disk.
#[derive(Clone, Debug)]
pub struct XmlFileStore {
    file_path: PathBuf,
}

impl XmlFileStore {
    pub fn new<P: Into<PathBuf>>(file_path: P) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn temporary_file_path(&self) -> PathBuf {
        let mut file_name = self
            .file_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");

        self.file_path.with_file_name(file_name)
    }

    /// Writes to a sibling file first and renames it over the target.
    fn atomic_write(&self, content: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|error| StoreError::io(parent, error))?;
            }
        }

        let temporary_path = self.temporary_file_path();

        {
            let mut file = fs::File::create(&temporary_path)
                .map_err(|error| StoreError::io(&temporary_path, error))?;
            file.write_all(content.as_bytes())
                .map_err(|error| StoreError::io(&temporary_path, error))?;
            file.sync_all()
                .map_err(|error| StoreError::io(&temporary_path, error))?;
        }

        fs::rename(&temporary_path, &self.file_path)
            .map_err(|error| StoreError::io(&self.file_path, error))
    }
}

impl DocumentStore for XmlFileStore {
    fn location(&self) -> &Path {
        &self.file_path
    }

    fn load(&mut self) -> Result<LoadedDocument, StoreError> {
        if !self.file_path.exists() {
            debug!("No document at {}.", self.file_path.display());
            return Ok(LoadedDocument::Missing);
        }

        let xml = fs::read_to_string(&self.file_path)
            .map_err(|error| StoreError::io(&self.file_path, error))?;

        parse_document(&xml)
            .map(LoadedDocument::Loaded)
            .map_err(|error| StoreError::DocumentCorrupt {
                path: self.file_path.clone(),
                reason: error.to_string(),
            })
    }

    fn save(&mut self, document: &Document) -> Result<(), StoreError> {
        let xml = serialize_document(document).map_err(|error| StoreError::Serialize {
            path: self.file_path.clone(),
            reason: error.to_string(),
        })?;

        self.atomic_write(&xml)
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        if !self.file_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.file_path).map_err(|error| StoreError::io(&self.file_path, error))
    }
}


/// Keeps the serialized document in memory.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    name: PathBuf,
    contents: Option<String>,
}

impl MemoryStore {
    /// An empty store. `name` only serves as its [`location`][DocumentStore::location].
    pub fn new<P: Into<PathBuf>>(name: P) -> Self {
        Self {
            name: name.into(),
            contents: None,
        }
    }

    /// A store that already holds `contents`, parseable or not.
    pub fn with_contents<P, S>(name: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            contents: Some(contents.into()),
        }
    }

    /// The last saved text, if any.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl DocumentStore for MemoryStore {
    fn location(&self) -> &Path {
        &self.name
    }

    fn load(&mut self) -> Result<LoadedDocument, StoreError> {
        let Some(xml) = self.contents.as_deref() else {
            return Ok(LoadedDocument::Missing);
        };

        parse_document(xml)
            .map(LoadedDocument::Loaded)
            .map_err(|error| StoreError::DocumentCorrupt {
                path: self.name.clone(),
                reason: error.to_string(),
            })
    }

    fn save(&mut self, document: &Document) -> Result<(), StoreError> {
        let xml = serialize_document(document).map_err(|error| StoreError::Serialize {
            path: self.name.clone(),
            reason: error.to_string(),
        })?;

        self.contents = Some(xml);
        Ok(())
    }

    fn discard(&mut self) -> Result<(), StoreError> {
        self.contents = None;
        Ok(())
    }
}
