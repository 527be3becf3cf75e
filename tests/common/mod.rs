#![allow(dead_code)]

use std::path::{Path, PathBuf};

use configurator::{Configurator, Logger, Scope};
use tempfile::TempDir;


pub fn document_path(directory: &TempDir) -> PathBuf {
    directory.path().join("configuration.xml")
}

pub fn open(path: &Path) -> Configurator {
    Configurator::new(path, Scope::Global, Logger::disabled()).unwrap()
}
