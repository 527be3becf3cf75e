use std::path::PathBuf;

use miette::Result;
use serde::Deserialize;

use crate::configuration::traits::ResolvableConfiguration;


fn default_file_path() -> String {
    ".configurator.xml".to_string()
}


#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub(super) struct UnresolvedStoreConfiguration {
    #[serde(default = "default_file_path")]
    file_path: String,

    #[serde(default)]
    global: bool,
}

impl Default for UnresolvedStoreConfiguration {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            global: false,
        }
    }
}

/// Which configuration document to operate on.
///
/// Command-line flags take precedence over these values.
#[derive(Clone, Debug)]
pub struct StoreConfiguration {
    /// Relative to the home directory unless `global` is set.
    pub file_path: PathBuf,

    pub global: bool,
}

impl ResolvableConfiguration for UnresolvedStoreConfiguration {
    type Resolved = StoreConfiguration;

    fn resolve(self) -> Result<Self::Resolved> {
        Ok(StoreConfiguration {
            file_path: PathBuf::from(self.file_path),
            global: self.global,
        })
    }
}
