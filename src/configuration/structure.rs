use std::fs;
use std::path::{Path, PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::Deserialize;

pub use self::base_paths::BasePathsConfiguration;
use self::base_paths::UnresolvedBasePathsConfiguration;
pub use self::logging::LoggingConfiguration;
use self::logging::UnresolvedLoggingConfiguration;
pub use self::store::StoreConfiguration;
use self::store::UnresolvedStoreConfiguration;
use super::traits::{ResolvableConfiguration, ResolvableConfigurationWithContext};
use super::utilities::get_default_configuration_file_path;

mod base_paths;
mod logging;
mod store;



#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct UnresolvedConfiguration {
    /// Base paths.
    #[serde(default)]
    base_paths: UnresolvedBasePathsConfiguration,

    /// Logging-related configuration.
    #[serde(default)]
    logging: UnresolvedLoggingConfiguration,

    /// Configuration document the binary operates on.
    #[serde(default)]
    store: UnresolvedStoreConfiguration,
}


/// The entire configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the file path this `Configuration` instance was loaded from,
    /// or `None` if built-in defaults were used.
    pub file_path: Option<PathBuf>,

    /// Base paths
    pub base_paths: BasePathsConfiguration,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,

    /// Configuration document the binary operates on.
    pub store: StoreConfiguration,
}


impl ResolvableConfigurationWithContext for UnresolvedConfiguration {
    type Resolved = Configuration;
    type Context = Option<PathBuf>;

    fn resolve(self, context: Self::Context) -> Result<Self::Resolved> {
        let base_paths = self
            .base_paths
            .resolve()
            .wrap_err("Failed to resolve base_paths table.")?;

        let logging = self
            .logging
            .resolve(base_paths.clone())
            .wrap_err("Failed to resolve logging table.")?;

        let store = self
            .store
            .resolve()
            .wrap_err("Failed to resolve store table.")?;


        Ok(Configuration {
            base_paths,
            file_path: context,
            logging,
            store,
        })
    }
}


impl Configuration {
    /// Load the configuration from a specific file path.
    pub fn load_from_path<S: AsRef<Path>>(configuration_file_path: S) -> Result<Self> {
        let configuration_file_path = configuration_file_path.as_ref();

        // Read the configuration file into memory.
        let configuration_string = fs::read_to_string(configuration_file_path)
            .into_diagnostic()
            .wrap_err_with(|| {
                miette!(
                    "Could not read configuration file at {}.",
                    configuration_file_path.display()
                )
            })?;

        Self::load_from_str(&configuration_string, configuration_file_path)
    }

    /// Load the configuration from the default path
    /// (`{user configuration directory}/configurator/configuration.toml`),
    /// falling back to built-in defaults if there is no file there.
    pub fn load_from_default_path() -> Result<Self> {
        let default_path = get_default_configuration_file_path()
            .wrap_err("Could not determine the default configuration file path.")?;

        if default_path.is_file() {
            return Self::load_from_path(default_path);
        }

        UnresolvedConfiguration::default()
            .resolve(None)
            .wrap_err("Failed to resolve default configuration.")
    }

    fn load_from_str(configuration_string: &str, configuration_file_path: &Path) -> Result<Self> {
        // Parse the string into the `UnresolvedConfiguration` structure and then resolve it.
        let unresolved_configuration =
            toml::from_str::<UnresolvedConfiguration>(configuration_string)
                .into_diagnostic()
                .wrap_err("Could not parse configuration file!")?;


        let configuration_file_path = dunce::canonicalize(configuration_file_path)
            .into_diagnostic()
            .wrap_err("Could not canonicalize configuration file path!")?;

        unresolved_configuration
            .resolve(Some(configuration_file_path))
            .wrap_err("Failed to resolve configuration.")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_full_settings_file() {
        let directory = tempfile::tempdir().unwrap();
        let data_directory = directory.path().join("data");
        let settings_path = directory.path().join("configuration.toml");

        fs::write(
            &settings_path,
            format!(
                r#"
                [base_paths]
                base_data_directory_path = "{}"

                [logging]
                console_output_level_filter = "warn"
                log_file_output_level_filter = "debug"
                log_file_output_directory = "{{BASE_DATA_DIRECTORY}}/logs"

                [store]
                file_path = "{}"
                global = true
                "#,
                data_directory.display().to_string().replace('\\', "/"),
                directory
                    .path()
                    .join("tool.xml")
                    .display()
                    .to_string()
                    .replace('\\', "/"),
            ),
        )
        .unwrap();

        let configuration = Configuration::load_from_path(&settings_path).unwrap();
        let data_directory = dunce::canonicalize(&data_directory).unwrap();

        assert_eq!(configuration.base_paths.base_data_directory_path, data_directory);
        assert_eq!(
            configuration.logging.log_file_output_directory,
            Some(data_directory.join("logs"))
        );
        assert!(configuration.store.global);
        assert_eq!(configuration.store.file_path, directory.path().join("tool.xml"));
    }

    #[test]
    fn rejects_invalid_level_filters() {
        let directory = tempfile::tempdir().unwrap();
        let settings_path = directory.path().join("configuration.toml");

        fs::write(
            &settings_path,
            format!(
                "[base_paths]\nbase_data_directory_path = \"{}\"\n\n\
                 [logging]\nconsole_output_level_filter = \"configurator=loudest\"\n\
                 log_file_output_level_filter = \"info\"\n",
                directory.path().display().to_string().replace('\\', "/"),
            ),
        )
        .unwrap();

        assert!(Configuration::load_from_path(&settings_path).is_err());
    }
}
