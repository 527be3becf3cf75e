use std::{collections::HashMap, path::PathBuf};

use miette::{miette, Result};


/// Returns the default settings file path, which is at
/// `{user configuration directory}/configurator/configuration.toml`.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let configuration_directory = dirs::config_dir()
        .ok_or_else(|| miette!("Could not determine the user configuration directory."))?;

    Ok(configuration_directory
        .join("configurator")
        .join("configuration.toml"))
}

/// Returns the default base data directory, which is at
/// `{user data directory}/configurator`.
pub fn get_default_base_data_directory_path() -> Result<PathBuf> {
    let data_directory = dirs::data_dir()
        .ok_or_else(|| miette!("Could not determine the user data directory."))?;

    Ok(data_directory.join("configurator"))
}

#[must_use = "function returns the modified path"]
pub fn replace_placeholders_in_path<S>(
    original_path: S,
    placeholders: HashMap<&'static str, String>,
) -> PathBuf
where
    S: Into<String>,
{
    let mut path_string: String = original_path.into();

    for (key, value) in placeholders.into_iter() {
        path_string = path_string.replace(key, &value);
    }

    PathBuf::from(path_string)
}
