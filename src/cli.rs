//! Command-line interface definitions for the `configurator` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "configurator",
    author,
    about = "Reads and edits hierarchical XML configuration files using dotted paths.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the settings file to use.
    /// If unspecified, this defaults to `{user configuration directory}/configurator/configuration.toml`
    /// (or built-in defaults, if that file does not exist).
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the settings file to use."
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "store-file-path",
        help = "XML configuration document to operate on. Overrides the settings file."
    )]
    pub store_file_path: Option<PathBuf>,

    #[arg(
        long = "global",
        help = "Use the store file path as given instead of relative to the home directory."
    )]
    pub global: bool,

    #[arg(long = "debug", help = "Log resolution details to standard error.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: CLICommand,
}


#[derive(Subcommand)]
pub enum CLICommand {
    /// Print the value of an option, e.g. `Binaries.Binary[name=tool].debug`.
    Get {
        #[arg(help = "Option path.")]
        path: String,
    },

    /// Set an option, creating any missing sections on the way.
    Set {
        #[arg(help = "Option path.")]
        path: String,

        #[arg(help = "New option value.")]
        value: String,
    },

    /// Make sure a section path exists, creating what is missing.
    Ensure {
        #[arg(help = "Section path.")]
        section_path: String,
    },

    /// Print a section with everything below it, or the whole document.
    Show {
        #[arg(help = "Section path. Shows every top-level section if omitted.")]
        section_path: Option<String>,
    },
}


#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        CLIArgs::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_before_the_subcommand() {
        let arguments = CLIArgs::try_parse_from([
            "configurator",
            "-f",
            "/etc/tool.xml",
            "--global",
            "set",
            "Binaries.Binary[name=tool].debug",
            "true",
        ])
        .unwrap();

        assert!(arguments.global);
        assert_eq!(arguments.store_file_path, Some(PathBuf::from("/etc/tool.xml")));
        assert!(matches!(
            arguments.command,
            CLICommand::Set { ref path, ref value }
                if path == "Binaries.Binary[name=tool].debug" && value == "true"
        ));
    }
}
