use clap::Parser;
use configurator::{
    logging::initialize_tracing,
    Configurator,
    Logger,
    Scope,
    Section,
    SectionId,
};
use miette::{miette, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{CLIArgs, CLICommand},
    configuration::Configuration,
};

mod cli;
mod configuration;


const LOG_FILE_NAME: &str = "configurator.log";


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load settings.
    let configuration = match cli_args.configuration_file_path.as_ref() {
        Some(path) => Configuration::load_from_path(path),
        None => Configuration::load_from_default_path(),
    }
    .wrap_err("Failed to load configuration file.")?;


    let console_level_filter = if cli_args.debug {
        EnvFilter::new("debug")
    } else {
        configuration.logging.console_output_level_filter()
    };

    let logging_raii_guard = initialize_tracing(
        console_level_filter,
        configuration.logging.log_file_output_level_filter(),
        configuration.logging.log_file_output_directory.as_deref(),
        LOG_FILE_NAME,
    )
    .wrap_err("Failed to initialize tracing.")?;

    match configuration.file_path.as_ref() {
        Some(path) => info!("Settings loaded from {}.", path.display()),
        None => info!("No settings file found, using defaults."),
    }


    let store_file_path = cli_args
        .store_file_path
        .unwrap_or_else(|| configuration.store.file_path.clone());

    let scope = if cli_args.global || configuration.store.global {
        Scope::Global
    } else {
        Scope::Local
    };

    let mut configurator = Configurator::new(&store_file_path, scope, Logger::inherit())
        .wrap_err("Failed to open configuration document.")?;

    run_command(&mut configurator, cli_args.command)?;


    drop(logging_raii_guard);
    Ok(())
}


fn run_command(configurator: &mut Configurator, command: CLICommand) -> Result<()> {
    match command {
        CLICommand::Get { path } => {
            let option = configurator
                .get_option_by_path(&path)
                .wrap_err_with(|| miette!("Failed to read option {path}."))?;

            println!("{}", option.value());
        }
        CLICommand::Set { path, value } => {
            configurator
                .add_option_by_path(&path, &value)
                .wrap_err_with(|| miette!("Failed to set option {path}."))?;

            info!("Set {path} to {value}.");
        }
        CLICommand::Ensure { section_path } => {
            let section = configurator
                .ensure_section_path(&section_path)
                .wrap_err_with(|| miette!("Failed to ensure section {section_path}."))?;

            print_section_tree(configurator, section);
        }
        CLICommand::Show { section_path } => {
            let sections = match section_path {
                Some(section_path) => vec![configurator
                    .resolve_section_path(&section_path)
                    .wrap_err_with(|| miette!("Failed to find section {section_path}."))?],
                None => configurator
                    .get_top_level_sections()
                    .wrap_err("Failed to load configuration document.")?
                    .to_vec(),
            };

            for section in sections {
                print_section_tree(configurator, section);
            }
        }
    }

    Ok(())
}


fn print_section_tree(configurator: &Configurator, section: SectionId) {
    if let Some(section) = configurator.section(section) {
        print_section(&section, 0);
    }
}

fn print_section(section: &Section<'_>, depth: usize) {
    let indent = "  ".repeat(depth);

    let attributes = section
        .attributes()
        .iter()
        .map(|attribute| attribute.to_string())
        .collect::<Vec<_>>();

    if attributes.is_empty() {
        println!("{indent}{}", section.name());
    } else {
        println!("{indent}{}[{}]", section.name(), attributes.join(","));
    }

    for option in section.options() {
        println!("{indent}  {} = {}", option.name(), option.value());
    }

    for sub_section in section.sub_sections() {
        print_section(&sub_section, depth + 1);
    }
}
