//! Atmos CLI
//!
//! Resolves the layered configuration once at startup and prints it, or the
//! stack config files it discovered.

use anyhow::Result;
use atmos_config::cli::{Cli, Command, ConfigArgs};
use atmos_config::config::ConfigLoader;
use atmos_config::format::{format_configuration, format_stack_files};
use atmos_config::logging::{self, LogTarget};
use clap::Parser;
use tracing::error;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let loader = ConfigLoader::discover()?.with_cli_overrides(cli.overrides());
    let config = match loader.resolve() {
        Ok(config) => config,
        Err(err) => {
            error!(code = ?err.code(), "{}", err);
            return Err(err.into());
        }
    };

    match cli.command {
        Some(Command::Stacks) => {
            println!("{}", format_stack_files(&config));
        }
        Some(Command::Config(args)) => {
            println!("{}", format_configuration(&config, args.format)?);
        }
        None => {
            println!("{}", format_configuration(&config, ConfigArgs::default().format)?);
        }
    }

    Ok(())
}
