//! Output formatting for the resolved configuration.

use crate::config::Configuration;
use anyhow::Result;
use clap::ValueEnum;

/// Output format for the `config` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render the configuration in the requested format.
pub fn format_configuration(config: &Configuration, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => config.to_json_pretty()?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(rendered)
}

/// One stack config file per line.
pub fn format_stack_files(config: &Configuration) -> String {
    config.stack_config_files.join("\n")
}
