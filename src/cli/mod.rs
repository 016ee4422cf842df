//! CLI command definitions for atmos
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::config::{ConfigLayer, non_empty};
use crate::format::OutputFormat;
use clap::{Args, Parser, Subcommand};

/// Atmos configuration and stack discovery
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stack config directory globs (overrides StackDirs and ATMOS_STACK_DIRS)
    #[arg(long = "stacks-dir", value_name = "GLOB", value_delimiter = ',', global = true)]
    pub stacks_dir: Vec<String>,

    /// Terraform components directory (overrides TerraformDir and ATMOS_TERRAFORM_DIR)
    #[arg(long, value_name = "DIR", global = true)]
    pub terraform_dir: Option<String>,

    /// Logical stack name pattern (overrides StackNamePattern and ATMOS_STACK_NAME_PATTERN)
    #[arg(long, value_name = "PATTERN", global = true)]
    pub stack_name_pattern: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout (default), 2/stderr, or filename
    #[arg(short, long, default_value = "1", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Command-line override layer. Empty values are ignored.
    pub fn overrides(&self) -> ConfigLayer {
        let stacks_dir: Vec<String> = self
            .stacks_dir
            .iter()
            .filter(|dir| !dir.is_empty())
            .cloned()
            .collect();

        ConfigLayer {
            stack_dirs: (!stacks_dir.is_empty()).then_some(stacks_dir),
            terraform_dir: non_empty(self.terraform_dir.clone()),
            stack_name_pattern: non_empty(self.stack_name_pattern.clone()),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration (default if no subcommand given)
    Config(ConfigArgs),

    /// List the discovered stack config files, one per line
    Stacks,
}

/// Arguments for the config subcommand
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}
