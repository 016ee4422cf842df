//! Configuration types and structures.

use serde::{Deserialize, Serialize};

/// Name of the config file looked up in every tier.
pub const CONFIG_FILE_NAME: &str = "atmos.yaml";

/// Directory holding the system-wide config on non-Windows hosts.
pub const SYSTEM_DIR_CONFIG_FILE_PATH: &str = "/usr/local/etc/atmos";

/// On Windows this variable replaces the system config directory.
pub const WINDOWS_APP_DATA_ENV_VAR: &str = "LOCALAPPDATA";

/// Subdirectory of the user's home that holds the home-tier config.
pub const HOME_CONFIG_DIR: &str = ".atmos";

/// Extension appended to stack globs that do not carry one.
pub const DEFAULT_STACK_CONFIG_FILE_EXTENSION: &str = ".yaml";

pub const ENV_STACK_DIRS: &str = "ATMOS_STACK_DIRS";
pub const ENV_TERRAFORM_DIR: &str = "ATMOS_TERRAFORM_DIR";
pub const ENV_STACK_NAME_PATTERN: &str = "ATMOS_STACK_NAME_PATTERN";

pub const DEFAULT_STACK_DIR: &str = "./stacks/*";
pub const DEFAULT_TERRAFORM_DIR: &str = "./components/terraform";
pub const DEFAULT_STACK_NAME_PATTERN: &str = "environment-stage";

/// The resolved CLI configuration.
///
/// Built once at startup by [`super::ConfigLoader::resolve`] and passed by
/// reference to whatever needs it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Configuration {
    /// Logical stack naming pattern, e.g. `environment-stage`.
    pub stack_name_pattern: String,

    /// Globs pointing at stack config directories, as configured.
    pub stack_dirs: Vec<String>,

    /// `stack_dirs` made absolute against the working directory.
    pub stack_dirs_absolute_paths: Vec<String>,

    /// Terraform components directory, as configured.
    pub terraform_dir: String,

    /// `terraform_dir` made absolute against the working directory.
    pub terraform_dir_absolute_path: String,

    /// Stack config files matched by `stack_dirs_absolute_paths`.
    pub stack_config_files: Vec<String>,
}

impl Configuration {
    /// Pretty JSON with a two-space indent.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
