//! Required-field checks run after all overrides are applied.

use super::types::{Configuration, ENV_STACK_DIRS, ENV_STACK_NAME_PATTERN, ENV_TERRAFORM_DIR};
use crate::error::{ConfigError, ConfigResult};

/// Fail on the first required field left empty after merging.
pub fn validate(config: &Configuration) -> ConfigResult<()> {
    if config.stack_dirs.is_empty() {
        return Err(ConfigError::missing_field(
            "StackDirs",
            format!(
                "At least one path to stack config must be provided in 'StackDirs' or '{}' ENV variable",
                ENV_STACK_DIRS
            ),
        ));
    }
    if config.terraform_dir.is_empty() {
        return Err(ConfigError::missing_field(
            "TerraformDir",
            format!(
                "Terraform dir must be provided in 'TerraformDir' or '{}' ENV variable",
                ENV_TERRAFORM_DIR
            ),
        ));
    }
    if config.stack_name_pattern.is_empty() {
        return Err(ConfigError::missing_field(
            "StackNamePattern",
            format!(
                "Stack name pattern must be provided in 'StackNamePattern' or '{}' ENV variable",
                ENV_STACK_NAME_PATTERN
            ),
        ));
    }
    Ok(())
}
