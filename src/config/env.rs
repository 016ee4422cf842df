//! Environment variable snapshot and the environment override layer.

use super::merge::ConfigLayer;
use super::types::{ENV_STACK_DIRS, ENV_STACK_NAME_PATTERN, ENV_TERRAFORM_DIR};
use std::collections::HashMap;
use tracing::info;

/// Immutable snapshot of environment variables.
///
/// The loader reads from this instead of the process environment so that
/// resolution is deterministic under test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Look up a variable. Empty values are reported as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Build the environment override layer.
    ///
    /// `ATMOS_STACK_DIRS` is a comma-separated list. Variables that are unset
    /// or empty leave the field unset.
    pub fn layer(&self) -> ConfigLayer {
        let stack_dirs = self.get(ENV_STACK_DIRS).map(|dirs| {
            info!("Found ENV var '{}'", ENV_STACK_DIRS);
            dirs.split(',').map(String::from).collect()
        });

        let terraform_dir = self.get(ENV_TERRAFORM_DIR).map(String::from);
        if terraform_dir.is_some() {
            info!("Found ENV var '{}'", ENV_TERRAFORM_DIR);
        }

        let stack_name_pattern = self.get(ENV_STACK_NAME_PATTERN).map(String::from);
        if stack_name_pattern.is_some() {
            info!("Found ENV var '{}'", ENV_STACK_NAME_PATTERN);
        }

        ConfigLayer {
            stack_dirs,
            terraform_dir,
            stack_name_pattern,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for EnvVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
