//! Layered configuration system.
//!
//! Resolves the CLI configuration from these tiers, lowest priority first:
//! 1. **Defaults** - built in
//! 2. **System** - `/usr/local/etc/atmos/atmos.yaml` (`%LOCALAPPDATA%\atmos.yaml` on Windows)
//! 3. **Home** - `~/.atmos/atmos.yaml`
//! 4. **Current** - `$CWD/atmos.yaml`
//! 5. **Environment** - `ATMOS_*` variables
//! 6. **CLI** - command-line flags
//!
//! ## Merge Strategy
//! Each tier is a partial record. A field set by a higher tier replaces the
//! lower value entirely; sequences are never concatenated. Missing files are
//! skipped, malformed files abort resolution.
//!
//! ## Environment Variables
//! - `ATMOS_STACK_DIRS` - Comma-separated stack directory globs
//! - `ATMOS_TERRAFORM_DIR` - Terraform components directory
//! - `ATMOS_STACK_NAME_PATTERN` - Logical stack name pattern
//!
//! Empty values are treated as unset.

mod env;
mod loader;
mod merge;
mod paths;
mod types;
mod validate;

pub use env::EnvVars;
pub use loader::{ConfigLoader, read_layer};
pub use merge::{ConfigLayer, merge_layers};
pub(crate) use merge::non_empty;
pub use paths::{ConfigPaths, ConfigTier, absolutize, system_dir_for};
pub use types::*;
pub use validate::validate;
