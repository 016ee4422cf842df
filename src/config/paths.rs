//! Candidate config file locations and path normalization.
//!
//! Normalization is pure string manipulation against a fixed working
//! directory. No filesystem I/O happens here, so glob metacharacters pass
//! through untouched.

use super::env::EnvVars;
use super::types::{
    CONFIG_FILE_NAME, HOME_CONFIG_DIR, SYSTEM_DIR_CONFIG_FILE_PATH, WINDOWS_APP_DATA_ENV_VAR,
};
use crate::error::{ConfigError, ConfigResult};
use std::path::{Component, Path, PathBuf};

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// System-wide config (/usr/local/etc/atmos or %LOCALAPPDATA%)
    System = 1,
    /// User-level config (~/.atmos/)
    Home = 2,
    /// Config in the current working directory
    Current = 3,
    /// ATMOS_* environment variables
    Environment = 4,
    /// Command-line flags (highest priority)
    Cli = 5,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::System => write!(f, "system dir"),
            ConfigTier::Home => write!(f, "home dir"),
            ConfigTier::Current => write!(f, "current dir"),
            ConfigTier::Environment => write!(f, "ENV vars"),
            ConfigTier::Cli => write!(f, "command-line flags"),
        }
    }
}

/// Directories searched for `atmos.yaml`, plus the working directory used to
/// absolutize relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// System config directory. `None` on Windows when `LOCALAPPDATA` is unset.
    pub system_dir: Option<PathBuf>,
    /// User home directory (the config lives in `<home>/.atmos/`).
    pub home_dir: PathBuf,
    /// Process working directory at resolution time.
    pub working_dir: PathBuf,
}

impl ConfigPaths {
    /// Discover paths from the host: OS family, home directory and cwd.
    pub fn discover(env: &EnvVars) -> ConfigResult<Self> {
        let system_dir = system_dir_for(cfg!(windows), env);
        let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDir)?;
        let working_dir = std::env::current_dir().map_err(ConfigError::WorkingDir)?;

        Ok(Self {
            system_dir,
            home_dir,
            working_dir,
        })
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(
        system_dir: Option<PathBuf>,
        home_dir: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            system_dir,
            home_dir: home_dir.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn system_config_file(&self) -> Option<PathBuf> {
        self.system_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    pub fn home_config_file(&self) -> PathBuf {
        self.home_dir.join(HOME_CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    pub fn current_config_file(&self) -> PathBuf {
        self.working_dir.join(CONFIG_FILE_NAME)
    }

    /// Candidate config files in ascending priority order.
    pub fn candidates(&self) -> Vec<(ConfigTier, PathBuf)> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(system) = self.system_config_file() {
            candidates.push((ConfigTier::System, system));
        }
        candidates.push((ConfigTier::Home, self.home_config_file()));
        candidates.push((ConfigTier::Current, self.current_config_file()));
        candidates
    }

    /// Absolute form of `path` relative to the working directory.
    pub fn absolutize(&self, path: &str) -> String {
        absolutize(&self.working_dir, path)
    }
}

/// System config directory for the given OS family.
///
/// Windows has no fixed system location, so `LOCALAPPDATA` is used when set.
pub fn system_dir_for(windows: bool, env: &EnvVars) -> Option<PathBuf> {
    if windows {
        env.get(WINDOWS_APP_DATA_ENV_VAR).map(PathBuf::from)
    } else {
        Some(PathBuf::from(SYSTEM_DIR_CONFIG_FILE_PATH))
    }
}

/// Join `path` onto `base` unless it is already absolute, then clean it.
pub fn absolutize(base: &Path, path: &str) -> String {
    let path = Path::new(path);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    clean(&joined).to_string_lossy().into_owned()
}

/// Lexically remove `.` and `..` components. `..` never climbs above the root.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
