//! Configuration loader with tier-based merging.
//!
//! Runs the whole resolution pipeline: defaults, the three config files, ENV
//! vars and command-line flags are merged, then the result is validated,
//! normalized, and used to discover stack config files.

use super::env::EnvVars;
use super::merge::{ConfigLayer, merge_layers};
use super::paths::{ConfigPaths, ConfigTier};
use super::types::Configuration;
use super::validate::validate;
use crate::error::{ConfigError, ConfigResult};
use crate::stacks::find_stack_config_files;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each file tier
    paths: ConfigPaths,
    /// Environment snapshot for the ENV tier
    env: EnvVars,
    /// Command-line overrides (highest priority)
    cli: ConfigLayer,
}

impl ConfigLoader {
    /// Loader for the current process: real environment, home and cwd.
    pub fn discover() -> ConfigResult<Self> {
        let env = EnvVars::from_process();
        let paths = ConfigPaths::discover(&env)?;
        Ok(Self::new(paths, env))
    }

    /// Loader with explicit paths and environment.
    pub fn new(paths: ConfigPaths, env: EnvVars) -> Self {
        Self {
            paths,
            env,
            cli: ConfigLayer::default(),
        }
    }

    /// Set the command-line override layer.
    pub fn with_cli_overrides(mut self, cli: ConfigLayer) -> Self {
        self.cli = cli;
        self
    }

    /// Collect every layer that contributes, lowest priority first.
    ///
    /// Missing files are skipped. Unreadable or malformed files abort.
    pub fn load_layers(&self) -> ConfigResult<Vec<(ConfigTier, ConfigLayer)>> {
        let mut layers = vec![(ConfigTier::Defaults, ConfigLayer::defaults())];

        for (tier, path) in self.paths.candidates() {
            if let Some(layer) = read_layer(&path)? {
                debug!(tier = %tier, path = %path.display(), "Merged config layer");
                layers.push((tier, layer));
            }
        }

        layers.push((ConfigTier::Environment, self.env.layer()));

        if !self.cli.is_empty() {
            info!("Found command-line overrides");
            layers.push((ConfigTier::Cli, self.cli.clone()));
        }

        Ok(layers)
    }

    /// Merge all tiers without validating or touching the filesystem further.
    pub fn merged(&self) -> ConfigResult<Configuration> {
        let layers = self.load_layers()?;
        Ok(merge_layers(layers.into_iter().map(|(_, layer)| layer)).into_configuration())
    }

    /// Resolve the final configuration.
    pub fn resolve(&self) -> ConfigResult<Configuration> {
        info!("{}", "-".repeat(120));
        info!(
            "Processing and merging configurations in the following order: \
             system dir, home dir, current dir, ENV vars, command-line flags"
        );

        let mut config = self.merged()?;

        validate(&config)?;

        config.stack_dirs_absolute_paths = config
            .stack_dirs
            .iter()
            .map(|dir| self.paths.absolutize(dir))
            .collect();
        config.terraform_dir_absolute_path = self.paths.absolutize(&config.terraform_dir);

        config.stack_config_files = find_stack_config_files(&config.stack_dirs_absolute_paths)?;

        info!("Final CLI configuration:\n{}", config.to_json_pretty()?);

        Ok(config)
    }
}

/// Read one config file into a layer.
///
/// Returns `Ok(None)` when the file does not exist. The file handle is closed
/// before returning on every path.
pub fn read_layer(path: &Path) -> ConfigResult<Option<ConfigLayer>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("No config found at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    info!("Found config at {}", path.display());

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    drop(file);

    let layer = parse_layer(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Processed config at {}", path.display());

    Ok(Some(layer))
}

/// Parse YAML content into a layer. An empty document sets nothing.
fn parse_layer(content: &str) -> Result<ConfigLayer, serde_yaml::Error> {
    ConfigLayer::from_yaml(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_STACK_DIRS, ENV_TERRAFORM_DIR};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        paths: ConfigPaths,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let paths = ConfigPaths::with_dirs(
                Some(temp.path().join("system")),
                temp.path().join("home"),
                temp.path().join("work"),
            );
            std::fs::create_dir_all(&paths.working_dir).unwrap();
            Self { _temp: temp, paths }
        }

        fn write(&self, path: &Path, content: &str) {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn loader(&self, env: EnvVars) -> ConfigLoader {
            ConfigLoader::new(self.paths.clone(), env)
        }
    }

    #[test]
    fn test_read_layer_missing_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_layer(&temp.path().join("atmos.yaml")).unwrap(), None);
    }

    #[test]
    fn test_read_layer_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(read_layer(&path).unwrap(), Some(ConfigLayer::default()));
    }

    #[test]
    fn test_read_layer_malformed_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::write(&path, "StackDirs: [unterminated\n").unwrap();
        let err = read_layer(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("atmos.yaml"));
    }

    #[test]
    fn test_read_layer_directory_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::create_dir_all(&path).unwrap();
        let err = read_layer(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigReadFailed);
    }

    #[test]
    fn test_read_layer_keys_any_case() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::write(&path, "terraformdir: ./tf\nstackDirs: [./x/*]\n").unwrap();
        let layer = read_layer(&path).unwrap().unwrap();
        assert_eq!(layer.terraform_dir.as_deref(), Some("./tf"));
        assert_eq!(layer.stack_dirs, Some(vec!["./x/*".to_string()]));
    }

    #[test]
    fn test_read_layer_weakly_typed_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::write(&path, "StackDirs: ./stacks/*\nTerraformDir: 123\n").unwrap();
        let layer = read_layer(&path).unwrap().unwrap();
        assert_eq!(layer.stack_dirs, Some(vec!["./stacks/*".to_string()]));
        assert_eq!(layer.terraform_dir.as_deref(), Some("123"));
    }

    #[test]
    fn test_read_layer_wrong_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("atmos.yaml");
        std::fs::write(&path, "TerraformDir:\n  nested: true\n").unwrap();
        assert!(matches!(
            read_layer(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn test_merged_defaults_only() {
        let fixture = Fixture::new();
        let config = fixture.loader(EnvVars::default()).merged().unwrap();
        assert_eq!(config, ConfigLayer::defaults().into_configuration());
    }

    #[test]
    fn test_load_layers_skips_missing_files() {
        let fixture = Fixture::new();
        fixture.write(
            &fixture.paths.home_config_file(),
            "TerraformDir: ./tf\n",
        );
        let tiers: Vec<ConfigTier> = fixture
            .loader(EnvVars::default())
            .load_layers()
            .unwrap()
            .into_iter()
            .map(|(tier, _)| tier)
            .collect();
        assert_eq!(
            tiers,
            vec![ConfigTier::Defaults, ConfigTier::Home, ConfigTier::Environment]
        );
    }

    #[test]
    fn test_env_overrides_files() {
        let fixture = Fixture::new();
        fixture.write(
            &fixture.paths.current_config_file(),
            "TerraformDir: ./from-file\nStackDirs: [./file/*]\n",
        );
        let env: EnvVars = [(ENV_TERRAFORM_DIR, "./from-env"), (ENV_STACK_DIRS, "x,y")]
            .into_iter()
            .collect();
        let config = fixture.loader(env).merged().unwrap();
        assert_eq!(config.terraform_dir, "./from-env");
        assert_eq!(config.stack_dirs, vec!["x", "y"]);
    }

    #[test]
    fn test_cli_overrides_env() {
        let fixture = Fixture::new();
        let env: EnvVars = [(ENV_TERRAFORM_DIR, "./from-env")].into_iter().collect();
        let cli = ConfigLayer {
            terraform_dir: Some("./from-cli".into()),
            ..Default::default()
        };
        let config = fixture.loader(env).with_cli_overrides(cli).merged().unwrap();
        assert_eq!(config.terraform_dir, "./from-cli");
    }

    #[test]
    fn test_resolve_populates_absolute_paths_and_files() {
        let fixture = Fixture::new();
        let work = &fixture.paths.working_dir;
        fixture.write(&work.join("stacks/uw2-prod.yaml"), "vars: {}\n");

        let config = fixture.loader(EnvVars::default()).resolve().unwrap();
        assert_eq!(config.stack_dirs_absolute_paths.len(), 1);
        assert!(Path::new(&config.stack_dirs_absolute_paths[0]).is_absolute());
        assert!(config.stack_dirs_absolute_paths[0].ends_with("stacks/*"));
        assert!(config.terraform_dir_absolute_path.ends_with("components/terraform"));
        assert_eq!(config.stack_config_files.len(), 1);
        assert!(config.stack_config_files[0].ends_with("uw2-prod.yaml"));
    }

    #[test]
    fn test_resolve_validates_before_discovery() {
        let fixture = Fixture::new();
        fixture.write(&fixture.paths.current_config_file(), "StackNamePattern: ''\n");
        let err = fixture.loader(EnvVars::default()).resolve().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "StackNamePattern",
                ..
            }
        ));
    }
}
