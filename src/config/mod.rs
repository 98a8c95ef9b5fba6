//! Registry setup configuration
//!
//! Handles configuration loading, validation, and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::{env_bool, env_opt};

/// Overrides [`RegistryConfig::directory`]
pub const ENV_DIRECTORY: &str = "CINNAMON_DIRECTORY";
/// Overrides [`RegistryConfig::save_directory`]
pub const ENV_SAVE_DIRECTORY: &str = "CINNAMON_SAVE_DIRECTORY";
/// Overrides the logging filter
pub const ENV_LOG: &str = "CINNAMON_LOG";
/// Switches logging to JSON output when set to a true value
pub const ENV_LOG_JSON: &str = "CINNAMON_LOG_JSON";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "cinnamon_core=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

/// Where declarations live and where fetched ones are stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Main directory, scanned for `configurations` folders
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Additional declaration directories whose namespaces load on demand
    #[serde(default)]
    pub external_directories: Vec<PathBuf>,

    /// Base for relative external directories (defaults to the parent of `directory`)
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            external_directories: Vec::new(),
            save_directory: None,
            logging: None,
        }
    }
}

impl RegistryConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_external_directories<I, P>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.external_directories = directories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_save_directory(mut self, save_directory: impl Into<PathBuf>) -> Self {
        self.save_directory = Some(save_directory.into());
        self
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: RegistryConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `CINNAMON_*` environment variables on top of file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(directory) = env_opt(ENV_DIRECTORY) {
            self.directory = PathBuf::from(directory);
        }
        if let Some(save_directory) = env_opt(ENV_SAVE_DIRECTORY) {
            self.save_directory = Some(PathBuf::from(save_directory));
        }
        if let Some(filter) = env_opt(ENV_LOG) {
            self.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter);
        }
        if env_opt(ENV_LOG_JSON).is_some() {
            self.logging.get_or_insert_with(LoggingConfig::default).json_format = env_bool(ENV_LOG_JSON);
        }
    }

    /// Effective save directory
    ///
    /// Defaults to the parent of the resolved `directory`, so `"."` maps to
    /// the parent of the working directory.
    pub fn save_directory(&self) -> PathBuf {
        if let Some(save_directory) = &self.save_directory {
            return save_directory.clone();
        }
        let directory = self
            .directory
            .canonicalize()
            .unwrap_or_else(|_| self.directory.clone());
        directory
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("directory must not be empty"));
        }
        if !self.directory.is_dir() {
            return Err(anyhow::anyhow!(
                "directory {} does not exist or is not a directory",
                self.directory.display()
            ));
        }
        if let Some(save_directory) = &self.save_directory {
            if save_directory.exists() && !save_directory.is_dir() {
                return Err(anyhow::anyhow!(
                    "save_directory {} is not a directory",
                    save_directory.display()
                ));
            }
        }
        for external in &self.external_directories {
            if external.as_os_str().is_empty() {
                return Err(anyhow::anyhow!("external directories must not be empty paths"));
            }
            if *external == self.directory {
                return Err(anyhow::anyhow!(
                    "external directory {} duplicates the main directory",
                    external.display()
                ));
            }
        }
        if let Some(logging) = &self.logging {
            if let Some(filter) = &logging.filter {
                if filter.trim().is_empty() {
                    return Err(anyhow::anyhow!("logging filter must not be blank"));
                }
            }
        }
        Ok(())
    }
}
