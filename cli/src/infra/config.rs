//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CONFIG_FILE_NAME, ProjectConfig};
use crate::domain::error::ConfigError;

/// Environment variable that points at an alternative project file.
pub const CONFIG_ENV: &str = "TEARDOWN_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
pub struct YamlConfigStore {
    app_root: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(app_root: &Path) -> Self {
        Self {
            app_root: app_root.to_path_buf(),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProjectConfig> {
        let path = self.path();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> PathBuf {
        match std::env::var(CONFIG_ENV) {
            Ok(val) if !val.is_empty() => PathBuf::from(val),
            _ => self.app_root.join(CONFIG_FILE_NAME),
        }
    }
}
