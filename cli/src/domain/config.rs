//! Domain types and validators for project configuration.
//!
//! Pure functions only. No I/O or async.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Default project file name, looked up in the application root.
pub const CONFIG_FILE_NAME: &str = "teardown.yaml";

/// Directory name under the build dir that holds synthesized artifacts.
pub const ARTIFACT_DIR_NAME: &str = "cdk.out";

/// Stack identifiers must start with a letter and contain only letters,
/// digits, and hyphens.
pub static STACK_IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern and cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("valid regex")
});

// ── Config schema ────────────────────────────────────────────────────────────

/// Project configuration stored in `teardown.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Application name.
    pub name: String,
    /// Deployment stage, e.g. `dev` or `prod`.
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Cloud region the stacks live in.
    #[serde(default = "default_region")]
    pub region: String,
    /// Build directory relative to the application root.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    /// Backend helper invocation.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Location of the debug stack app. Defaults to `assets/debug-stack`
    /// next to the executable.
    #[serde(default)]
    pub debug_stack_dir: Option<PathBuf>,
}

/// How the provisioning backend helper is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: default_backend_program(),
            args: Vec::new(),
        }
    }
}

fn default_stage() -> String {
    "dev".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(".build")
}

fn default_backend_program() -> String {
    "sst-cdk".to_string()
}

impl ProjectConfig {
    /// Synthesized artifact location for an application rooted at `app_root`.
    #[must_use]
    pub fn artifact_dir(&self, app_root: &Path) -> PathBuf {
        app_root.join(&self.build_dir).join(ARTIFACT_DIR_NAME)
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, stage: Option<&str>, region: Option<&str>) {
        if let Some(stage) = stage {
            self.stage = stage.to_string();
        }
        if let Some(region) = region {
            self.region = region.to_string();
        }
    }

    /// Check that `name` and `stage` form legal stack identifiers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidName` for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ident("name", &self.name)?;
        validate_ident("stage", &self.stage)
    }
}

fn validate_ident(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if STACK_IDENT_RE.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName {
            field,
            value: value.to_string(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
