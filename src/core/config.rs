//! Operator configuration.
//!
//! Loaded from `$HOOKWARDEN_CONFIG`, else `<config_dir>/hookwarden/config.toml`.
//! No file means defaults. A file that cannot be read or parsed also falls
//! back to defaults: a broken config must never block an agent session.

use crate::core::error::HookError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "HOOKWARDEN_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Directory holding `session-YYYY-MM-DD.log` files.
    pub log_dir: Option<PathBuf>,
    /// Appended to the built-in protected path catalog.
    pub extra_protected_patterns: Vec<String>,
    pub notification_title: String,
    pub timeouts: TimeoutConfig,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            extra_protected_patterns: Vec::new(),
            notification_title: "Claude Code".to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Per-capability timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub vcs: u64,
    pub format: u64,
    pub typecheck: u64,
    pub import_lint: u64,
    pub notify: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            vcs: 5,
            format: 30,
            typecheck: 60,
            import_lint: 30,
            notify: 5,
        }
    }
}

impl HookConfig {
    pub fn parse(content: &str) -> Result<Self, HookError> {
        toml::from_str(content).map_err(|e| HookError::ConfigError(e.to_string()))
    }

    /// Read a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, HookError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Resolve and load the operator config, degrading to defaults.
    pub fn load() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unusable config");
                Self::default()
            }
        }
    }

    /// Session log directory; `~` is expanded against the home directory.
    pub fn session_log_dir(&self) -> Option<PathBuf> {
        match &self.log_dir {
            Some(dir) => Some(expand_home(dir)),
            None => dirs::home_dir().map(|home| home.join(".claude").join("logs")),
        }
    }
}

impl TimeoutConfig {
    pub fn duration(secs: u64) -> Duration {
        Duration::from_secs(secs.max(1))
    }
}

fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("hookwarden").join(CONFIG_FILE_NAME))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
