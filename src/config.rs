//! Panel system configuration and manifest.
//!
//! Optional env vars:
//! - `PANELS_BASE_PATH`: host path panel navigations target (default `/`)
//! - `PANELS_PENDING_MS`: pending placeholder debounce (default 200)
//! - `PANELS_REOPEN_POLICY`: `restore` (default) or `reset`
//! - `PANELS_LOG_CAPACITY`: navigation log entries kept (default 200)

use std::str::FromStr;

use serde::Deserialize;

use crate::error::PanelError;
use crate::factory::{DEFAULT_PENDING_MS, PendingOptions};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// What a closed panel shows when reopened without an explicit path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenPolicy {
    /// Restore the last in-panel location.
    #[default]
    RestoreLast,
    /// Always start over at the panel's default path.
    ResetToDefault,
}

impl FromStr for ReopenPolicy {
    type Err = PanelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "restore" | "restore_last" => Ok(Self::RestoreLast),
            "reset" | "reset_to_default" => Ok(Self::ResetToDefault),
            other => Err(PanelError::Config(format!("unknown reopen policy `{other}`"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PanelSystemConfig {
    pub base_path: String,
    pub pending_ms: u64,
    pub reopen: ReopenPolicy,
    pub log_capacity: usize,
}

impl Default for PanelSystemConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_owned(),
            pending_ms: DEFAULT_PENDING_MS,
            reopen: ReopenPolicy::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl PanelSystemConfig {
    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] for an unknown reopen policy or a base
    /// path that does not start with `/`.
    pub fn from_env() -> Result<Self, PanelError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults.
    ///
    /// # Errors
    ///
    /// Same as [`PanelSystemConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PanelError> {
        let base_path = lookup("PANELS_BASE_PATH").unwrap_or_else(|| DEFAULT_BASE_PATH.to_owned());
        let reopen = lookup("PANELS_REOPEN_POLICY").map(|raw| raw.parse::<ReopenPolicy>()).transpose()?.unwrap_or_default();
        let config = Self {
            base_path,
            pending_ms: parse_or(lookup("PANELS_PENDING_MS"), DEFAULT_PENDING_MS),
            reopen,
            log_capacity: parse_or(lookup("PANELS_LOG_CAPACITY"), DEFAULT_LOG_CAPACITY),
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`PanelError::Config`] when `base_path` is not absolute.
    pub fn validate(&self) -> Result<(), PanelError> {
        if !self.base_path.starts_with('/') {
            return Err(PanelError::Config(format!("base path `{}` must start with `/`", self.base_path)));
        }
        Ok(())
    }

    #[must_use]
    pub fn pending(&self) -> PendingOptions {
        PendingOptions::from_millis(self.pending_ms)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Declarative panel registry, loaded by tools that have no compiled-in
/// route trees. Routes are `$param` patterns for the in-memory engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SystemManifest {
    #[serde(default)]
    pub config: PanelSystemConfig,
    pub panels: Vec<PanelManifest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PanelManifest {
    pub name: String,
    pub default_path: String,
    #[serde(default)]
    pub routes: Vec<String>,
    /// Show a debounced pending placeholder during slow transitions.
    #[serde(default)]
    pub pending: bool,
}
