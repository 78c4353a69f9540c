//! Configuration management for the Alpha admin tools
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (ALPHA_* prefix, `__` between keys)
//! 3. alpha.local.toml (gitignored, local overrides)
//! 4. alpha.toml (git-tracked, project config)
//! 5. ~/.config/alpha/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use alpha_acl::ContextCombination;
use alpha_editor::{
    DEFAULT_MAX_SESSIONS_PER_COMPANY, DEFAULT_MAX_SESSIONS_PER_USER, SessionLimits,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Alpha configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    pub project: ProjectConfig,
    pub access_control: AccessControlConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "alpha-admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessControlConfig {
    /// Role catalog (`.json` or `.toml`); the standard roles when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles_file: Option<PathBuf>,
    pub context_combination: ContextCombination,
    /// Log every permission decision.
    pub audit: bool,
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            roles_file: None,
            context_combination: ContextCombination::RequireBoth,
            audit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub max_per_user: u32,
    pub max_per_company: u32,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_per_user: DEFAULT_MAX_SESSIONS_PER_USER,
            max_per_company: DEFAULT_MAX_SESSIONS_PER_COMPANY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AlphaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Session caps as a validated value.
    pub fn session_limits(&self) -> Result<SessionLimits, ConfigError> {
        SessionLimits::new(self.sessions.max_per_user, self.sessions.max_per_company)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session_limits()?;

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if let Some(roles_file) = &self.access_control.roles_file
            && roles_file.is_relative()
        {
            self.access_control.roles_file = Some(base.join(roles_file));
        }
    }
}
