//! Configuration loader with multi-source merging

use crate::{AlphaConfig, Paths};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "ALPHA".to_string(),
            user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "ALPHA")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/alpha/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<AlphaConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = AlphaConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/alpha/config.toml)
        if self.user_config
            && let Ok(user_config_file) = Paths::new().user_config_file()
            && user_config_file.exists()
        {
            builder = builder.add_source(
                config::File::from(user_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 3. Project config (alpha.toml), 4. local overrides (alpha.local.toml)
        for file in [
            Paths::project_config_file(&self.project_dir),
            Paths::local_config_file(&self.project_dir),
        ] {
            if file.exists() {
                builder = builder.add_source(
                    config::File::from(file)
                        .required(false)
                        .format(config::FileFormat::Toml),
                );
            }
        }

        // 5. Environment variables (ALPHA_SESSIONS__MAX_PER_USER=5)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut alpha_config: AlphaConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        alpha_config.validate()?;
        alpha_config.resolve_paths(&self.project_dir);

        Ok(alpha_config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default(self) -> AlphaConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_acl::ContextCombination;
    use std::fs;
    use tempfile::tempdir;

    fn loader(project_dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(project_dir)
            .with_env_prefix("ALPHA_TEST_UNSET")
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert_eq!(config, AlphaConfig::default());
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[project]
name = "acme-travel"

[access_control]
roles_file = "roles.json"
context_combination = "layered"

[sessions]
max_per_user = 5
max_per_company = 120
"#;
        fs::write(project_dir.join("alpha.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.project.name, "acme-travel");
        assert_eq!(
            config.access_control.context_combination,
            ContextCombination::Layered
        );
        assert_eq!(config.sessions.max_per_user, 5);
        assert_eq!(config.sessions.max_per_company, 120);
        // Relative paths resolve against the project dir
        assert_eq!(
            config.access_control.roles_file,
            Some(project_dir.join("roles.json"))
        );
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("alpha.toml"),
            "[logging]\nlevel = \"info\"\n",
        )
        .expect("Failed to write project config");
        fs::write(
            project_dir.join("alpha.local.toml"),
            "[logging]\nlevel = \"debug\"\n",
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("alpha.toml"),
            "[sessions]\nmax_per_user = 80\nmax_per_company = 50\n",
        )
        .expect("Failed to write config");

        assert!(loader(project_dir).load().is_err());
        assert_eq!(loader(project_dir).load_or_default(), AlphaConfig::default());
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_vars_override_files() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("alpha.toml"),
            "[sessions]\nmax_per_user = 3\n\n[logging]\nlevel = \"warn\"\n",
        )
        .expect("Failed to write config");

        // SAFETY: the prefix is unique to this test, so no other test reads
        // or writes these variables. Removed before the assertions run.
        unsafe {
            env::set_var("ALPHA_ENVTEST_SESSIONS__MAX_PER_USER", "5");
            env::set_var("ALPHA_ENVTEST_ACCESS_CONTROL__CONTEXT_COMBINATION", "layered");
            env::set_var("ALPHA_ENVTEST_LOGGING__LEVEL", "debug");
        }

        let config = loader(project_dir).with_env_prefix("ALPHA_ENVTEST").load();

        // SAFETY: see above
        unsafe {
            env::remove_var("ALPHA_ENVTEST_SESSIONS__MAX_PER_USER");
            env::remove_var("ALPHA_ENVTEST_ACCESS_CONTROL__CONTEXT_COMBINATION");
            env::remove_var("ALPHA_ENVTEST_LOGGING__LEVEL");
        }

        let config = config.expect("Failed to load config");
        assert_eq!(config.sessions.max_per_user, 5);
        assert_eq!(
            config.access_control.context_combination,
            ContextCombination::Layered
        );
        assert_eq!(config.logging.level, "debug");
    }
}
