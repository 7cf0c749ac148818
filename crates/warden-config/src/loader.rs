//! Layered loading of [`WardenConfig`].
//!
//! Later sources override earlier ones, key by key:
//!
//! 1. built-in defaults
//! 2. the user file, `config.toml` in the platform config dir
//! 3. `warden.toml` in the project directory
//! 4. `warden.local.toml` in the project directory
//! 5. environment variables, `WARDEN_` then the keys joined by `__`
//!    (`WARDEN_SECURITY__ADMIN_USER=root`)
//!
//! A relative `store.data_dir` is then anchored at the project directory and
//! the merged result is validated.

use crate::{Paths, WardenConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Builds a [`WardenConfig`] from the layered sources of one project.
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config: bool,
}

impl ConfigLoader {
    /// Loads the project in the current directory, with the `WARDEN` env
    /// prefix and the user file enabled.
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "WARDEN".to_string(),
            user_config: true,
        }
    }

    /// Directory holding `warden.toml`; relative data paths resolve here.
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Replaces the `WARDEN` env prefix. Keys still use `__` between levels.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Ignores the user file; only the project files and env override the
    /// defaults.
    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// Merges every source, anchors `store.data_dir`, and validates.
    ///
    /// Fails on unreadable or malformed TOML, on values of the wrong type,
    /// and on anything [`WardenConfig::validate`] rejects.
    pub fn load(self) -> Result<WardenConfig> {
        let mut builder = config::Config::builder();

        // 1. Defaults
        let defaults = WardenConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User file
        if self.user_config {
            if let Ok(user_config_file) = Paths::new().user_config_file() {
                if user_config_file.exists() {
                    builder = builder.add_source(
                        config::File::from(user_config_file)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // 3. warden.toml
        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 4. warden.local.toml
        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (WARDEN_STORE__DATA_DIR, ...)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let mut warden_config: WardenConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        warden_config.resolve_paths(&self.project_dir);
        warden_config.validate()?;

        Ok(warden_config)
    }

    /// Like [`load`](Self::load), but any failure falls back to the
    /// defaults anchored at the project directory. The error is dropped.
    pub fn load_or_default(self) -> WardenConfig {
        let project_dir = self.project_dir.clone();
        self.load().unwrap_or_else(|_| {
            let mut config = WardenConfig::default();
            config.resolve_paths(project_dir);
            config
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
