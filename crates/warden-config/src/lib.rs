//! Configuration for a Warden project: where the ACL file lives, which user
//! bypasses every check, and the default log filter.
//!
//! See [`ConfigLoader`] for the sources and their precedence.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Default name of the flat ACL file inside the data directory.
pub const DEFAULT_ACL_FILE: &str = "acl.dat";

/// Settings shared by the engine and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub store: StoreConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".warden"),
            file_name: DEFAULT_ACL_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// User that bypasses every check.
    pub admin_user: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_user: "admin".to_string(),
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
            level: "info".to_string(),
        }
    }
}

impl WardenConfig {
    /// Loads the project in the current directory.
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Full path of the ACL file.
    pub fn store_path(&self) -> PathBuf {
        self.store.data_dir.join(&self.store.file_name)
    }

    /// Anchors a relative `store.data_dir` at `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.store.data_dir.is_relative() {
            self.store.data_dir = base.join(&self.store.data_dir);
        }
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.file_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "store.file_name must not be empty".to_string(),
            ));
        }
        if self.store.file_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "store.file_name '{}' must be a bare file name",
                self.store.file_name
            )));
        }
        if self.security.admin_user.is_empty() || self.security.admin_user.contains('|') {
            return Err(ConfigError::ValidationError(format!(
                "security.admin_user '{}' must be a non-empty name without '|'",
                self.security.admin_user
            )));
        }
        Ok(())
    }

    /// Parses a TOML document on top of the built-in defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = WardenConfig::default();
        assert_eq!(config.store.data_dir, PathBuf::from(".warden"));
        assert_eq!(config.store.file_name, "acl.dat");
        assert_eq!(config.security.admin_user, "admin");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_path_resolution() {
        let mut config = WardenConfig::default();
        config.resolve_paths("/srv/wiki");

        assert_eq!(config.store.data_dir, PathBuf::from("/srv/wiki/.warden"));
        assert_eq!(config.store_path(), PathBuf::from("/srv/wiki/.warden/acl.dat"));

        // Absolute paths are kept.
        config.resolve_paths("/elsewhere");
        assert_eq!(config.store.data_dir, PathBuf::from("/srv/wiki/.warden"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = WardenConfig::default();
        config.security.admin_user = "ad|min".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = WardenConfig::default();
        config.store.file_name = "nested/acl.dat".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = WardenConfig::default();
        config.store.file_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "[security]\nadmin_user = \"root\"\n").unwrap();

        let config = WardenConfig::from_toml_file(&file).expect("Failed to parse config");
        assert_eq!(config.security.admin_user, "root");
        assert_eq!(config.store.file_name, "acl.dat");
    }

    #[test]
    fn test_from_toml_file_reports_parse_errors() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("broken.toml");
        std::fs::write(&file, "[security\nadmin_user = ").unwrap();

        let err = WardenConfig::from_toml_file(&file).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let err = WardenConfig::from_toml_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
