//! Persistent configuration for gosem.
//!
//! Loads/saves a TOML config at `~/.gosem/config.toml`.

use crate::GosemError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level gosem configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GosemConfig {
    pub catalog: CatalogConfig,
    pub log: LogConfig,
}

impl GosemConfig {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self, GosemError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GosemError::Config(e.to_string()))
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<(), GosemError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GosemError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the default path, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Default config path: `~/.gosem/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gosem")
            .join("config.toml")
    }
}

/// Package export catalog sources used by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Load the catalog bundled with the binary.
    pub embedded: bool,
    /// Additional catalog JSON files, merged in order after the embedded one.
    pub extra_paths: Vec<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            embedded: true,
            extra_paths: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "gosem=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = GosemConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).expect("default config should serialize to TOML");
        let parsed: GosemConfig =
            toml::from_str(&toml_str).expect("serialized TOML should parse back");
        assert!(parsed.catalog.embedded);
        assert!(parsed.catalog.extra_paths.is_empty());
        assert_eq!(parsed.log.filter, "gosem=info");
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let result = GosemConfig::load(Path::new("/tmp/nonexistent_gosem_config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = GosemConfig::default();
        config.catalog.embedded = false;
        config.catalog.extra_paths.push(PathBuf::from("/opt/go/catalog.json"));
        config.log.filter = "gosem=debug".to_string();

        config.save(&path).expect("save should succeed");
        let loaded = GosemConfig::load(&path).expect("load should succeed");

        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\nembedded = ").unwrap();

        let err = GosemConfig::load(&path).unwrap_err();
        assert!(matches!(err, GosemError::Config(_)));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = GosemConfig::default_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_fields() {
        let partial = r#"
[log]
filter = "gosem=trace"
"#;
        let config: GosemConfig = toml::from_str(partial).expect("partial TOML should parse");
        assert_eq!(config.log.filter, "gosem=trace");
        assert!(config.catalog.embedded);
    }
}
