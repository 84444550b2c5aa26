//! Application configuration
//!
//! A single YAML document with optional `layout`, `analytics` and `server`
//! sections. Missing sections and fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::AnalyticsConfig;
use crate::layout::LayoutConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("canvas must be finite and positive, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for every path outside `/api`
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub analytics: AnalyticsConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject canvas sizes the layout cannot clamp into
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.layout.width, self.layout.height);
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(width) && usable(height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidCanvas { width, height })
        }
    }

    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::PartitionStrategy;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.server.static_dir.is_none());
        assert_eq!(config.analytics.top_k, 5);
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.layout.max_iterations, 100);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r#"
layout:
  width: 1200
  seed: 7
analytics:
  partition: label-propagation
server:
  static_dir: public
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.layout.width, 1200.0);
        assert_eq!(config.layout.height, 500.0);
        assert_eq!(config.layout.seed, Some(7));
        assert_eq!(config.analytics.partition, PartitionStrategy::LabelPropagation);
        assert_eq!(config.analytics.delay_ms, 800);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn load_reports_path_on_errors() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.yaml");
        let err = AppConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.yaml"));

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "server:\n  port: not-a-number\n").unwrap();
        let err = AppConfig::load(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_rejects_unusable_canvas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nan.yaml");
        fs::write(&path, "layout:\n  width: .nan\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCanvas { .. }));

        let mut config = AppConfig::default();
        config.layout.height = 0.0;
        assert!(config.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kgviz.yaml");
        fs::write(&path, "server:\n  port: 8080\n").unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            AppConfig::load_or_default(None).unwrap(),
            AppConfig::default()
        );
    }
}
