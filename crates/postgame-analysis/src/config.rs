//! Analysis configuration loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML for [`AnalysisConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one analysis session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Path to the UCI engine executable.
    /// Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub engine_path: String,
    /// Search depth per position.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Engine thread count; `None` keeps the engine's default.
    #[serde(default)]
    pub threads: Option<u32>,
    /// Per-position time budget in milliseconds.
    #[serde(default = "default_move_timeout_ms")]
    pub move_timeout_ms: u64,
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_depth() -> u32 {
    8
}

fn default_move_timeout_ms() -> u64 {
    60_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            depth: default_depth(),
            threads: None,
            move_timeout_ms: default_move_timeout_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Load the configuration from [`Self::config_path()`], or defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Load the configuration from an explicit path, or defaults when the
    /// file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file, `postgame.toml` in the
    /// current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("postgame.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_content = r#"
engine_path = "/usr/bin/stockfish"
depth = 14
threads = 4
move_timeout_ms = 30000
"#;

        let config: AnalysisConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.engine_path, "/usr/bin/stockfish");
        assert_eq!(config.depth, 14);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.move_timeout_ms, 30_000);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config.engine_path, "stockfish");
        assert_eq!(config.depth, 8);
        assert_eq!(config.threads, None);
        assert_eq!(config.move_timeout_ms, 60_000);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: AnalysisConfig = toml::from_str("depth = 20").unwrap();
        assert_eq!(config.depth, 20);
        assert_eq!(config.engine_path, "stockfish");
    }

    #[test]
    fn missing_file_is_the_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load_from(dir.path().join("postgame.toml")).unwrap();
        assert_eq!(config.depth, AnalysisConfig::default().depth);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postgame.toml");
        std::fs::write(&path, "depth = \"very deep\"").unwrap();
        assert!(matches!(
            AnalysisConfig::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = AnalysisConfig {
            engine_path: "/opt/stockfish/stockfish".to_string(),
            depth: 12,
            threads: Some(8),
            move_timeout_ms: 10_000,
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AnalysisConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.engine_path, config.engine_path);
        assert_eq!(deserialized.depth, config.depth);
        assert_eq!(deserialized.threads, config.threads);
    }
}
