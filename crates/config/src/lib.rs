//! Configuration loading, validation, and management for Dormline.
//!
//! Loads configuration from `~/.dormline/config.toml` (path override via
//! `DORMLINE_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.dormline/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API key. Env override: `GEMINI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for every generation call.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Active orchestration strategy.
    #[serde(default)]
    pub strategy: Strategy,

    /// Gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Which orchestration strategy a deployment runs. This is the system's
/// one composition switch: both strategies expose the same contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single-shot classify-then-respond.
    Router,
    /// Fan out to all personas, then blend. Matches the original deployment.
    #[default]
    Synthesizer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            strategy: Strategy::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("strategy", &self.strategy)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Errors from configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from the default path (~/.dormline/config.toml),
    /// or the file named by `DORMLINE_CONFIG` when set.
    ///
    /// Environment overrides applied afterward:
    /// - `GEMINI_API_KEY` — api key (only when the file provides none)
    /// - `DORMLINE_MODEL` — model
    /// - `DORMLINE_STRATEGY` — "router" or "synthesizer"
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = match std::env::var("DORMLINE_CONFIG") {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::config_dir().join("config.toml"),
        };
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("DORMLINE_MODEL") {
            config.model = model;
        }

        if let Ok(strategy) = std::env::var("DORMLINE_STRATEGY") {
            config.strategy = match strategy.trim().to_lowercase().as_str() {
                "router" => Strategy::Router,
                "synthesizer" | "synth" => Strategy::Synthesizer,
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "unknown strategy '{other}' (expected 'router' or 'synthesizer')"
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".dormline")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.strategy, Strategy::Synthesizer);
        assert_eq!(config.gateway.port, 8080);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.strategy, Strategy::Synthesizer);
    }

    #[test]
    fn parses_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_key = "test-key"
model = "gemini-2.5-pro"
strategy = "router"

[gateway]
host = "0.0.0.0"
port = 9090
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.strategy, Strategy::Router);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 9090);
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature = 3.5").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("super-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
