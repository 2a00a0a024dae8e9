//! Configuration settings for the Tether interpreter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub parser: ParserConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("tether.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("tether/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".tether/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.ai.base_url.is_empty() {
            return Err(ConfigError::MissingField("ai.base_url".to_string()).into());
        }
        if self.ai.model.is_empty() {
            return Err(ConfigError::MissingField("ai.model".to_string()).into());
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(
                ConfigError::Invalid("ai.temperature must be in 0..=2".to_string()).into(),
            );
        }
        if self.ai.max_tokens == 0 {
            return Err(ConfigError::Invalid("ai.max_tokens must be > 0".to_string()).into());
        }
        if !(0.0..=1.0).contains(&self.parser.fuzzy_threshold) {
            return Err(
                ConfigError::Invalid("parser.fuzzy_threshold must be in 0..=1".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// AI classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model used for classification requests.
    pub model: String,
    /// Sampling temperature; low for consistent classification.
    pub temperature: f32,
    /// Completion token cap per request.
    pub max_tokens: u32,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

/// Heuristic parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum normalized edit distance accepted by contact resolution.
    pub fuzzy_threshold: f32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: crate::parser::FUZZY_THRESHOLD,
        }
    }
}
