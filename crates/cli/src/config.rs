//! Configuration loading from deckhand.toml.

use runtime::{Executor, GeminiAuth, GeminiBackend, SessionConfig, providers};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "deckhand.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionSettings,
}

/// Gemini backend configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// API key. `API_KEY` in the environment takes precedence.
    pub api_key: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    pub temperature: Option<f32>,

    pub base_url: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            api_version: default_api_version(),
            temperature: None,
            base_url: None,
        }
    }
}

/// Turn loop settings.
#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// Gateway calls allowed per prompt; unbounded when absent.
    pub max_rounds: Option<usize>,

    pub tool_timeout_secs: Option<u64>,

    #[serde(default = "default_true")]
    pub parallel_tools: bool,

    #[serde(default)]
    pub retain_history: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_rounds: None,
            tool_timeout_secs: None,
            parallel_tools: true,
            retain_history: false,
        }
    }
}

fn default_model() -> String {
    providers::DEFAULT_MODEL.to_string()
}

fn default_api_version() -> String {
    providers::DEFAULT_API_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the explicit path, else `deckhand.toml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Apply `API_KEY` and `GEMINI_MODEL` overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.backend.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            self.backend.model = model;
        }
        self
    }

    /// Build the Gemini backend.
    ///
    /// `temperature` applies when the file does not set one.
    pub fn backend(&self, temperature: Option<f32>) -> Result<GeminiBackend, ConfigError> {
        let key = self
            .backend
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey)?;

        let mut builder = GeminiBackend::builder(GeminiAuth::ApiKey(key), &self.backend.model)
            .api_version(&self.backend.api_version);
        if let Some(base_url) = &self.backend.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(t) = self.backend.temperature.or(temperature) {
            builder = builder.temperature(t);
        }
        Ok(builder.build())
    }

    pub fn executor(&self) -> Executor {
        let executor = Executor::new().parallel(self.session.parallel_tools);
        match self.session.tool_timeout_secs {
            Some(secs) => executor.with_timeout(Duration::from_secs(secs)),
            None => executor,
        }
    }

    pub fn session_config(&self, instruction: Option<&str>) -> SessionConfig {
        SessionConfig {
            instruction: instruction.map(str::to_string),
            max_rounds: self.session.max_rounds,
            retain_history: self.session.retain_history,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set API_KEY or backend.api_key")]
    MissingApiKey,
}
