use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::DEFAULT_RETRY_PATH;

/// Main configuration structure loaded from footprint_oracle.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_bind: SocketAddr,
    /// Path error responses point clients back to
    pub retry_path: String,
}

/// Text-generation request settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound for a single generation call, after which the fallback narrative is used
    pub timeout_ms: u64,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            retry_path: DEFAULT_RETRY_PATH.to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 250,
            temperature: 0.8,
            timeout_ms: 20_000,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            log_level: "footprint_oracle=info,tower_http=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses ORACLE_CONFIG environment variable or defaults to "footprint_oracle.toml"
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with_path(None)
    }

    /// Like [`Config::load`], with an explicit config file path taking precedence.
    pub fn load_with_path(path: Option<&str>) -> anyhow::Result<Self> {
        if let Some(env_file) = crate::load_env() {
            tracing::debug!("Loaded environment from {}", env_file.display());
        }

        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var("ORACLE_CONFIG").ok())
            .unwrap_or_else(|| "footprint_oracle.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(_) => {
                tracing::debug!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();

        if config.runtime.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; narratives will use the fallback story");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env overrides (env-first)
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ORACLE_HTTP_BIND") {
            match v.parse::<SocketAddr>() {
                Ok(bind) => self.server.http_bind = bind,
                Err(e) => tracing::warn!("Ignoring ORACLE_HTTP_BIND '{}': {}", v, e),
            }
        }
        if let Ok(path) = std::env::var("ORACLE_RETRY_PATH") {
            self.server.retry_path = path;
        }
        if let Ok(model) = std::env::var("ORACLE_MODEL") {
            self.generation.model = model;
        }
        if let Ok(url) = std::env::var("ORACLE_OPENAI_BASE_URL") {
            self.generation.base_url = url;
        }
        if let Some(max_tokens) = std::env::var("ORACLE_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.generation.max_tokens = max_tokens;
        }
        if let Some(temperature) = std::env::var("ORACLE_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            self.generation.temperature = temperature;
        }
        if let Some(timeout) = std::env::var("ORACLE_GEN_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.timeout_ms = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            anyhow::bail!("ORACLE_TEMPERATURE must be between 0.0 and 2.0");
        }
        if self.generation.max_tokens == 0 {
            anyhow::bail!("ORACLE_MAX_TOKENS must be > 0");
        }
        if self.generation.timeout_ms == 0 {
            anyhow::bail!("ORACLE_GEN_TIMEOUT_MS must be > 0");
        }
        if !self.server.retry_path.starts_with('/') {
            anyhow::bail!("ORACLE_RETRY_PATH must start with '/'");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.max_tokens, 250);
        assert_eq!(config.generation.temperature, 0.8);
        assert_eq!(config.server.retry_path, "/quiz");
        assert!(config.runtime.openai_api_key.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [generation]
            model = "gpt-4o-mini"
            timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.timeout_ms, 5000);
        assert_eq!(config.generation.max_tokens, 250);
        assert_eq!(config.server.http_bind.port(), 5000);
    }

    #[test]
    fn bind_address_parses_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [server]
            http_bind = "0.0.0.0:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.http_bind.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.generation.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.retry_path = "quiz".to_string();
        assert!(config.validate().is_err());
    }
}
