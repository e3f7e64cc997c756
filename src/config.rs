//! Engine configuration: endpoint, credentials, timeouts and merge switches.
//!
//! Values come from the process environment (with an optional `.env` file)
//! or from a TOML document. Anything not given falls back to `Default`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    MissingVars(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub keyword_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            request_timeout_seconds: 30,
            max_retries: 0,
            keyword_fallback: true,
        }
    }
}

impl EngineConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Required Environment Variables
    /// - `API_URL`: full URL of the generation endpoint
    /// - `API_KEY`: key sent with every request
    ///
    /// `MODEL`, `REQUEST_TIMEOUT_SECONDS`, `MAX_RETRIES` and `KEYWORD_FALLBACK`
    /// are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required_vars = ["API_URL", "API_KEY"];
        let missing_vars: Vec<&str> = required_vars
            .iter()
            .copied()
            .filter(|var| lookup(var).map_or(true, |value| value.trim().is_empty()))
            .collect();
        if !missing_vars.is_empty() {
            return Err(ConfigError::MissingVars(missing_vars.join(", ")));
        }

        let mut config = Self {
            api_url: lookup("API_URL").unwrap_or_default(),
            api_key: lookup("API_KEY").unwrap_or_default(),
            ..Self::default()
        };
        if let Some(model) = lookup("MODEL") {
            config.model = model;
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", &raw)?;
        }
        if let Some(raw) = lookup("MAX_RETRIES") {
            config.max_retries = parse_var("MAX_RETRIES", &raw)?;
        }
        if let Some(raw) = lookup("KEYWORD_FALLBACK") {
            config.keyword_fallback = parse_var("KEYWORD_FALLBACK", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key must not be empty".to_string()));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
