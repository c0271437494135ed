use crate::errors::{GeminiError, GeminiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VNDB_ENDPOINT: &str = "https://api.vndb.org/kana";

/// Environment variables consulted for the API key, in order
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration for the explorer: model service, data service and retry bounds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    pub vndb_endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_empty_retries: Option<u32>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL.to_string()),
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            vndb_endpoint: Some(DEFAULT_VNDB_ENDPOINT.to_string()),
            request_timeout_secs: Some(60),
            max_retries: Some(3),
            initial_backoff_ms: Some(2000),
            max_empty_retries: Some(2),
        }
    }
}

impl ExplorerConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GeminiError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            GeminiError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        // Values missing from the file fall back to the defaults
        Ok(Self::default().merge(&config))
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            vndb_endpoint: other
                .vndb_endpoint
                .clone()
                .or_else(|| self.vndb_endpoint.clone()),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            max_retries: other.max_retries.or(self.max_retries),
            initial_backoff_ms: other.initial_backoff_ms.or(self.initial_backoff_ms),
            max_empty_retries: other.max_empty_retries.or(self.max_empty_retries),
        }
    }

    /// Fills a missing API key from `.env` / the process environment
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            // A missing .env file is the normal case
            let _ = dotenvy::dotenv();
            self.api_key = API_KEY_ENV_VARS
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|key| !key.trim().is_empty());
        }
        self
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn vndb_endpoint(&self) -> &str {
        self.vndb_endpoint.as_deref().unwrap_or(DEFAULT_VNDB_ENDPOINT)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine config directory".to_string())
    })?;

    Ok(config_dir.join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
