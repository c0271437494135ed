use anyhow::{Context, Result};
use explorer_core::config::{get_default_config_file, ExplorerConfig};
use tracing::debug;

use crate::cli::Args;

const APP_NAME: &str = "vndb-explorer";

/// Flags override the config file. `GEMINI_API_KEY` and `API_KEY` only
/// supply a key when neither a flag nor the file sets one.
pub fn resolve(args: &Args) -> Result<ExplorerConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME).context("Failed to locate config directory")?,
    };
    debug!(path = %path.display(), "Loading configuration");

    let file_config = ExplorerConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    Ok(file_config.with_env_api_key().merge(&overrides(args)))
}

fn overrides(args: &Args) -> ExplorerConfig {
    ExplorerConfig {
        api_key: args.api_key.clone().filter(|key| !key.trim().is_empty()),
        model_name: args.model.clone(),
        api_base_url: None,
        vndb_endpoint: args.vndb_endpoint.clone(),
        request_timeout_secs: None,
        max_retries: None,
        initial_backoff_ms: None,
        max_empty_retries: None,
    }
}
