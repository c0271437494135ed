use std::sync::Arc;
use std::time::Duration;

use explorer_core::{ChatModel, ExplorerConfig, GeminiClient};
use explorer_vndb::{SchemaRegistry, VndbAdapter};

use crate::errors::ConversationError;

/// Retry bounds for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSettings {
    /// Model-call attempts before giving up on a busy service
    pub max_attempts: u32,
    /// First backoff wait; doubles after every retry
    pub initial_backoff: Duration,
    /// Corrective prompts sent after empty model turns
    pub max_empty_retries: u32,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(2000),
            max_empty_retries: 2,
        }
    }
}

impl From<&ExplorerConfig> for ConversationSettings {
    fn from(config: &ExplorerConfig) -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: config.max_retries.unwrap_or(defaults.max_attempts).max(1),
            initial_backoff: config
                .initial_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_backoff),
            max_empty_retries: config.max_empty_retries.unwrap_or(defaults.max_empty_retries),
        }
    }
}

/// Process-wide collaborators handed to every run: model client, data
/// adapter and schema registry.
#[derive(Clone)]
pub struct ExplorerContext {
    pub model: Arc<dyn ChatModel>,
    pub vndb: VndbAdapter,
    pub registry: Arc<SchemaRegistry>,
    pub settings: ConversationSettings,
}

impl ExplorerContext {
    pub fn new(
        model: Arc<dyn ChatModel>,
        vndb: VndbAdapter,
        registry: Arc<SchemaRegistry>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            model,
            vndb,
            registry,
            settings,
        }
    }

    /// Wires the Gemini client and the Kana HTTP adapter from configuration
    pub fn from_config(config: &ExplorerConfig) -> Result<Self, ConversationError> {
        let model = GeminiClient::new(config)?;
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let vndb = VndbAdapter::http(config.vndb_endpoint(), timeout)
            .map_err(|e| ConversationError::Config(e.to_string()))?;

        Ok(Self::new(
            Arc::new(model),
            vndb,
            Arc::new(SchemaRegistry::new()),
            ConversationSettings::from(config),
        ))
    }
}
