//! Gemini side of the explorer: wire types, the HTTP client, multi-turn
//! chat sessions and configuration loading.

pub mod chat;
pub mod client;
pub mod config;
pub mod errors;
pub mod types;

pub use chat::{ChatModel, ChatSession, GeminiChat, SessionConfig};
pub use client::GeminiClient;
pub use config::{ExplorerConfig, DEFAULT_API_BASE_URL, DEFAULT_MODEL, DEFAULT_VNDB_ENDPOINT};
pub use errors::{GeminiError, GeminiResult};
pub use types::*;
