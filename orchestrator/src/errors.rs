use explorer_core::GeminiError;
use thiserror::Error;

const BUSY_MESSAGE: &str = "The model is currently overloaded. Please try again in a few moments.";
const RATE_LIMIT_MESSAGE: &str = "The Gemini API is busy or the rate limit has been reached. \
     This can happen with complex queries. Please try again in a moment.";
const GENERIC_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";
const EMPTY_MESSAGE: &str = "Please type a question or attach an image.";

/// Failures that end an orchestration run. Everything else is recovered
/// inside the loop.
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("model service still busy after {attempts} attempts: {source}")]
    ServiceBusy {
        attempts: u32,
        #[source]
        source: GeminiError,
    },

    #[error("model service error: {0}")]
    Model(#[from] GeminiError),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("user turn has no text and no attachments")]
    EmptyMessage,
}

impl ConversationError {
    /// Short, non-technical text for the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            ConversationError::ServiceBusy { source, .. } if source.is_rate_limited() => {
                RATE_LIMIT_MESSAGE
            }
            ConversationError::ServiceBusy { .. } => BUSY_MESSAGE,
            ConversationError::Model(source) if source.is_rate_limited() => RATE_LIMIT_MESSAGE,
            ConversationError::Model(_) | ConversationError::Config(_) => GENERIC_MESSAGE,
            ConversationError::EmptyMessage => EMPTY_MESSAGE,
        }
    }
}
