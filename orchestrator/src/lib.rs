//! Conversation side of the explorer: the transcript, the progress event
//! channel and the loop that lets Gemini call the VNDB tools.

pub mod context;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod prompt;
mod retry;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use context::{ConversationSettings, ExplorerContext};
pub use coordinator::{run_conversation, Completion, RunOutcome};
pub use errors::ConversationError;
pub use events::{ConversationEvent, EventSink};
pub use prompt::GREETING;
pub use transcript::{Part, PendingTurn, Role, Transcript, Turn};
