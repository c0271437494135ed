//! Transcript Store: the ordered user/model turns the UI renders and the
//! orchestrator replays as model history.

use explorer_core::types::{self as gemini, Content};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Piece of turn content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    InlineAttachment { mime_type: String, base64_data: String },
}

impl Part {
    fn is_attachment(&self) -> bool {
        matches!(self, Part::InlineAttachment { .. })
    }

    fn to_gemini(&self) -> gemini::Part {
        match self {
            Part::Text(text) => gemini::Part::text(text.clone()),
            Part::InlineAttachment {
                mime_type,
                base64_data,
            } => gemini::Part::inline_data(mime_type.clone(), base64_data.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_log: Vec<String>,
}

impl Turn {
    /// A user turn. Attachments are placed before the text, as the model
    /// service expects; blank text is left out.
    pub fn user(text: &str, attachments: Vec<Part>) -> Self {
        let mut parts: Vec<Part> = attachments
            .into_iter()
            .filter(Part::is_attachment)
            .collect();
        if !text.trim().is_empty() {
            parts.push(Part::Text(text.to_string()));
        }
        Self {
            role: Role::User,
            parts,
            activity_log: Vec::new(),
        }
    }

    pub fn model(text: &str) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.to_string())],
            activity_log: Vec::new(),
        }
    }

    pub fn has_attachment(&self) -> bool {
        self.parts.iter().any(Part::is_attachment)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineAttachment { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn gemini_parts(&self) -> Vec<gemini::Part> {
        self.parts.iter().map(Part::to_gemini).collect()
    }

    fn to_content(&self) -> Content {
        match self.role {
            Role::User => Content::user(self.gemini_parts()),
            Role::Model => Content::model(self.gemini_parts()),
        }
    }
}

/// Append-only log of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opening with a model greeting
    pub fn with_greeting(greeting: &str) -> Self {
        Self {
            turns: vec![Turn::model(greeting)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Model-service history. Turns without content are skipped since the
    /// service rejects empty contents; activity logs are UI-only.
    pub fn history(&self) -> Vec<Content> {
        self.turns
            .iter()
            .filter(|turn| !turn.is_empty())
            .map(Turn::to_content)
            .collect()
    }
}

/// The model turn being built by one orchestration run. Activity lines are
/// recorded here and streamed to the UI; the turn reaches the transcript
/// only through `commit`.
#[derive(Debug)]
pub struct PendingTurn {
    activity_log: Vec<String>,
    events: EventSink,
}

impl PendingTurn {
    pub fn new(events: EventSink) -> Self {
        Self {
            activity_log: Vec::new(),
            events,
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!(activity = %line);
        self.events.activity(&line);
        self.activity_log.push(line);
    }

    pub fn activity_log(&self) -> &[String] {
        &self.activity_log
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    pub fn commit(self, text: &str) -> Turn {
        Turn {
            role: Role::Model,
            parts: vec![Part::Text(text.to_string())],
            activity_log: self.activity_log,
        }
    }
}
