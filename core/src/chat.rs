//! Multi-turn chat sessions on top of `generateContent`.
//!
//! A session owns the conversation history, the system instruction and the
//! tool declarations. Each `send_message` replays the whole history, and only
//! a successful exchange is appended, so a failed send can be retried as-is.

use async_trait::async_trait;
use tracing::debug;

use crate::client::GeminiClient;
use crate::errors::GeminiResult;
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, Part, Tool};

/// Everything a session is bound to at creation
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub system_instruction: Option<String>,
    pub tools: Vec<Tool>,
    pub history: Vec<Content>,
}

/// A live conversation with the model
#[async_trait]
pub trait ChatSession: Send {
    /// Send user parts (text, attachments or function responses) and return the model's reply
    async fn send_message(&mut self, parts: Vec<Part>) -> GeminiResult<GenerateContentResponse>;
}

/// Factory for chat sessions; one session per orchestration run
pub trait ChatModel: Send + Sync {
    fn start_chat(&self, config: SessionConfig) -> Box<dyn ChatSession>;
}

/// Gemini-backed chat session
pub struct GeminiChat {
    client: GeminiClient,
    system_instruction: Option<Content>,
    tools: Option<Vec<Tool>>,
    history: Vec<Content>,
}

impl GeminiChat {
    pub fn new(client: GeminiClient, config: SessionConfig) -> Self {
        let system_instruction = config.system_instruction.map(|prompt| Content {
            parts: vec![Part::text(prompt)],
            role: None,
        });
        let tools = if config.tools.is_empty() {
            None
        } else {
            Some(config.tools)
        };

        Self {
            client,
            system_instruction,
            tools,
            history: config.history,
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }
}

#[async_trait]
impl ChatSession for GeminiChat {
    async fn send_message(&mut self, parts: Vec<Part>) -> GeminiResult<GenerateContentResponse> {
        let outgoing = Content::user(parts);
        let mut contents = self.history.clone();
        contents.push(outgoing.clone());

        let request = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.clone(),
            tools: self.tools.clone(),
        };

        let response = self.client.generate_content(&request).await?;

        self.history.push(outgoing);
        if let Some(reply) = response.model_content() {
            self.history.push(reply);
        }
        debug!(turns = self.history.len(), "Chat history updated");

        Ok(response)
    }
}

impl ChatModel for GeminiClient {
    fn start_chat(&self, config: SessionConfig) -> Box<dyn ChatSession> {
        Box::new(GeminiChat::new(self.clone(), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExplorerConfig;
    use crate::types::FunctionDeclaration;
    use serde_json::json;

    fn client() -> GeminiClient {
        GeminiClient::new(&ExplorerConfig {
            api_key: Some("test".to_string()),
            ..ExplorerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_session_keeps_seeded_history() {
        let history = vec![
            Content::user(vec![Part::text("hello".to_string())]),
            Content::model(vec![Part::text("hi".to_string())]),
        ];
        let chat = GeminiChat::new(
            client(),
            SessionConfig {
                system_instruction: Some("be brief".to_string()),
                tools: vec![],
                history: history.clone(),
            },
        );

        assert_eq!(chat.history(), history.as_slice());
        assert!(chat.tools.is_none());
        let instruction = chat.system_instruction.unwrap();
        assert_eq!(instruction.parts[0].text.as_deref(), Some("be brief"));
        assert!(instruction.role.is_none());
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("random vn".to_string())])],
            system_instruction: None,
            tools: Some(vec![Tool {
                function_declarations: vec![FunctionDeclaration {
                    name: "queryVn".to_string(),
                    description: Some("vn lookup".to_string()),
                    parameters: json!({"type": "OBJECT"}),
                }],
            }]),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "random vn");
        assert_eq!(
            value["tools"][0]["function_declarations"][0]["name"],
            "queryVn"
        );
        assert!(value.get("system_instruction").is_none());
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
