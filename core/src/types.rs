use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Function call from LLM response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(rename = "args", default)]
    pub arguments: Value,
}

/// Function response to send back to LLM
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

/// Base64 payload carried inline in a request part
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// Request to Gemini API to generate content
#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// Tool definition for Gemini API
#[derive(Serialize, Debug, Clone)]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// Function declaration for Gemini API
#[derive(Serialize, Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
}

/// Content structure for requests and responses
#[derive(Serialize, Clone, Debug, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            parts,
            role: Some("user".to_string()),
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            parts,
            role: Some("model".to_string()),
        }
    }
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug, Deserialize, Default, PartialEq)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(rename = "functionResponse", skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Opaque reasoning token; must be replayed with the part it came on
    #[serde(rename = "thoughtSignature", skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Default::default()
        }
    }

    pub fn inline_data(mime_type: String, data: String) -> Self {
        Self {
            inline_data: Some(InlineData { mime_type, data }),
            ..Default::default()
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            function_call: Some(call),
            ..Default::default()
        }
    }

    pub fn function_response(name: String, response: Value) -> Self {
        Self {
            function_response: Some(FunctionResponse { name, response }),
            ..Default::default()
        }
    }
}

/// Response from Gemini API
#[derive(Deserialize, Debug, Serialize, Default, Clone)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug, Serialize, Default, Clone)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// All function calls of the first candidate, in the order the model emitted them
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.first_parts()
            .iter()
            .filter_map(|part| part.function_call.clone())
            .collect()
    }

    /// Concatenated text of the first candidate. Empty when the model sent none.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }

    pub fn finish_reason(&self) -> &str {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
            .unwrap_or("UNKNOWN")
    }

    /// The model's turn as it should be replayed in later requests
    pub fn model_content(&self) -> Option<Content> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(Content::model(content.parts.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_function_call_response() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "queryVn", "args": {"fields": "title"}}},
                        {"functionCall": {"name": "queryTag", "args": {"fields": "name"}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let calls = response.function_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "queryVn");
        assert_eq!(calls[0].arguments, json!({"fields": "title"}));
        assert_eq!(calls[1].name, "queryTag");
        assert_eq!(response.text(), "");
        assert_eq!(response.finish_reason(), "STOP");
    }

    #[test]
    fn test_blocked_response_has_no_content() {
        let raw = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert!(response.function_calls().is_empty());
        assert_eq!(response.text(), "");
        assert_eq!(response.finish_reason(), "SAFETY");
        assert!(response.model_content().is_none());

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.finish_reason(), "UNKNOWN");
    }

    #[test]
    fn test_text_parts_are_joined() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Steins;Gate "}, {"text": "is v2002."}]}
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.text(), "Steins;Gate is v2002.");
    }

    #[test]
    fn test_inline_data_serializes_camel_case() {
        let part = Part::inline_data("image/png".to_string(), "AAAA".to_string());
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            json!({"inlineData": {"mimeType": "image/png", "data": "AAAA"}})
        );
    }

    #[test]
    fn test_thought_signature_survives_replay() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {"name": "queryVn", "args": {"random": true}},
                        "thoughtSignature": "c2lnbmF0dXJl"
                    }]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let replayed = response.model_content().unwrap();
        assert_eq!(replayed.parts[0].thought_signature.as_deref(), Some("c2lnbmF0dXJl"));
        let value = serde_json::to_value(&replayed).unwrap();
        assert_eq!(value["parts"][0]["thoughtSignature"], "c2lnbmF0dXJl");
        assert_eq!(value["parts"][0]["functionCall"]["name"], "queryVn");

        let plain = serde_json::to_value(Part::text("hi".to_string())).unwrap();
        assert!(plain.get("thoughtSignature").is_none());
    }
}
