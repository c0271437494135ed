//! Scripted stand-ins for the model and data services.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use explorer_core::{
    Candidate, ChatModel, ChatSession, Content, FunctionCall, GeminiError, GeminiResult,
    GenerateContentResponse, Part, SessionConfig,
};
use explorer_vndb::{QueryBody, QueryResponse, VndbResult, VndbTransport};
use serde_json::Value;

#[derive(Default)]
struct ModelScript {
    responses: VecDeque<GeminiResult<GenerateContentResponse>>,
    sent: Vec<Vec<Part>>,
    configs: Vec<SessionConfig>,
}

/// Model whose sessions replay a fixed list of replies
#[derive(Clone, Default)]
pub(crate) struct ScriptedModel {
    script: Arc<Mutex<ModelScript>>,
}

impl ScriptedModel {
    pub(crate) fn new(responses: Vec<GeminiResult<GenerateContentResponse>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(ModelScript {
                responses: responses.into(),
                ..Default::default()
            })),
        }
    }

    /// Parts of every `send_message`, in order
    pub(crate) fn sent(&self) -> Vec<Vec<Part>> {
        self.script.lock().unwrap().sent.clone()
    }

    pub(crate) fn configs(&self) -> Vec<SessionConfig> {
        self.script.lock().unwrap().configs.clone()
    }
}

struct ScriptedSession {
    script: Arc<Mutex<ModelScript>>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send_message(&mut self, parts: Vec<Part>) -> GeminiResult<GenerateContentResponse> {
        let mut script = self.script.lock().unwrap();
        script.sent.push(parts);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(GeminiError::ApiError("script exhausted".to_string())))
    }
}

impl ChatModel for ScriptedModel {
    fn start_chat(&self, config: SessionConfig) -> Box<dyn ChatSession> {
        self.script.lock().unwrap().configs.push(config);
        Box::new(ScriptedSession {
            script: self.script.clone(),
        })
    }
}

fn response(parts: Vec<Part>, finish_reason: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content::model(parts)),
            finish_reason: Some(finish_reason.to_string()),
        }],
    }
}

pub(crate) fn text_response(text: &str) -> GenerateContentResponse {
    response(vec![Part::text(text.to_string())], "STOP")
}

pub(crate) fn calls_response(calls: Vec<(&str, Value)>) -> GenerateContentResponse {
    let parts = calls
        .into_iter()
        .map(|(name, arguments)| {
            Part::function_call(FunctionCall {
                name: name.to_string(),
                arguments,
            })
        })
        .collect();
    response(parts, "STOP")
}

pub(crate) fn blank_response(finish_reason: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: None,
            finish_reason: Some(finish_reason.to_string()),
        }],
    }
}

pub(crate) fn busy() -> GeminiResult<GenerateContentResponse> {
    Err(GeminiError::HttpError {
        status_code: 503,
        message: "API request failed: The model is overloaded.".to_string(),
    })
}

/// Data service replaying fixed responses and recording requests
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<VndbResult<QueryResponse>>>,
    requests: Mutex<Vec<(String, QueryBody)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<VndbResult<QueryResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<(String, QueryBody)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VndbTransport for ScriptedTransport {
    async fn post_query(&self, endpoint: &str, body: &QueryBody) -> VndbResult<QueryResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResponse::default()))
    }
}

pub(crate) fn rows(results: Vec<Value>) -> VndbResult<QueryResponse> {
    Ok(QueryResponse {
        results,
        count: None,
    })
}
