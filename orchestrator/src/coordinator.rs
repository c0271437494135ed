//! Conversation Orchestrator: drives one user submission through the
//! tool-calling loop until the model produces a final answer.
//!
//! Flow of a run:
//!   1. Seed a session with the prior transcript, the system instruction and
//!      every tool declaration, then send the user turn.
//!   2. While the model asks for tools, execute the calls one at a time in
//!      the order received and send the whole batch of responses back.
//!   3. Blank turns get a bounded number of corrective prompts before the
//!      run ends with a canned apology.
//!
//! Only a busy or broken model service ends a run with an error. Bad tool
//! arguments and data service failures are folded back into the
//! conversation so the model can correct itself.

use chrono::Local;
use explorer_core::{ChatSession, FunctionCall, GenerateContentResponse, Part, SessionConfig};
use explorer_vndb::{sanitize_fields, EntityKind, FieldCheck, QueryArgs, ToolResult, MAX_PAGE_SIZE};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::context::ExplorerContext;
use crate::errors::ConversationError;
use crate::events::EventSink;
use crate::prompt::{system_instruction, EMPTY_RESPONSE_APOLOGY, EMPTY_RESPONSE_NUDGE};
use crate::retry::send_with_retry;
use crate::transcript::{PendingTurn, Transcript, Turn};

const FIELDS_REJECTED: &str =
    "The API call was cancelled because all requested fields were invalid.";

const LIMIT_NOTE: &str = "Note: The query returned 100 results, which is the default limit. \
     There might be more results available.";

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The model produced a final answer
    Answered,
    /// The model kept returning blank turns; the text is the canned apology
    GaveUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Text of the committed model turn
    pub text: String,
    pub completion: Completion,
    /// Error-free records forwarded to the UI during the run
    pub records_retrieved: usize,
}

/// Runs one user submission to completion.
///
/// The user turn and the resulting model turn are appended to `transcript`.
/// Progress is streamed through `events` while the run is in flight. On a
/// terminal failure the model turn carries a short user-facing message and
/// the error is returned. A turn with no content is refused before anything
/// is recorded or sent.
pub async fn run_conversation(
    ctx: &ExplorerContext,
    transcript: &mut Transcript,
    user_turn: Turn,
    events: &EventSink,
) -> Result<RunOutcome, ConversationError> {
    if user_turn.is_empty() {
        warn!("Refusing to send an empty user turn");
        return Err(ConversationError::EmptyMessage);
    }

    let history = transcript.history();
    let today = Local::now().format("%Y-%m-%d").to_string();
    let instruction = system_instruction(&today, user_turn.has_attachment());
    let message = user_turn.gemini_parts();
    transcript.push(user_turn);

    let mut session = ctx.model.start_chat(SessionConfig {
        system_instruction: Some(instruction),
        tools: ctx.registry.tool_declarations(),
        history,
    });
    let mut turn = PendingTurn::new(events.clone());

    match drive(ctx, session.as_mut(), message, &mut turn).await {
        Ok(outcome) => {
            info!(
                completion = ?outcome.completion,
                records = outcome.records_retrieved,
                "Conversation turn finished"
            );
            transcript.push(turn.commit(&outcome.text));
            Ok(outcome)
        }
        Err(e) => {
            error!(error = %e, "Conversation turn failed");
            transcript.push(turn.commit(e.user_message()));
            Err(e)
        }
    }
}

async fn drive(
    ctx: &ExplorerContext,
    session: &mut dyn ChatSession,
    message: Vec<Part>,
    turn: &mut PendingTurn,
) -> Result<RunOutcome, ConversationError> {
    let settings = &ctx.settings;
    let mut response = send_with_retry(session, message, settings, turn).await?;
    let mut empty_retries = 0;
    let mut records_retrieved = 0;

    loop {
        let calls = response.function_calls();
        if !calls.is_empty() {
            empty_retries = 0;
            let mut replies = Vec::with_capacity(calls.len());
            for call in &calls {
                let (reply, fetched) = dispatch(ctx, call, turn).await;
                records_retrieved += fetched;
                replies.push(reply);
            }
            response = send_with_retry(session, replies, settings, turn).await?;
            continue;
        }

        let text = response.text();
        let text = text.trim();
        if !text.is_empty() {
            return Ok(RunOutcome {
                text: text.to_string(),
                completion: Completion::Answered,
                records_retrieved,
            });
        }

        if empty_retries >= settings.max_empty_retries {
            warn!(retries = empty_retries, "Giving up on empty model responses");
            turn.log(format!(
                "Model failed to provide a response after {} retries. Ending conversation.",
                settings.max_empty_retries
            ));
            return Ok(RunOutcome {
                text: EMPTY_RESPONSE_APOLOGY.to_string(),
                completion: Completion::GaveUp,
                records_retrieved,
            });
        }

        empty_retries += 1;
        log_empty_response(&response, empty_retries, settings.max_empty_retries, turn);
        let nudge = vec![Part::text(EMPTY_RESPONSE_NUDGE.to_string())];
        response = send_with_retry(session, nudge, settings, turn).await?;
    }
}

fn log_empty_response(
    response: &GenerateContentResponse,
    attempt: u32,
    max: u32,
    turn: &mut PendingTurn,
) {
    let reason = response.finish_reason();
    warn!(finish_reason = reason, attempt, "Empty model response");
    turn.log(format!(
        "Model returned an empty response (Reason: `{}`). Retrying for a summary... ({}/{})",
        reason, attempt, max
    ));
}

/// Executes one tool call. Returns the function response for the model and
/// the number of records forwarded to the UI.
async fn dispatch(ctx: &ExplorerContext, call: &FunctionCall, turn: &mut PendingTurn) -> (Part, usize) {
    let name = call.name.as_str();
    let Some(kind) = EntityKind::from_tool_name(name) else {
        warn!(tool = name, "Model requested an unknown tool");
        turn.log(format!("Unknown tool `{}` requested. Skipping.", name));
        let result = ToolResult::error(format!("Unknown tool: {}", name));
        return (tool_reply(name, &result, None), 0);
    };

    turn.log(describe_call(call));
    debug!(tool = name, args = %call.arguments, "Calling tool");

    let mut args = match QueryArgs::from_value(&call.arguments) {
        Ok(args) => args,
        Err(e) => {
            let result = ToolResult::error(e.to_string());
            turn.log(format!("Tool `{}` encountered an error: {}", name, e));
            return (tool_reply(name, &result, None), 0);
        }
    };

    let mut notes = Vec::new();
    if let Some(raw) = &args.fields {
        let check = sanitize_fields(&ctx.registry, name, raw);
        if let Some(note) = check.note() {
            turn.log(note);
        }
        match check {
            FieldCheck::Accepted { fields } => args.fields = Some(fields),
            FieldCheck::Trimmed { fields, note, .. } => {
                args.fields = Some(fields);
                notes.push(note);
            }
            FieldCheck::Rejected { note, .. } => {
                let result = ToolResult::error(FIELDS_REJECTED);
                return (tool_reply(name, &result, Some(note)), 0);
            }
        }
    }

    let result = ctx.vndb.query(kind, &args).await;
    let valid = result.valid_records();
    let fetched = valid.len();
    let limit_reached = fetched == MAX_PAGE_SIZE as usize && args.results.is_none();

    let mut summary = match result.total_count {
        Some(total) => format!(
            "Tool `{}` completed. Found {} total matches. Fetched {} item(s).",
            name, total, fetched
        ),
        None => format!("Tool `{}` completed. Found {} result(s).", name, fetched),
    };
    if result.total_count.is_none() && limit_reached {
        summary.push_str(" (default limit reached)");
    }
    turn.log(summary);

    let errors = result.errors();
    if !errors.is_empty() {
        turn.log(format!(
            "Tool `{}` encountered an error: {}",
            name,
            errors.join(", ")
        ));
    }

    if !valid.is_empty() {
        turn.events().data_retrieved(valid);
    }

    if limit_reached {
        notes.push(LIMIT_NOTE.to_string());
    }
    let note = (!notes.is_empty()).then(|| notes.join(" "));
    (tool_reply(name, &result, note), fetched)
}

/// `Calling tool: `queryVn` with filters: `[...]``, filters compacted when
/// they parse as JSON
fn describe_call(call: &FunctionCall) -> String {
    let mut line = format!("Calling tool: `{}`", call.name);
    let filters = match call.arguments.get("filters") {
        Some(Value::String(raw)) if raw.is_empty() => None,
        Some(Value::String(raw)) => Some(
            serde_json::from_str::<Value>(raw)
                .map(|parsed| parsed.to_string())
                .unwrap_or_else(|_| raw.clone()),
        ),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    if let Some(filters) = filters {
        line.push_str(&format!(" with filters: `{}`", filters));
    }
    line
}

fn tool_reply(name: &str, result: &ToolResult, note: Option<String>) -> Part {
    let mut response = json!({ "result": result });
    if let Some(note) = note {
        response["note"] = Value::String(note);
    }
    Part::function_response(name.to_string(), response)
}
