use explorer_core::{ChatSession, GenerateContentResponse, Part};
use tracing::{error, warn};

use crate::context::ConversationSettings;
use crate::errors::ConversationError;
use crate::transcript::PendingTurn;

/// Sends `parts`, retrying rate-limit and overload failures with
/// exponential backoff. Every retry is announced in the turn's activity log.
pub(crate) async fn send_with_retry(
    session: &mut dyn ChatSession,
    parts: Vec<Part>,
    settings: &ConversationSettings,
    turn: &mut PendingTurn,
) -> Result<GenerateContentResponse, ConversationError> {
    let max_attempts = settings.max_attempts.max(1);
    let mut attempt = 0;
    let mut delay = settings.initial_backoff;

    loop {
        match session.send_message(parts.clone()).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_retryable() => {
                attempt += 1;
                if attempt >= max_attempts {
                    error!(error = %e, attempts = attempt, "Max retries reached. Giving up.");
                    return Err(ConversationError::ServiceBusy {
                        attempts: attempt,
                        source: e,
                    });
                }

                warn!(error = %e, attempt, wait_ms = delay.as_millis() as u64, "Model busy, backing off");
                turn.log(format!(
                    "Model is busy. Retrying in {}s... (Attempt {}/{})",
                    delay.as_secs_f64(),
                    attempt,
                    max_attempts
                ));

                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                error!(error = %e, "Non-retryable error calling Gemini API");
                return Err(ConversationError::Model(e));
            }
        }
    }
}
