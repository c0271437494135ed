use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API Error: {0}")]
    ApiError(String),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

}

/// Markers the Gemini API uses for rate limiting and overload.
const RATE_LIMIT_MARKERS: &[&str] = &["429", "RESOURCE_EXHAUSTED"];
const OVERLOAD_MARKERS: &[&str] = &["503", "overloaded", "UNAVAILABLE"];

impl GeminiError {
    /// True for rate-limit and overload failures, which are worth retrying
    /// after a pause. Everything else fails the same way on a second try.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::HttpError { status_code, .. } if matches!(*status_code, 429 | 503) => {
                true
            }
            other => {
                let message = other.to_string();
                RATE_LIMIT_MARKERS
                    .iter()
                    .chain(OVERLOAD_MARKERS)
                    .any(|marker| message.contains(marker))
            }
        }
    }

    /// True when the service explicitly reported a quota or rate limit.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GeminiError::HttpError { status_code: 429, .. } => true,
            other => {
                let message = other.to_string();
                RATE_LIMIT_MARKERS.iter().any(|marker| message.contains(marker))
            }
        }
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_classification() {
        let busy = GeminiError::HttpError {
            status_code: 503,
            message: "The model is overloaded".to_string(),
        };
        assert!(busy.is_retryable());
        assert!(!busy.is_rate_limited());

        let limited = GeminiError::HttpError {
            status_code: 429,
            message: "quota".to_string(),
        };
        assert!(limited.is_retryable());
        assert!(limited.is_rate_limited());

        let bad_request = GeminiError::HttpError {
            status_code: 400,
            message: "Invalid JSON payload".to_string(),
        };
        assert!(!bad_request.is_retryable());
        assert!(!bad_request.is_rate_limited());
    }

    #[test]
    fn test_message_markers() {
        let err = GeminiError::ApiError("RESOURCE_EXHAUSTED: try later".to_string());
        assert!(err.is_retryable());
        assert!(err.is_rate_limited());

        let err = GeminiError::RequestError("service UNAVAILABLE".to_string());
        assert!(err.is_retryable());
        assert!(!err.is_rate_limited());

        let err = GeminiError::ParsingError("missing field `candidates`".to_string());
        assert!(!err.is_retryable());
    }
}
