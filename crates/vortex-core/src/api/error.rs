//! Error surface for API calls.

use thiserror::Error;

/// Errors surfaced by the auth and inventory API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response with the server-provided message when parsable.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No response from the server (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 401 that survived one refresh attempt; the session has been torn down.
    #[error("session expired")]
    SessionExpired,

    /// No session exists for an operation that needs one.
    #[error("not authenticated")]
    NotAuthenticated,

    /// 2xx response whose body did not match the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Local session storage failure.
    #[error("session store error: {0}")]
    Store(anyhow::Error),
}

impl ApiError {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            _ => None,
        }
    }
}

/// Extracts a human-readable message from an error response body.
///
/// Both backends wrap errors in JSON with a `message` field (the auth
/// service inside its response envelope, the application service via its
/// exception handler). Anything else falls back to the raw body.
pub(crate) fn message_from_body(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = json.get("message").and_then(serde_json::Value::as_str)
        && !message.is_empty()
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}
