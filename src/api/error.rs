//! Unified client error handling for NeuroFleetX.
//!
//! Every failure a screen can hit is one of three kinds: a validation error
//! caught before any request, a transport/server error carrying whatever
//! message the backend sent, or an authorization gap (401/403) that must send
//! the user back to login. The backend answers errors either as plain text or
//! as a JSON envelope, so the message extraction below accepts both.

use serde_json::Value;

/// Error classification for client failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Caught locally, no request issued
    Validation,
    NotPermitted,
    NotLoggedIn,

    // Client errors (4xx)
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,

    // Server / transport
    ServerError,
    Transport,
    Decode,
    Session,
}

impl ErrorCode {
    /// Classify an HTTP status code returned by the backend
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            400..=499 => ErrorCode::BadRequest,
            _ => ErrorCode::ServerError,
        }
    }

    /// Get the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "validation_error",
            ErrorCode::NotPermitted => "not_permitted",
            ErrorCode::NotLoggedIn => "not_logged_in",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::ServerError => "server_error",
            ErrorCode::Transport => "transport_error",
            ErrorCode::Decode => "decode_error",
            ErrorCode::Session => "session_error",
        }
    }
}

/// Unified client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Form input rejected before any request
    #[error("{0}")]
    Validation(String),

    /// The session's role may not perform this action
    #[error("{0}")]
    NotPermitted(String),

    #[error("Not logged in")]
    NotLoggedIn,

    /// Non-success HTTP response
    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Http { status: u16, message: Option<String> },

    /// Connection, TLS or timeout failure
    #[error("Failed to reach server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Local session storage could not be read or written
    #[error("Session storage error: {0}")]
    Session(String),
}

impl ClientError {
    /// Build an error from a non-success response's status and body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        tracing::debug!(status, message = ?message, "API request failed");
        ClientError::Http { status, message }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Validation(_) => ErrorCode::Validation,
            ClientError::NotPermitted(_) => ErrorCode::NotPermitted,
            ClientError::NotLoggedIn => ErrorCode::NotLoggedIn,
            ClientError::Http { status, .. } => ErrorCode::from_status(*status),
            ClientError::Transport(_) => ErrorCode::Transport,
            ClientError::Decode(_) => ErrorCode::Decode,
            ClientError::Session(_) => ErrorCode::Session,
        }
    }

    /// 401 and 403 both mean "not authorized": the session is no longer usable
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::Unauthorized | ErrorCode::Forbidden | ErrorCode::NotLoggedIn
        )
    }

    /// Message the server sent, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: local errors verbatim, the server's message when
    /// it sent one, otherwise the screen's fallback
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::NotPermitted(msg) => msg.clone(),
            ClientError::Http {
                message: Some(msg), ..
            } => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Server message if present, else the error's own description
    pub fn detail(&self) -> String {
        match self.server_message() {
            Some(msg) => msg.to_string(),
            None => self.to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts a JSON string, an object with `message` or `error` (string or
/// nested `{ "message": .. }`), or falls back to the raw text.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => non_empty(&s),
        Ok(Value::Object(map)) => {
            let nested = |key: &str| match map.get(key) {
                Some(Value::String(s)) => non_empty(s),
                Some(Value::Object(inner)) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .and_then(non_empty),
                _ => None,
            };
            nested("message")
                .or_else(|| nested("error"))
                .or_else(|| Some(body.to_string()))
        }
        _ => Some(body.to_string()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
