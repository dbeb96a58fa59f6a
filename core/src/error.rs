//! Error types for the todo client.
//!
//! # Design
//! `ApiError` covers every way a request to the remote resource can fail.
//! The controller treats all of its variants alike and maps each failed
//! operation to one banner message. The variants exist for logging.
//! `ValidationError` is local input rejection and never reaches the network.

use std::fmt;

/// Errors returned by `TodoClient` parse methods and `Transport`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, I/O).
    Transport(String),

    /// The server answered with a non-2xx status.
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    Decode(String),

    /// The request payload could not be serialized to JSON.
    Encode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
            ApiError::Status { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Decode(msg) => write!(f, "deserialization failed: {msg}"),
            ApiError::Encode(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Input rejected before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty once surrounding whitespace is removed.
    EmptyTitle,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and reject it if nothing is left.
pub fn validate_title(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed)
}
