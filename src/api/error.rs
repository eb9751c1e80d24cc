//! Error types for the backend collaborators, and the policy that turns an error response
//! into a message a person can read.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`AuthApi`](super::AuthApi) and [`ActionsApi`](super::ActionsApi).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status. `message` is already extracted from the body.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be used.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: extract_error_message(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected the credentials carried by the request.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// Pick the most useful message out of an error response body.
///
/// In order of preference: a plain-text (or JSON string) body, then the `message`, `error`
/// and `title` fields, then every entry of an `errors` validation map joined with `", "`.
/// Falls back to `"Error <status>"`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let fallback = || format!("Error {status}");
    let body = body.trim();
    if body.is_empty() {
        return fallback();
    }

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        // Not JSON at all: the body is the message.
        Err(_) => return body.to_string(),
    };

    if let Value::String(s) = &value {
        return non_empty(s).unwrap_or_else(fallback);
    }
    let Some(fields) = value.as_object() else {
        return fallback();
    };

    for key in ["message", "error", "title"] {
        if let Some(text) = fields.get(key).and_then(Value::as_str).and_then(non_empty) {
            return text;
        }
    }

    if let Some(errors) = fields.get("errors") {
        let mut messages = Vec::new();
        flatten_messages(errors, &mut messages);
        if !messages.is_empty() {
            return messages.join(", ");
        }
    }

    fallback()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn flatten_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.extend(non_empty(s)),
        Value::Array(items) => items.iter().for_each(|v| flatten_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| flatten_messages(v, out)),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(_) | Value::Null => {}
    }
}
