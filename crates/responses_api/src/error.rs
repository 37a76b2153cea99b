//! Classification of transport, HTTP and body failures into [`ClassifiedError`].
//!
//! Structured signals (cancellation flag, `reqwest` error category, HTTP
//! status) decide the kind. Matching on message text is only a fallback for
//! errors that carry no structured category, and is best-effort.

use std::sync::OnceLock;

use chat_provider::{ClassifiedError, ErrorKind};
use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;

pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to server - please check if the server is running";
pub const CONNECTION_REFUSED_MESSAGE: &str = "Connection refused - server may be offline";
pub const TIMEOUT_MESSAGE: &str = "Request timed out - the server took too long to respond";
pub const INTERRUPTED_MESSAGE: &str = "Connection to the server was interrupted";
pub const NO_CONTENT_MESSAGE: &str = "No response received from server";
pub const UNKNOWN_SERVER_MESSAGE: &str = "Unknown server error";
pub const GENERIC_MESSAGE: &str = "An unknown error occurred while sending the request";

/// Classify a failure raised by the HTTP client.
pub fn classify_request_error(error: &reqwest::Error) -> ClassifiedError {
    if error.is_timeout() {
        return ClassifiedError::timeout(TIMEOUT_MESSAGE);
    }
    if error.is_connect() || error.is_request() {
        return ClassifiedError::network(UNREACHABLE_MESSAGE);
    }
    if error.is_body() || error.is_decode() {
        return ClassifiedError::network(INTERRUPTED_MESSAGE);
    }
    if error.is_builder() {
        return ClassifiedError::unknown(format!("invalid request: {error}"));
    }
    classify_message(&error.to_string())
}

/// Build the error for a non-success HTTP response.
///
/// A JSON body with `error.message` (or a bare string `error`) supplies the
/// message; any other JSON body yields a generic server message. Only a body
/// that is not JSON falls back to the status code and reason phrase.
pub fn classify_http_error(status: StatusCode, body: &str) -> ClassifiedError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(payload) => json_error_message(&payload)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| UNKNOWN_SERVER_MESSAGE.to_owned()),
        Err(_) => format!(
            "Server error ({}): {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
    };
    ClassifiedError::http(status.as_u16(), message)
}

fn json_error_message(payload: &Value) -> Option<&str> {
    payload
        .pointer("/error/message")
        .or_else(|| payload.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
}

/// Last-resort classification from free-form error text.
pub fn classify_message(message: &str) -> ClassifiedError {
    let message = message.trim();
    if message.is_empty() {
        return ClassifiedError::unknown(GENERIC_MESSAGE);
    }
    if connection_refused_regex().is_match(message) {
        return ClassifiedError::network(CONNECTION_REFUSED_MESSAGE);
    }
    if unreachable_regex().is_match(message) {
        return ClassifiedError::network(UNREACHABLE_MESSAGE);
    }
    if timeout_regex().is_match(message) {
        return ClassifiedError::timeout(TIMEOUT_MESSAGE);
    }
    ClassifiedError::new(ErrorKind::Unknown, message)
}

/// Error for a response that carried no assistant text.
pub fn no_content_error() -> ClassifiedError {
    ClassifiedError::parse(NO_CONTENT_MESSAGE)
}

/// Error for a non-streaming body that is not valid JSON.
pub fn invalid_body_error(error: &serde_json::Error) -> ClassifiedError {
    ClassifiedError::parse(format!("Failed to parse server response: {error}"))
}

fn connection_refused_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)econnrefused|connection.?refused")
            .expect("connection refused regex must compile")
    })
}

fn unreachable_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)failed to fetch|dns error|enotfound|network.?unreachable|host.?unreachable")
            .expect("unreachable regex must compile")
    })
}

fn timeout_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)etimedout|timed.?out").expect("timeout regex must compile")
    })
}
