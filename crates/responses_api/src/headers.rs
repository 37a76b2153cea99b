use std::collections::BTreeMap;

use crate::config::ResponsesConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

const DEFAULT_USER_AGENT: &str = concat!("responses_api/", env!("CARGO_PKG_VERSION"));

/// Build a deterministic header map for Responses API requests.
///
/// `streaming` selects the `accept` header: event stream for streamed
/// requests, JSON otherwise.
pub fn build_headers(config: &ResponsesConfig, streaming: bool) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(key) = config.bearer_key() {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {key}"));
    }
    headers.insert(
        HEADER_ACCEPT.to_owned(),
        if streaming {
            "text/event-stream"
        } else {
            "application/json"
        }
        .to_owned(),
    );
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua.to_owned());

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}
