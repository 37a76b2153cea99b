/// Base URL used when none is configured: a local OpenAI-compatible server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

const RESPONSES_PATH: &str = "/v1/responses";

/// Resolve a configured server address to its `/v1/responses` endpoint.
///
/// Callers may configure the bare server root (`http://host:8080`), the
/// versioned API root (`.../v1`) or the full endpoint; all three resolve to
/// the same URL. A blank address falls back to [`DEFAULT_BASE_URL`].
pub fn normalize_responses_url(input: &str) -> String {
    let base = match input.trim() {
        "" => DEFAULT_BASE_URL,
        configured => configured,
    }
    .trim_end_matches('/');

    if base.ends_with(RESPONSES_PATH) {
        base.to_owned()
    } else if let Some(root) = base.strip_suffix("/v1") {
        format!("{root}{RESPONSES_PATH}")
    } else {
        format!("{base}{RESPONSES_PATH}")
    }
}
