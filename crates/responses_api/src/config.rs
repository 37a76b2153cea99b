use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::url::DEFAULT_BASE_URL;

pub const ENV_API_KEY: &str = "RESPONSES_API_KEY";
pub const ENV_BASE_URL: &str = "RESPONSES_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RESPONSES_API_TIMEOUT_SECS";

/// Transport configuration for Responses API requests.
///
/// The API key is looked up by the caller's configuration store and only read
/// here; nothing in this crate obtains or refreshes credentials.
#[derive(Debug, Clone)]
pub struct ResponsesConfig {
    /// Bearer credential; the `Authorization` header is omitted when unset.
    pub api_key: Option<String>,
    /// Base URL of the server exposing `/v1/responses`.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional whole-request timeout, reported as a timeout error.
    pub timeout: Option<Duration>,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl ResponsesConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `RESPONSES_API_KEY`, `RESPONSES_API_BASE_URL` and
    /// `RESPONSES_API_TIMEOUT_SECS`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: env_string_opt(ENV_API_KEY),
            ..Self::default()
        };
        if let Some(base_url) = env_string_opt(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.timeout = env_string_opt(ENV_TIMEOUT_SECS)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// API key with surrounding whitespace removed, if one is configured.
    pub fn bearer_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
