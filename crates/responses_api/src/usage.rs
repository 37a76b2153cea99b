use chat_provider::TimingsResult;
use serde::{Deserialize, Serialize};

/// Token usage block reported by the Responses API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub input_tokens_details: Option<InputTokensDetails>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: Option<u64>,
}

/// Map backend usage counters to caller timings. Missing counters are zero.
pub fn to_timings(usage: &Usage) -> TimingsResult {
    TimingsResult {
        prompt_n: usage.input_tokens.unwrap_or(0),
        predicted_n: usage.output_tokens.unwrap_or(0),
        cache_n: usage
            .input_tokens_details
            .and_then(|details| details.cached_tokens)
            .unwrap_or(0),
    }
}
