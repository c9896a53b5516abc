use serde::{Deserialize, Serialize};

/// Token counts reported for one chat completion.
///
/// OpenAI bills by tokens; the prompt and completion sides are priced separately, so both are
/// kept even though the session only accumulates the total.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the request (system prompt plus transcript).
    pub prompt_tokens: u64,

    /// Tokens in the generated reply.
    pub completion_tokens: u64,

    /// Sum of prompt and completion tokens as reported by the API.
    pub total_tokens: u64,
}

impl Usage {
    /// Create a new `Usage`; the total is derived from the two sides.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
