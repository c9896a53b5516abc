use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, ChatRole, Model, Usage};

/// Parameters for a `POST /chat/completions` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The model that generates the reply.
    pub model: Model,

    /// The conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature between 0 and 2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionParams {
    /// Create new parameters for the given model and messages.
    pub fn new(model: Model, messages: Vec<ChatMessage>) -> Self {
        Self {
            model,
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A generated message inside a [`Choice`].
///
/// Unlike [`ChatMessage`] the content may be absent, e.g. when the model answered with a
/// refusal or a function call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseMessage {
    /// Always `assistant` for chat completions.
    pub role: ChatRole,

    /// The generated text.
    #[serde(default)]
    pub content: Option<String>,
}

/// One candidate reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    /// Position among the returned choices.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ResponseMessage,

    /// Why generation stopped (`stop`, `length`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Unique identifier for the completion.
    pub id: String,

    /// The model that produced the reply, as reported by the API.
    pub model: String,

    /// Candidate replies; RillaBot only ever requests one.
    pub choices: Vec<Choice>,

    /// Token accounting for this call.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// Text of the first choice, if the model produced any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }

    /// Reported usage, or zero when the API omitted it.
    pub fn usage(&self) -> Usage {
        self.usage.unwrap_or_default()
    }
}
