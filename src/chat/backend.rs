//! The remote half of a conversation.
//!
//! [`ChatSession`](crate::chat::ChatSession) owns the transcript and the counters; a
//! [`ChatBackend`] only turns a transcript into one reply.  Tests substitute their own backend.

use crate::chat::config::ChatConfig;
use crate::client::OpenAI;
use crate::error::{Error, Result};
use crate::types::{ChatCompletionParams, ChatMessage, Model};

/// Tokens and dollars spent on one exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnUsage {
    /// Total tokens (prompt plus completion) reported by the API.
    pub tokens: u64,
    /// Cost in USD.
    pub cost: f64,
}

impl TurnUsage {
    /// Creates a usage record.
    pub fn new(tokens: u64, cost: f64) -> Self {
        Self { tokens, cost }
    }
}

/// A reply and what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// The assistant's text.
    pub text: String,
    /// Usage reported for the exchange.
    pub usage: TurnUsage,
}

/// Produces the next assistant turn for a transcript.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// The model replies are generated with.
    fn model(&self) -> &Model;

    /// Sends the whole transcript, oldest turn first, and returns the reply.
    async fn complete(&self, transcript: &[ChatMessage]) -> Result<ChatReply>;
}

/// Backend that sources its request parameters from a [`ChatConfig`].
#[derive(Debug, Clone)]
pub struct ConfigBackend {
    client: OpenAI,
    config: ChatConfig,
}

impl ConfigBackend {
    /// Creates a backend sending through `client`.
    pub fn new(client: OpenAI, config: ChatConfig) -> Self {
        Self { client, config }
    }

    fn params(&self, transcript: &[ChatMessage]) -> ChatCompletionParams {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        if let Some(system) = &self.config.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.extend_from_slice(transcript);
        ChatCompletionParams::new(self.config.model.clone(), messages)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature)
    }
}

#[async_trait::async_trait]
impl ChatBackend for ConfigBackend {
    fn model(&self) -> &Model {
        &self.config.model
    }

    async fn complete(&self, transcript: &[ChatMessage]) -> Result<ChatReply> {
        let completion = self.client.send(self.params(transcript)).await?;
        let usage = completion.usage();
        let text = completion
            .text()
            .ok_or_else(|| Error::unknown("the API returned a reply without text"))?
            .to_string();
        Ok(ChatReply {
            text,
            usage: TurnUsage::new(usage.total_tokens, self.config.model.cost(&usage)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::types::{ChatRole, KnownModel};

    fn backend(config: ChatConfig) -> ConfigBackend {
        let client = OpenAI::new(Credential::new("sk-test").unwrap()).unwrap();
        ConfigBackend::new(client, config)
    }

    #[test]
    fn params_carry_config() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gpt4o))
            .with_max_tokens(64)
            .with_temperature(Some(0.3));
        let params = backend(config).params(&[ChatMessage::user("Hello")]);
        assert_eq!(params.model, Model::Known(KnownModel::Gpt4o));
        assert_eq!(params.max_tokens, Some(64));
        assert_eq!(params.temperature, Some(0.3));
        assert_eq!(params.messages, vec![ChatMessage::user("Hello")]);
    }

    #[test]
    fn system_prompt_is_prepended() {
        let config = ChatConfig::new().with_system_prompt(Some("Sell well.".to_string()));
        let transcript = [ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
        let params = backend(config).params(&transcript);
        assert_eq!(params.messages.len(), 3);
        assert_eq!(params.messages[0].role, ChatRole::System);
        assert_eq!(params.messages[0].content, "Sell well.");
        assert_eq!(&params.messages[1..], &transcript);
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails() {
        let client = OpenAI::with_options(
            Credential::new("sk-test").unwrap(),
            Some("http://127.0.0.1:9/v1/".to_string()),
            None,
        )
        .unwrap();
        let backend = ConfigBackend::new(client, ChatConfig::new());
        assert!(backend.complete(&[ChatMessage::user("Hi")]).await.is_err());
    }
}
