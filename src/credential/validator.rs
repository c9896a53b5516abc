//! Proving a key against the API.

use crate::chat::ChatConfig;
use crate::client::OpenAI;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::observability::{CREDENTIAL_REJECTIONS, CREDENTIAL_VALIDATIONS};
use crate::types::{ChatCompletionParams, ChatMessage};

/// The fixed request used to prove a key.  Its answer doubles as the start-up greeting.
pub const INTRODUCTION_PROBE: &str =
    "Very briefly introduce yourself as RillaBot, the personal AI-powered sales assistant";

/// Outcome of validating one key.
#[derive(Debug, Clone)]
pub enum Validation {
    /// The API accepted the key and answered the probe.
    Valid {
        /// The model's self-introduction.
        introduction: String,
    },

    /// The API rejected the key.
    Rejected {
        /// The API's explanation.
        message: String,
    },

    /// The key could not be checked; the error is fatal to the caller.
    TransportError(Error),
}

impl Validation {
    /// Classifies the result of the probe request.
    ///
    /// Only an authentication failure counts as a rejection; every other error is a transport
    /// error, whatever its cause.
    pub fn from_probe(result: Result<String>) -> Self {
        match result {
            Ok(introduction) => Validation::Valid { introduction },
            Err(Error::Authentication { message }) => Validation::Rejected { message },
            Err(err) => Validation::TransportError(err),
        }
    }

    /// Returns true for [`Validation::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

/// Decides whether a key is usable.
#[async_trait::async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validates `credential` with exactly one request.
    async fn validate(&self, credential: &Credential) -> Validation;
}

/// Validates keys by sending [`INTRODUCTION_PROBE`] with the session's model and endpoint.
#[derive(Debug, Clone)]
pub struct ApiValidator {
    config: ChatConfig,
}

impl ApiValidator {
    /// Creates a validator that probes with `config`'s model, endpoint and timeout.
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    async fn probe(&self, credential: &Credential) -> Result<String> {
        let client = OpenAI::with_options(
            credential.clone(),
            self.config.base_url.clone(),
            Some(self.config.timeout),
        )?;
        let params = ChatCompletionParams::new(
            self.config.model.clone(),
            vec![ChatMessage::user(INTRODUCTION_PROBE)],
        )
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature);
        let completion = client.send(params).await?;
        Ok(completion.text().unwrap_or_default().to_string())
    }
}

#[async_trait::async_trait]
impl CredentialValidator for ApiValidator {
    async fn validate(&self, credential: &Credential) -> Validation {
        CREDENTIAL_VALIDATIONS.click();
        let validation = Validation::from_probe(self.probe(credential).await);
        if let Validation::Rejected { .. } = validation {
            CREDENTIAL_REJECTIONS.click();
        }
        validation
    }
}
