//! The prompt/validate/persist loop.

use crate::credential::{Credential, CredentialStore, CredentialValidator, Validation};
use crate::error::{Error, Result};
use crate::input::LineSource;
use crate::observability::CREDENTIAL_PROMPTS;
use crate::render::Renderer;

/// Prompt shown when asking the user for a key.
pub const KEY_PROMPT: &str = "Enter your OpenAI API key: ";

/// Obtains a key the API accepts.
pub struct CredentialManager<S: CredentialStore, V: CredentialValidator> {
    store: S,
    validator: V,
}

impl<S: CredentialStore, V: CredentialValidator> CredentialManager<S, V> {
    /// Creates a manager over the given slot and validator.
    pub fn new(store: S, validator: V) -> Self {
        Self { store, validator }
    }

    /// The slot keys are loaded from and saved to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a validated key, asking the user until one is accepted.
    ///
    /// The stored key is tried first.  After a rejection the user is always prompted; the
    /// rejected key is never retried and the slot is only written once a key is accepted.
    /// There is no bound on the number of attempts.
    ///
    /// # Errors
    ///
    /// Fails when the slot cannot be read or written, when input ends while prompting, and on
    /// any validation failure other than a rejected key.
    pub async fn acquire(
        &self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<Credential> {
        let mut candidate = self.store.load()?;
        if candidate.is_none() {
            renderer.print_info("No OpenAI API key is stored yet.");
        }

        loop {
            let credential = match candidate.take() {
                Some(credential) => credential,
                None => prompt_for_key(input)?,
            };

            match self.validator.validate(&credential).await {
                Validation::Valid { introduction } => {
                    renderer.print_reply(&introduction);
                    self.store.save(&credential)?;
                    return Ok(credential);
                }
                Validation::Rejected { .. } => {
                    renderer.print_error("API key is invalid");
                }
                Validation::TransportError(err) => return Err(err),
            }
        }
    }
}

fn prompt_for_key(input: &mut dyn LineSource) -> Result<Credential> {
    loop {
        CREDENTIAL_PROMPTS.click();
        match input.read_line(KEY_PROMPT)? {
            Some(line) => {
                if let Some(credential) = Credential::new(line) {
                    return Ok(credential);
                }
            }
            None => return Err(Error::abort("input closed before an API key was entered")),
        }
    }
}
