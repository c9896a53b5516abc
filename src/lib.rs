//! RillaBot: a console sales assistant backed by the OpenAI chat completions API.
//!
//! At start-up a [`CredentialManager`] produces a key the API accepts, then a
//! [`ChatSession`](chat::ChatSession) carries the conversation and its running cost.

// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod credential;
pub mod error;
pub mod input;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{DEFAULT_API_URL, DEFAULT_TIMEOUT, OpenAI};
pub use client_logger::ClientLogger;
pub use credential::{
    ApiValidator, Credential, CredentialManager, CredentialStore, CredentialValidator,
    FileCredentialStore, Validation,
};
pub use error::{Error, Result};
pub use input::{LineSource, MaskedEditor, ScriptedInput};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
