//! API key lifecycle.
//!
//! The key lives in a plain-text slot on disk.  At start-up the [`CredentialManager`] loads it,
//! asks the user for one when the slot is empty, proves it against the API with a short probe
//! and writes the accepted key back.  The components are:
//!
//! - [`store`]: reading and writing the persistent slot
//! - [`validator`]: classifying a key as valid, rejected or unverifiable
//! - [`manager`]: the prompt/validate/persist loop

use std::fmt;

pub mod manager;
pub mod store;
pub mod validator;

pub use manager::{CredentialManager, KEY_PROMPT};
pub use store::{CredentialStore, DEFAULT_KEY_FILE, FileCredentialStore};
pub use validator::{ApiValidator, CredentialValidator, INTRODUCTION_PROBE, Validation};

/// An API key.
///
/// Never blank: surrounding whitespace is stripped and an empty value means "no key".  The
/// value is only reachable through [`Credential::expose`]; `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps `value`, or returns `None` if it is blank.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(Self(value))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The secret itself.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
