//! Logging trait for OpenAI client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows embedders to capture
//! every API interaction passing through the [`OpenAI`](crate::OpenAI) client.  No logger is
//! installed by default; the credential is never handed to a logger.

use crate::{ChatCompletion, Error};

/// A trait for logging OpenAI client operations.
///
/// # Example
///
/// ```rust,ignore
/// use rillabot::{ChatCompletion, ClientLogger, Error};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_response(&self, completion: &ChatCompletion) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{}", serde_json::to_string(completion).unwrap()).unwrap();
///     }
///
///     fn log_error(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "error: {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a complete response from a successful `send` call.
    fn log_response(&self, completion: &ChatCompletion);

    /// Log the error a failed `send` call is about to return.
    fn log_error(&self, error: &Error);
}
