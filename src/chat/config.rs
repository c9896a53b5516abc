//! Configuration types for the assistant.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved configuration
//! shared by the credential validator and the chat session.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_TIMEOUT;
use crate::credential::DEFAULT_KEY_FILE;
use crate::error::{Error, Result};
use crate::types::{KnownModel, Model};

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Command-line arguments for the rillabot tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gpt-3.5-turbo)", "MODEL")]
    pub model: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "System prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 1024)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature, parsed when the configuration is resolved.
    #[arrrg(optional, "Sampling temperature between 0 and 2", "TEMP")]
    pub temperature: Option<String>,

    /// File holding the API key.
    #[arrrg(optional, "API key file (default: openai_api_key.txt)", "PATH")]
    pub key_file: Option<String>,

    /// Alternate API endpoint.
    #[arrrg(optional, "API base URL (default: https://api.openai.com/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Optional system prompt sent ahead of the transcript.  It is not part of the transcript
    /// and survives clearing memory.
    pub system_prompt: Option<String>,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Path of the plain-text API key slot.
    pub key_file: PathBuf,

    /// API base URL; `None` selects the public endpoint.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gpt-3.5-turbo
    /// - Max tokens: 1024
    /// - Color: enabled
    /// - Key file: openai_api_key.txt
    /// - Timeout: 60 seconds
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gpt35Turbo),
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            use_color: true,
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets or clears the system prompt.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the API key file.
    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = path.into();
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        let defaults = ChatConfig::new();

        let temperature = match args.temperature {
            Some(value) => Some(parse_f32_in_range(&value, 0.0, 2.0).map_err(|message| {
                Error::validation(
                    format!("--temperature {message}"),
                    Some("temperature".to_string()),
                )
            })?),
            None => None,
        };

        let max_tokens = args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(Error::validation(
                "--max-tokens must be positive",
                Some("max_tokens".to_string()),
            ));
        }

        let timeout = match args.timeout {
            Some(0) => {
                return Err(Error::validation(
                    "--timeout must be positive",
                    Some("timeout".to_string()),
                ));
            }
            Some(seconds) => Duration::from_secs(seconds),
            None => defaults.timeout,
        };

        Ok(ChatConfig {
            model: args.model.map(Model::from).unwrap_or(defaults.model),
            system_prompt: args.system.filter(|s| !s.trim().is_empty()),
            max_tokens,
            temperature,
            use_color: !args.no_color,
            key_file: args.key_file.map(PathBuf::from).unwrap_or(defaults.key_file),
            base_url: args.base_url,
            timeout,
        })
    }
}

fn parse_f32_in_range(value: &str, min: f32, max: f32) -> std::result::Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("expects a value between {min} and {max}"))?;
    if parsed.is_finite() && parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects a value between {min} and {max}"))
    }
}
