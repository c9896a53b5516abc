//! The interactive sales-assistant conversation.
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`backend`]: the seam between a session and the chat completions API
//! - [`session`]: transcript, usage totals and command dispatch
//! - [`commands`]: single-letter command parsing and the usage report
//! - [`repl`]: the console loop

mod backend;
mod commands;
mod config;
mod repl;
mod session;

pub use backend::{ChatBackend, ChatReply, ConfigBackend, TurnUsage};
pub use commands::{
    CLEAR_COMMAND, EXIT_COMMAND, SessionCommand, USAGE_COMMAND, format_usage, help_text,
    parse_command,
};
pub use config::{ChatArgs, ChatConfig};
pub use repl::{CHAT_PROMPT, run_repl};
pub use session::{Action, ChatSession, UsageCounters};
