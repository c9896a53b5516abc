//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript and the running
//! usage totals, and dispatches classified input lines.

use crate::chat::backend::{ChatBackend, ConfigBackend, TurnUsage};
use crate::chat::commands::{SessionCommand, format_usage, parse_command};
use crate::chat::config::ChatConfig;
use crate::client::OpenAI;
use crate::error::Result;
use crate::observability::{
    SESSION_MEMORY_CLEARS, SESSION_TOKENS, SESSION_TURN_ERRORS, SESSION_TURNS,
};
use crate::types::{ChatMessage, Model};

/// Running totals for the current process.
///
/// Only completed exchanges are counted.  Clearing memory leaves the totals alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageCounters {
    /// Tokens reported by the API across all exchanges.
    pub total_tokens: u64,
    /// Dollars spent across all exchanges.
    pub total_cost: f64,
    /// Number of completed exchanges.
    pub turns: u64,
}

impl UsageCounters {
    /// Adds one exchange.
    pub fn record(&mut self, usage: TurnUsage) {
        self.total_tokens = self.total_tokens.saturating_add(usage.tokens);
        self.total_cost += usage.cost;
        self.turns += 1;
    }

    /// The usage report for these totals.
    pub fn report(&self) -> String {
        format_usage(self.total_tokens, self.total_cost)
    }
}

/// What the caller should do after a line was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// End the session.
    Exit,

    /// Memory was cleared; `performed` is false when there was nothing to forget.
    ClearMemory {
        /// Whether the transcript held anything.
        performed: bool,
    },

    /// A snapshot of the usage totals.
    ReportUsage {
        /// Total tokens so far.
        tokens: u64,
        /// Total cost so far.
        cost: f64,
    },

    /// A chat turn to pass to [`ChatSession::respond`].
    Forward(String),
}

/// A chat session that manages conversation state and API interactions.
pub struct ChatSession<B: ChatBackend = ConfigBackend> {
    backend: B,
    messages: Vec<ChatMessage>,
    usage: UsageCounters,
}

impl ChatSession<ConfigBackend> {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: OpenAI, config: ChatConfig) -> Self {
        Self::with_backend(ConfigBackend::new(client, config))
    }
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new chat session with a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            usage: UsageCounters::default(),
        }
    }

    /// Sends a user turn along with the whole conversation and returns the reply.
    ///
    /// The user turn and the reply are appended to the transcript and the reported usage is
    /// added to the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.  The transcript and the totals are then
    /// exactly as they were before the call.
    pub async fn respond(&mut self, user_input: &str) -> Result<String> {
        let previous_len = self.messages.len();
        self.messages.push(ChatMessage::user(user_input));

        match self.backend.complete(&self.messages).await {
            Ok(reply) => {
                SESSION_TURNS.click();
                SESSION_TOKENS.count(reply.usage.tokens);
                self.usage.record(reply.usage);
                self.messages.push(ChatMessage::assistant(reply.text.clone()));
                Ok(reply.text)
            }
            Err(err) => {
                SESSION_TURN_ERRORS.click();
                self.messages.truncate(previous_len);
                Err(err)
            }
        }
    }

    /// Forgets the conversation.  Returns whether there was anything to forget.
    pub fn clear_memory(&mut self) -> bool {
        let performed = !self.messages.is_empty();
        self.messages.clear();
        SESSION_MEMORY_CLEARS.click();
        performed
    }

    /// Classifies `line` and carries out the local commands.
    ///
    /// Chat turns are handed back as [`Action::Forward`]; the caller decides when to
    /// [`respond`](Self::respond).
    pub fn dispatch(&mut self, line: &str) -> Action {
        match parse_command(line) {
            SessionCommand::Exit => Action::Exit,
            SessionCommand::ClearMemory => Action::ClearMemory {
                performed: self.clear_memory(),
            },
            SessionCommand::ReportUsage => Action::ReportUsage {
                tokens: self.usage.total_tokens,
                cost: self.usage.total_cost,
            },
            SessionCommand::ChatTurn(text) => Action::Forward(text),
        }
    }

    /// Returns the running totals.
    pub fn usage(&self) -> &UsageCounters {
        &self.usage
    }

    /// Returns the conversation so far, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        self.backend.model()
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::chat::backend::ChatReply;
    use crate::credential::Credential;
    use crate::error::Error;
    use crate::types::{ChatRole, KnownModel};

    /// Replays canned replies and records every transcript it was sent.
    struct CannedBackend {
        model: Model,
        replies: Mutex<VecDeque<Result<ChatReply>>>,
        sent: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl CannedBackend {
        fn new(replies: Vec<Result<ChatReply>>) -> Self {
            Self {
                model: Model::Known(KnownModel::Gpt35Turbo),
                replies: Mutex::new(replies.into()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for CannedBackend {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn complete(&self, transcript: &[ChatMessage]) -> Result<ChatReply> {
            self.sent.lock().unwrap().push(transcript.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::unknown("no canned reply left")))
        }
    }

    fn reply(text: &str, tokens: u64, cost: f64) -> Result<ChatReply> {
        Ok(ChatReply {
            text: text.to_string(),
            usage: TurnUsage::new(tokens, cost),
        })
    }

    #[test]
    fn new_session_empty() {
        let client = OpenAI::new(Credential::new("sk-test").unwrap()).unwrap();
        let session = ChatSession::new(client, ChatConfig::default());
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.usage(), &UsageCounters::default());
        assert_eq!(session.model(), &Model::Known(KnownModel::Gpt35Turbo));
    }

    #[tokio::test]
    async fn hello_exchange() {
        let mut session =
            ChatSession::with_backend(CannedBackend::new(vec![reply("Hi there!", 12, 0.0001)]));

        let text = session.respond("Hello").await.unwrap();

        assert_eq!(text, "Hi there!");
        assert_eq!(
            session.backend().sent.lock().unwrap().as_slice(),
            [vec![ChatMessage::user("Hello")]]
        );
        assert_eq!(
            session.transcript(),
            [ChatMessage::user("Hello"), ChatMessage::assistant("Hi there!")]
        );
        assert_eq!(session.usage().total_tokens, 12);
        assert_eq!(session.usage().total_cost, 0.0001);
        assert_eq!(session.usage().turns, 1);
    }

    #[tokio::test]
    async fn full_transcript_is_sent_every_turn() {
        let mut session = ChatSession::with_backend(CannedBackend::new(vec![
            reply("One", 10, 0.001),
            reply("Two", 20, 0.002),
        ]));

        session.respond("first").await.unwrap();
        session.respond("second").await.unwrap();

        let sent = session.backend().sent.lock().unwrap().clone();
        assert_eq!(sent[1].len(), 3);
        assert_eq!(sent[1][0], ChatMessage::user("first"));
        assert_eq!(sent[1][1].role, ChatRole::Assistant);
        assert_eq!(sent[1][2], ChatMessage::user("second"));
    }

    #[tokio::test]
    async fn counters_accumulate() {
        let usages = [(7, 0.0001), (12, 0.0003), (40, 0.0021)];
        let mut session = ChatSession::with_backend(CannedBackend::new(
            usages.iter().map(|&(t, c)| reply("ok", t, c)).collect(),
        ));

        for _ in usages {
            session.respond("again").await.unwrap();
        }

        let expected_cost: f64 = usages.iter().map(|&(_, c)| c).sum();
        assert_eq!(session.usage().total_tokens, 59);
        assert!((session.usage().total_cost - expected_cost).abs() < 1e-12);
        assert_eq!(session.usage().turns, 3);
        assert_eq!(session.message_count(), 6);
    }

    #[tokio::test]
    async fn failed_turn_rolls_back() {
        let mut session = ChatSession::with_backend(CannedBackend::new(vec![
            reply("Hi there!", 12, 0.0001),
            Err(Error::rate_limit("slow down", None)),
        ]));

        session.respond("Hello").await.unwrap();
        let err = session.respond("And now?").await.unwrap_err();

        assert!(err.is_rate_limit());
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.usage().total_tokens, 12);
        assert_eq!(session.usage().turns, 1);
    }

    #[tokio::test]
    async fn clear_memory_keeps_counters() {
        let mut session =
            ChatSession::with_backend(CannedBackend::new(vec![reply("Sure.", 100, 0.002)]));
        session.respond("Pitch me").await.unwrap();

        assert_eq!(
            session.dispatch("w"),
            Action::ClearMemory { performed: true }
        );
        assert_eq!(session.message_count(), 0);
        assert_eq!(
            session.dispatch("t"),
            Action::ReportUsage {
                tokens: 100,
                cost: 0.002
            }
        );
        let report = session.usage().report();
        assert!(report.contains("100 tokens"));
        assert!(report.contains("$0.0020"));
    }

    #[test]
    fn clearing_empty_memory() {
        let mut session = ChatSession::with_backend(CannedBackend::new(Vec::new()));
        assert!(!session.clear_memory());
        assert_eq!(
            session.dispatch(" W "),
            Action::ClearMemory { performed: false }
        );
    }

    #[test]
    fn dispatch_exit_and_forward() {
        let mut session = ChatSession::with_backend(CannedBackend::new(Vec::new()));
        assert_eq!(session.dispatch("X"), Action::Exit);
        assert_eq!(session.dispatch("xyz"), Action::Forward("xyz".to_string()));
        assert!(session.backend().sent.lock().unwrap().is_empty());
    }
}
