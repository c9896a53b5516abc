//! Integration tests for the RillaBot library.
//! The live test requires an API key in the environment to run.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::Mutex;

    use rillabot::chat::{
        CHAT_PROMPT, ChatBackend, ChatConfig, ChatReply, ChatSession, TurnUsage, run_repl,
    };
    use rillabot::credential::KEY_PROMPT;
    use rillabot::{
        ApiValidator, ChatMessage, Credential, CredentialManager, CredentialStore,
        CredentialValidator, Error, FileCredentialStore, KnownModel, Model, PlainTextRenderer,
        Result, ScriptedInput, Validation,
    };

    struct ScriptedBackend {
        model: Model,
        replies: Mutex<VecDeque<Result<ChatReply>>>,
        sent: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<ChatReply>>) -> Self {
            Self {
                model: Model::Known(KnownModel::Gpt35Turbo),
                replies: Mutex::new(replies.into()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for ScriptedBackend {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn complete(&self, transcript: &[ChatMessage]) -> Result<ChatReply> {
            self.sent.lock().unwrap().push(transcript.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::unknown("no scripted reply left")))
        }
    }

    struct KeyListValidator {
        accepted: &'static str,
    }

    #[async_trait::async_trait]
    impl CredentialValidator for KeyListValidator {
        async fn validate(&self, credential: &Credential) -> Validation {
            if credential.expose() == self.accepted {
                Validation::Valid {
                    introduction: "Hi! I'm RillaBot, your personal sales assistant.".to_string(),
                }
            } else {
                Validation::Rejected {
                    message: "Incorrect API key provided".to_string(),
                }
            }
        }
    }

    fn reply(text: &str, tokens: u64, cost: f64) -> Result<ChatReply> {
        Ok(ChatReply {
            text: text.to_string(),
            usage: TurnUsage::new(tokens, cost),
        })
    }

    fn renderer() -> PlainTextRenderer<Vec<u8>> {
        PlainTextRenderer::with_writer(Vec::new(), false)
    }

    fn output(renderer: PlainTextRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn first_run_stores_the_accepted_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("openai_api_key.txt"));
        let manager = CredentialManager::new(store, KeyListValidator { accepted: "sk-good" });
        let mut input = ScriptedInput::new(["sk-bad", "sk-good"]);
        let mut out = renderer();

        let credential = manager.acquire(&mut input, &mut out).await.unwrap();

        assert_eq!(credential.expose(), "sk-good");
        assert_eq!(input.prompts(), [KEY_PROMPT, KEY_PROMPT]);
        assert_eq!(
            fs::read_to_string(manager.store().path()).unwrap(),
            "sk-good"
        );
        let text = output(out);
        assert!(text.contains("ERROR: API key is invalid"));
        assert!(text.ends_with("Hi! I'm RillaBot, your personal sales assistant.\n"));
    }

    #[tokio::test]
    async fn second_run_uses_the_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("openai_api_key.txt"));
        store.save(&Credential::new("sk-good").unwrap()).unwrap();
        let manager = CredentialManager::new(store, KeyListValidator { accepted: "sk-good" });
        let mut input = ScriptedInput::new(Vec::<String>::new());
        let mut out = renderer();

        manager.acquire(&mut input, &mut out).await.unwrap();

        assert!(input.prompts().is_empty());
    }

    #[tokio::test]
    async fn stale_key_is_left_in_place_until_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("openai_api_key.txt"));
        store.save(&Credential::new("sk-stale").unwrap()).unwrap();
        let manager = CredentialManager::new(store, KeyListValidator { accepted: "sk-good" });
        let mut input = ScriptedInput::new(["sk-bad"]);
        let mut out = renderer();

        let err = manager.acquire(&mut input, &mut out).await.unwrap_err();

        assert!(err.is_abort());
        assert_eq!(
            fs::read_to_string(manager.store().path()).unwrap(),
            "sk-stale"
        );
    }

    #[tokio::test]
    async fn conversation_usage_and_exit() {
        let backend = ScriptedBackend::new(vec![reply("Hi there!", 12, 0.0001)]);
        let mut session = ChatSession::with_backend(backend);
        let mut input = ScriptedInput::new(["Hello", "t", "x", "never read"]);
        let mut out = renderer();

        run_repl(&mut session, &mut input, &mut out).await.unwrap();

        assert_eq!(input.remaining(), 1);
        assert_eq!(input.prompts(), [CHAT_PROMPT, CHAT_PROMPT, CHAT_PROMPT]);
        assert_eq!(
            session.transcript(),
            [
                ChatMessage::user("Hello"),
                ChatMessage::assistant("Hi there!")
            ]
        );
        assert_eq!(
            output(out),
            "Hi there!\nTokens used: 12 tokens\nTotal cost: $0.0001\n"
        );
    }

    #[tokio::test]
    async fn clear_memory_then_report() {
        let backend = ScriptedBackend::new(vec![
            reply("Sure, here's a pitch.", 60, 0.0012),
            reply("Ask about their budget.", 40, 0.0008),
        ]);
        let mut session = ChatSession::with_backend(backend);
        let mut input = ScriptedInput::new(["Pitch me", "Next step?", "W", "w", " t "]);
        let mut out = renderer();

        run_repl(&mut session, &mut input, &mut out).await.unwrap();

        assert_eq!(session.message_count(), 0);
        assert_eq!(session.usage().total_tokens, 100);
        let text = output(out);
        assert!(text.contains("Memory cleared.\nMemory is already empty.\n"));
        assert!(text.ends_with("Tokens used: 100 tokens\nTotal cost: $0.0020\n"));
    }

    #[tokio::test]
    async fn blank_lines_are_not_sent() {
        let backend = ScriptedBackend::new(vec![reply("Hello!", 5, 0.0)]);
        let mut session = ChatSession::with_backend(backend);
        let mut input = ScriptedInput::new(["", "   ", "hi"]);
        let mut out = renderer();

        run_repl(&mut session, &mut input, &mut out).await.unwrap();

        assert_eq!(session.backend().calls(), 1);
        assert_eq!(output(out), "Hello!\n");
    }

    #[tokio::test]
    async fn failed_exchange_ends_the_loop() {
        let backend = ScriptedBackend::new(vec![Err(Error::service_unavailable(
            "overloaded",
            None,
        ))]);
        let mut session = ChatSession::with_backend(backend);
        let mut input = ScriptedInput::new(["Hello", "t"]);
        let mut out = renderer();

        let err = run_repl(&mut session, &mut input, &mut out)
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        assert_eq!(input.remaining(), 1);
        assert_eq!(session.message_count(), 0);
        assert!(output(out).is_empty());
    }

    #[tokio::test]
    async fn live_key_validation() {
        // This test requires OPENAI_API_KEY to be set
        let Some(credential) = std::env::var("OPENAI_API_KEY")
            .ok()
            .and_then(Credential::new)
        else {
            eprintln!("Skipping test: OPENAI_API_KEY not set");
            return;
        };

        let config = ChatConfig::new().with_max_tokens(60);
        let validator = ApiValidator::new(config);
        let validation = validator.validate(&credential).await;
        assert!(validation.is_valid(), "{validation:?}");

        let bogus = Credential::new("sk-definitely-not-a-real-key").unwrap();
        assert!(matches!(
            validator.validate(&bogus).await,
            Validation::Rejected { .. }
        ));
    }
}
