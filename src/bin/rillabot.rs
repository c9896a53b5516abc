//! Console sales assistant.
//!
//! # Usage
//!
//! ```bash
//! # Use the key stored in ./openai_api_key.txt, prompting for one if needed
//! rillabot
//!
//! # Pick a model and keep the key elsewhere
//! rillabot --model gpt-4o-mini --key-file ~/.config/rillabot/key
//!
//! # Disable colors (useful for piping output)
//! rillabot --no-color
//! ```
//!
//! # Commands
//!
//! - `x` - Exit
//! - `w` - Clear the conversation memory
//! - `t` - Show tokens used and total cost

use arrrg::CommandLine;
use rustyline::DefaultEditor;

use rillabot::chat::{ChatArgs, ChatConfig, ChatSession, help_text, run_repl};
use rillabot::{
    ApiValidator, CredentialManager, FileCredentialStore, MaskedEditor, OpenAI, PlainTextRenderer,
    Renderer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("rillabot [OPTIONS]");
    let config = ChatConfig::try_from(args)?;

    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    if let Err(err) = chat(config, &mut rl, &mut renderer).await {
        renderer.print_error(&err.to_string());
        std::process::exit(1);
    }
    Ok(())
}

async fn chat(
    config: ChatConfig,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) -> rillabot::Result<()> {
    let store = FileCredentialStore::new(config.key_file.clone());
    let manager = CredentialManager::new(store, ApiValidator::new(config.clone()));
    let mut key_input = MaskedEditor::new()?;
    let credential = manager.acquire(&mut key_input, renderer).await?;

    let client = OpenAI::with_options(credential, config.base_url.clone(), Some(config.timeout))?;
    let mut session = ChatSession::new(client, config);
    renderer.print_info(help_text());
    run_repl(&mut session, rl, renderer).await
}
