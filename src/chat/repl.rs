//! The read-dispatch-print loop.

use crate::chat::backend::ChatBackend;
use crate::chat::commands::format_usage;
use crate::chat::session::{Action, ChatSession};
use crate::error::Result;
use crate::input::LineSource;
use crate::render::Renderer;

/// Prompt shown before every line of chat input.
pub const CHAT_PROMPT: &str = "> ";

/// Runs the conversation until the user exits or input ends.
///
/// Whitespace-only lines are skipped.  Replies are printed in the reply style.
///
/// # Errors
///
/// Any failed exchange ends the loop; the error is returned for the caller to report.
pub async fn run_repl<B: ChatBackend>(
    session: &mut ChatSession<B>,
    input: &mut dyn LineSource,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    while let Some(line) = input.read_line(CHAT_PROMPT)? {
        if line.trim().is_empty() {
            continue;
        }

        match session.dispatch(&line) {
            Action::Exit => break,
            Action::ClearMemory { performed: true } => renderer.print_info("Memory cleared."),
            Action::ClearMemory { performed: false } => {
                renderer.print_info("Memory is already empty.")
            }
            Action::ReportUsage { tokens, cost } => {
                renderer.print_info(&format_usage(tokens, cost))
            }
            Action::Forward(text) => {
                let reply = session.respond(&text).await?;
                renderer.print_reply(&reply);
            }
        }
    }
    Ok(())
}
