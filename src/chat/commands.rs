//! Single-letter session commands.
//!
//! A line that is exactly one of the command letters (ignoring case and surrounding
//! whitespace) controls the session instead of being sent to the model.  Every other line is
//! a chat turn and is forwarded verbatim.

/// Letter that ends the session.
pub const EXIT_COMMAND: &str = "x";
/// Letter that wipes the conversation memory.
pub const CLEAR_COMMAND: &str = "w";
/// Letter that reports tokens and cost so far.
pub const USAGE_COMMAND: &str = "t";

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// End the session.
    Exit,

    /// Forget the conversation so far.
    ClearMemory,

    /// Report accumulated usage.
    ReportUsage,

    /// Anything else: the original line, untouched.
    ChatTurn(String),
}

/// Classifies one line of user input.
///
/// # Examples
///
/// ```
/// # use rillabot::chat::{SessionCommand, parse_command};
/// assert_eq!(parse_command(" X "), SessionCommand::Exit);
/// assert_eq!(parse_command("w"), SessionCommand::ClearMemory);
/// assert_eq!(
///     parse_command("xyz"),
///     SessionCommand::ChatTurn("xyz".to_string())
/// );
/// ```
pub fn parse_command(input: &str) -> SessionCommand {
    let command = input.trim().to_lowercase();
    match command.as_str() {
        EXIT_COMMAND => SessionCommand::Exit,
        CLEAR_COMMAND => SessionCommand::ClearMemory,
        USAGE_COMMAND => SessionCommand::ReportUsage,
        _ => SessionCommand::ChatTurn(input.to_string()),
    }
}

/// Returns the usage instructions shown once when the session starts.
pub fn help_text() -> &'static str {
    r#"Chat with RillaBot, your AI-powered sales assistant.
Type a message and press Enter to send it.

Commands:
  x    Exit the program
  w    Clear the conversation memory
  t    Show tokens used and total cost so far"#
}

/// Formats the usage report.
pub fn format_usage(tokens: u64, cost: f64) -> String {
    format!("Tokens used: {tokens} tokens\nTotal cost: ${cost:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_letters() {
        assert_eq!(parse_command("x"), SessionCommand::Exit);
        assert_eq!(parse_command("w"), SessionCommand::ClearMemory);
        assert_eq!(parse_command("t"), SessionCommand::ReportUsage);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert_eq!(parse_command(" X "), SessionCommand::Exit);
        assert_eq!(parse_command("W\n"), SessionCommand::ClearMemory);
        assert_eq!(parse_command("\tT"), SessionCommand::ReportUsage);
    }

    #[test]
    fn other_lines_are_chat_turns() {
        assert_eq!(
            parse_command("xyz"),
            SessionCommand::ChatTurn("xyz".to_string())
        );
        assert_eq!(
            parse_command("  What is a good opener?  "),
            SessionCommand::ChatTurn("  What is a good opener?  ".to_string())
        );
        assert_eq!(
            parse_command("x marks the spot"),
            SessionCommand::ChatTurn("x marks the spot".to_string())
        );
        assert_eq!(parse_command("/quit"), SessionCommand::ChatTurn("/quit".to_string()));
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for letter in [EXIT_COMMAND, CLEAR_COMMAND, USAGE_COMMAND] {
            assert!(help.contains(&format!("  {letter}  ")));
        }
    }

    #[test]
    fn usage_report_format() {
        assert_eq!(
            format_usage(100, 0.002),
            "Tokens used: 100 tokens\nTotal cost: $0.0020"
        );
        assert_eq!(format_usage(0, 0.0), "Tokens used: 0 tokens\nTotal cost: $0.0000");
    }
}
