//! Console output for the assistant.
//!
//! Replies and errors get two distinct styles so they stand out from the user's own typing.
//! The default implementation uses ANSI escape codes and can be switched to plain text for
//! piping or terminals without color.

use std::io::{self, Stdout, Write};

/// ANSI escape code for bright green text (used for replies).
const ANSI_BRIGHT_GREEN: &str = "\x1b[92m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering assistant output.
pub trait Renderer: Send {
    /// Print text produced by the model: replies and the start-up introduction.
    fn print_reply(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// Writes to stdout by default; any [`Write`] sink can be substituted.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    // Console output is best-effort; a closed stdout must not abort the session.
    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_reply(&mut self, text: &str) {
        let line = self.styled(ANSI_BRIGHT_GREEN, text);
        self.emit(&line);
    }

    fn print_error(&mut self, error: &str) {
        let line = self.styled(ANSI_RED, &format!("ERROR: {error}"));
        self.emit(&line);
    }

    fn print_info(&mut self, info: &str) {
        self.emit(info);
    }
}
