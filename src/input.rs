//! Console line input.
//!
//! Both the key prompt and the chat loop block on one line of input at a time.  [`LineSource`]
//! is that single capability; `rustyline` supplies it at the terminal and tests script it.
//! The key prompt uses [`MaskedEditor`] so a typed key never appears on screen.

use std::borrow::Cow;
use std::collections::VecDeque;

use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, DefaultEditor, Editor, Helper};

use crate::error::{Error, Result};

/// A blocking source of input lines.
pub trait LineSource {
    /// Show `prompt` and wait for one line.
    ///
    /// Returns `Ok(None)` once input is exhausted (Ctrl-D, closed pipe).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        into_line(self.readline(prompt))
    }
}

fn into_line(result: rustyline::Result<String>) -> Result<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
        Err(err) => Err(readline_error(err)),
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(err) => Error::io("failed to read console input", err),
        err => Error::unknown(format!("console input error: {err}")),
    }
}

/// Draws every typed character as `*`.
#[derive(Debug, Default)]
pub struct MaskingHelper;

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, kind: CmdKind) -> bool {
        !matches!(kind, CmdKind::MoveCursor)
    }
}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Helper for MaskingHelper {}

/// A line editor for secrets.
///
/// Input is masked while typed and never enters the history.
pub struct MaskedEditor {
    editor: Editor<MaskingHelper, DefaultHistory>,
}

impl MaskedEditor {
    /// Creates an editor on the controlling terminal.
    pub fn new() -> Result<Self> {
        let mut editor = Editor::<MaskingHelper, DefaultHistory>::new().map_err(readline_error)?;
        editor.set_helper(Some(MaskingHelper));
        editor.set_color_mode(ColorMode::Forced);
        editor.set_auto_add_history(false);
        Ok(Self { editor })
    }
}

impl LineSource for MaskedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        into_line(self.editor.readline(prompt))
    }
}

/// Replays a fixed list of lines, then reports end of input.
///
/// Used for piped scripts and in tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    /// Creates a source that yields `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// The prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Number of lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
