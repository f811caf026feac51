use colored::Colorize;
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;

/// The error type a rule's action may fail with. The lexer passes it along untouched, inside
/// [`LexError::Action`].
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LexError {
    /// No rule in the current state matched the remaining input.
    #[error(transparent)]
    Unmatched(#[from] UnmatchedInput),
    /// A rule's action failed.
    #[error("Action for {pattern} in state '{state}' failed: {source}")]
    Action {
        state: String,
        pattern: String,
        #[source]
        source: ActionError,
    },
    #[error("Failed to read '{label}': {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

/// The lexer reached a position where no eligible rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unmatched input at {source_label}:{line}:{column}: {remainder:?}")]
pub struct UnmatchedInput {
    /// Characters consumed before the failure.
    pub offset: usize,
    /// One-indexed.
    pub line: usize,
    /// Zero-indexed.
    pub column: usize,
    /// Everything from the failure onward.
    pub remainder: String,
    pub source_label: Arc<str>,
}

/// Misuse of an [`Environment`](crate::Environment) from within an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Cannot pop state '{0}': it is the only state on the stack.")]
    PopLastState(String),
}

#[derive(Debug, Error)]
pub enum LexerBuildError {
    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

impl LexError {
    /// The unmatched input, if that's what went wrong.
    pub fn as_unmatched(&self) -> Option<&UnmatchedInput> {
        match self {
            LexError::Unmatched(unmatched) => Some(unmatched),
            _ => None,
        }
    }
}

impl UnmatchedInput {
    /// Show the line of `text` where lexing failed, with a caret under the first unmatched
    /// character. `text` must be the text that was being lexed.
    pub fn report(&self, text: &str) -> String {
        let byte_pos = text
            .char_indices()
            .nth(self.offset)
            .map(|(pos, _)| pos)
            .unwrap_or(text.len());
        let line_start = text[..byte_pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[byte_pos..]
            .find('\n')
            .map(|i| byte_pos + i)
            .unwrap_or(text.len());
        let line = text[line_start..line_end].trim_end_matches('\r');
        let line_num = text[..line_start].matches('\n').count() + 1;
        let col = text[line_start..byte_pos].chars().count();
        let margin = " ".repeat(line_num.to_string().len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: unmatched input at '{}' line {}.",
            "error".red().bold(),
            self.source_label,
            line_num
        );
        let _ = writeln!(out, "{} {}", margin, "|".blue().bold());
        let _ = writeln!(
            out,
            "{} {} {}",
            line_num.to_string().blue().bold(),
            "|".blue().bold(),
            line
        );
        let _ = write!(
            out,
            "{} {} {}{}",
            margin,
            "|".blue().bold(),
            " ".repeat(col),
            "^".red().bold()
        );
        out
    }
}
