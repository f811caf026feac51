use std::fmt;
use std::sync::Arc;

/// The type of a token: either a tag chosen by a rule's action, or the end-of-stream marker that
/// terminates every token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType<T> {
    Tag(T),
    Eos,
}

/// Where a token was found. Offsets and columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Characters consumed before the token began.
    pub offset: usize,
    /// Line number. One-indexed.
    pub line: usize,
    /// Characters consumed on this line before the token began. Zero-indexed.
    pub column: usize,
    /// Length of the matched text, in characters.
    pub length: usize,
    /// The label of the source the token came from, such as a filename.
    pub source_label: Arc<str>,
}

/// One token in the sequence produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<T, V> {
    pub token_type: TokenType<T>,
    pub value: Option<V>,
    /// Always `Some`, except for the end-of-stream token.
    pub location: Option<Location>,
}

impl<T, V> Token<T, V> {
    pub(crate) fn new(tag: T, value: Option<V>, location: Location) -> Token<T, V> {
        Token {
            token_type: TokenType::Tag(tag),
            value,
            location: Some(location),
        }
    }

    pub(crate) fn eos() -> Token<T, V> {
        Token {
            token_type: TokenType::Eos,
            value: None,
            location: None,
        }
    }

    pub fn is_eos(&self) -> bool {
        matches!(self.token_type, TokenType::Eos)
    }

    /// The tag of this token, or `None` for the end-of-stream token.
    pub fn tag(&self) -> Option<&T> {
        match &self.token_type {
            TokenType::Tag(tag) => Some(tag),
            TokenType::Eos => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for TokenType<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenType::Tag(tag) => write!(f, "{:?}", tag),
            TokenType::Eos => write!(f, "EOS"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source_label, self.line, self.column)
    }
}
