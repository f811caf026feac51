//! Declarative, stateful lexing.
//!
//! A lexer is a ranked list of _rules_. Each rule pairs a pattern with an _action_, and belongs to
//! one or more named _states_. At each position in the input, the rules of the current state are
//! tried, and the best match wins:
//!
//! - Under [`MatchPolicy::Longest`] (the default), the longest match is used. If there is a tie,
//!   the rule declared first is used.
//! - Under [`MatchPolicy::First`], the first rule that matches at all is used.
//!
//! The winning rule's action then decides whether to produce a token, and may change the lexer's
//! [`Environment`]: push, pop, or replace the current state, and set or unset _flags_. A rule that
//! requires flags is only eligible while all of them are set.
//!
//! Usage:
//!
//! ```
//! use statelex::{token, token_with, InState, LexerBuilder, TokenType};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Tok {
//!     Num,
//!     Plus,
//! }
//!
//! let mut builder = LexerBuilder::<Tok, i64>::new();
//! builder.skip(InState::Default, r"\s+").unwrap();
//! builder.string("+", token(Tok::Plus)).unwrap();
//! builder
//!     .rule("[0-9]+", token_with(Tok::Num, |text: &str| text.parse::<i64>()))
//!     .unwrap();
//! let lexer = builder.finish();
//!
//! let tokens = lexer.lex("1 + 22").unwrap();
//! let types = tokens.iter().map(|tok| tok.token_type).collect::<Vec<_>>();
//! assert_eq!(
//!     types,
//!     vec![
//!         TokenType::Tag(Tok::Num),
//!         TokenType::Tag(Tok::Plus),
//!         TokenType::Tag(Tok::Num),
//!         TokenType::Eos
//!     ]
//! );
//! assert_eq!(tokens[2].value, Some(22));
//!
//! let error = lexer.lex("1 @ 2").unwrap_err();
//! assert_eq!(error.as_unmatched().unwrap().remainder, "@ 2");
//! ```
//!
//! If no rule matches, lexing fails with [`LexError::Unmatched`], which records where and what the
//! unmatched input was. If an action fails, lexing fails with [`LexError::Action`], carrying the
//! action's own error.

mod environment;
mod lex_error;
mod lexer;
mod pattern;
mod rule;
mod rule_table;
mod scanner;
mod token;

pub use environment::{Environment, Match};
pub use lex_error::{ActionError, EnvError, LexError, LexerBuildError, UnmatchedInput};
pub use lexer::{LexSession, Lexer, LexerBuilder, DEFAULT_SOURCE_LABEL};
pub use pattern::Pattern;
pub use rule::{skip, token, token_text, token_with, Action, Emit, Rule};
pub use rule::{Skip, TagOnly, TagText, TagWith};
pub use rule_table::{InState, RuleTable, ALL_STATES};
pub use scanner::MatchPolicy;
pub use token::{Location, Token, TokenType};

/// The state that rules are declared for, and that lexing starts in, unless told otherwise.
pub const DEFAULT_STATE: &str = "default";
