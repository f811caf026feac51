use crate::environment::Environment;
use crate::lex_error::{LexError, LexerBuildError};
use crate::pattern::Pattern;
use crate::rule::{skip, Action, Rule};
use crate::rule_table::{InState, RuleTable, ALL_STATES};
use crate::scanner::{scan, MatchPolicy};
use crate::token::Token;
use crate::DEFAULT_STATE;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// The source label used when none is given.
pub const DEFAULT_SOURCE_LABEL: &str = "<input>";

/// A builder for [`Lexer`]. Declare rules in priority order, then call `finish()`.
///
/// `T` is the type of token tags, and `V` the type of token values.
pub struct LexerBuilder<T, V> {
    table: RuleTable<T, V>,
    policy: MatchPolicy,
    start_state: String,
}

/// A set of rules, ready to lex. A `Lexer` is never modified by lexing, so one can be shared
/// between threads, as long as each lex has its own [`Environment`].
pub struct Lexer<T, V> {
    table: RuleTable<T, V>,
    policy: MatchPolicy,
    start_state: String,
}

/// A lexer paired with an environment that persists across calls to `lex`. If one call ends in a
/// different state than it started in (or with different flags), the next call starts there.
pub struct LexSession<'l, T, V> {
    lexer: &'l Lexer<T, V>,
    env: Environment,
}

impl<T, V> LexerBuilder<T, V> {
    pub fn new() -> LexerBuilder<T, V> {
        LexerBuilder {
            table: RuleTable::new(),
            policy: MatchPolicy::default(),
            start_state: DEFAULT_STATE.to_owned(),
        }
    }

    /// Declare a rule. It is eligible when the lexer is in (one of) `in_state` and all of `flags`
    /// are set. When it fires, `action` is run on the matched text; if there is no action, the
    /// text is discarded.
    pub fn declare_rule(
        &mut self,
        pattern: Pattern,
        in_state: InState,
        flags: &[&str],
        action: Option<Arc<dyn Action<T, V>>>,
    ) -> &mut LexerBuilder<T, V>
    where
        T: 'static,
        V: 'static,
    {
        let action: Arc<dyn Action<T, V>> = match action {
            Some(action) => action,
            None => Arc::new(skip::<T, V>()),
        };
        let owner = match &in_state {
            InState::Default => DEFAULT_STATE,
            InState::Named(state) => state.as_str(),
            InState::All => ALL_STATES,
        };
        let rule = Rule::new(pattern, owner, flags, action);
        self.table.add_rule(&in_state, rule);
        self
    }

    /// Declare a rule for the default state that matches `regex`.
    pub fn rule<A: Action<T, V> + 'static>(
        &mut self,
        regex: &str,
        action: A,
    ) -> Result<&mut LexerBuilder<T, V>, LexerBuildError>
    where
        T: 'static,
        V: 'static,
    {
        self.rule_in(InState::Default, &[], regex, action)
    }

    /// Declare a rule that matches `regex` when in `in_state` with all of `flags` set.
    pub fn rule_in<A: Action<T, V> + 'static>(
        &mut self,
        in_state: InState,
        flags: &[&str],
        regex: &str,
        action: A,
    ) -> Result<&mut LexerBuilder<T, V>, LexerBuildError>
    where
        T: 'static,
        V: 'static,
    {
        let pattern = Pattern::regex(regex)?;
        Ok(self.declare_rule(pattern, in_state, flags, Some(Arc::new(action))))
    }

    /// Declare a rule for the default state that matches exactly `literal`.
    pub fn string<A: Action<T, V> + 'static>(
        &mut self,
        literal: &str,
        action: A,
    ) -> Result<&mut LexerBuilder<T, V>, LexerBuildError>
    where
        T: 'static,
        V: 'static,
    {
        self.string_in(InState::Default, &[], literal, action)
    }

    /// Declare a rule that matches exactly `literal` when in `in_state` with all of `flags` set.
    pub fn string_in<A: Action<T, V> + 'static>(
        &mut self,
        in_state: InState,
        flags: &[&str],
        literal: &str,
        action: A,
    ) -> Result<&mut LexerBuilder<T, V>, LexerBuildError>
    where
        T: 'static,
        V: 'static,
    {
        let pattern = Pattern::string(literal)?;
        Ok(self.declare_rule(pattern, in_state, flags, Some(Arc::new(action))))
    }

    /// Declare a rule that discards whatever `regex` matches, in `in_state`.
    pub fn skip(
        &mut self,
        in_state: InState,
        regex: &str,
    ) -> Result<&mut LexerBuilder<T, V>, LexerBuildError>
    where
        T: 'static,
        V: 'static,
    {
        let pattern = Pattern::regex(regex)?;
        Ok(self.declare_rule(pattern, in_state, &[], None))
    }

    /// Make sure `state` exists, so that rules declared later for [`InState::All`] include it.
    pub fn declare_state(&mut self, state: &str) -> &mut LexerBuilder<T, V> {
        self.table.declare_state(state);
        self
    }

    /// Defaults to [`MatchPolicy::Longest`].
    pub fn set_match_policy(&mut self, policy: MatchPolicy) -> &mut LexerBuilder<T, V> {
        self.policy = policy;
        self
    }

    /// The state that new environments begin in. Defaults to [`DEFAULT_STATE`].
    pub fn set_start_state(&mut self, state: &str) -> &mut LexerBuilder<T, V> {
        self.start_state = state.to_owned();
        self
    }

    /// Call this when you're done declaring rules, to construct the lexer.
    pub fn finish(self) -> Lexer<T, V> {
        Lexer {
            table: self.table,
            policy: self.policy,
            start_state: self.start_state,
        }
    }
}

impl<T, V> Lexer<T, V> {
    /// A fresh environment, in the start state with no flags set.
    pub fn new_environment(&self) -> Environment {
        Environment::new(&self.start_state)
    }

    /// Split `text` into tokens, starting from a fresh environment. The last token is always the
    /// end-of-stream token.
    pub fn lex(&self, text: &str) -> Result<Vec<Token<T, V>>, LexError> {
        self.lex_labeled(text, DEFAULT_SOURCE_LABEL)
    }

    /// Like `lex`, but tokens are marked as coming from `source_label`, such as a filename.
    pub fn lex_labeled(
        &self,
        text: &str,
        source_label: &str,
    ) -> Result<Vec<Token<T, V>>, LexError> {
        let mut env = self.new_environment();
        self.lex_with(text, source_label, &mut env)
    }

    /// Split `text` into tokens, starting from `env` as it is. Whatever state and flags the rule
    /// actions leave behind remain in `env` afterwards, even if lexing fails.
    pub fn lex_with(
        &self,
        text: &str,
        source_label: &str,
        env: &mut Environment,
    ) -> Result<Vec<Token<T, V>>, LexError> {
        debug!(
            source = source_label,
            len = text.len(),
            state = env.state(),
            "lexing"
        );
        let source_label: Arc<str> = Arc::from(source_label);
        let tokens = scan(&self.table, self.policy, text, &source_label, env)?;
        debug!(
            source = %source_label,
            tokens = tokens.len(),
            state = env.state(),
            "lexed"
        );
        Ok(tokens)
    }

    /// Read all of `reader`, then lex it with `env`.
    pub fn lex_reader<R: Read>(
        &self,
        mut reader: R,
        source_label: &str,
        env: &mut Environment,
    ) -> Result<Vec<Token<T, V>>, LexError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| LexError::Io {
                label: source_label.to_owned(),
                source,
            })?;
        self.lex_with(&text, source_label, env)
    }

    /// Start a session whose environment persists between calls.
    pub fn session(&self) -> LexSession<'_, T, V> {
        LexSession {
            lexer: self,
            env: self.new_environment(),
        }
    }

    pub fn rule_table(&self) -> &RuleTable<T, V> {
        &self.table
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn start_state(&self) -> &str {
        &self.start_state
    }
}

impl<'l, T, V> LexSession<'l, T, V> {
    /// Lex `text`, picking up in whatever state the previous call left off in.
    pub fn lex(&mut self, text: &str) -> Result<Vec<Token<T, V>>, LexError> {
        self.lexer.lex_with(text, DEFAULT_SOURCE_LABEL, &mut self.env)
    }

    pub fn lex_labeled(
        &mut self,
        text: &str,
        source_label: &str,
    ) -> Result<Vec<Token<T, V>>, LexError> {
        self.lexer.lex_with(text, source_label, &mut self.env)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Go back to the start state, with no flags set.
    pub fn reset(&mut self) {
        self.env = self.lexer.new_environment();
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }
}

impl<T, V> Default for LexerBuilder<T, V> {
    fn default() -> LexerBuilder<T, V> {
        LexerBuilder::new()
    }
}

impl<T, V> Clone for Lexer<T, V> {
    fn clone(&self) -> Lexer<T, V> {
        Lexer {
            table: self.table.clone(),
            policy: self.policy,
            start_state: self.start_state.clone(),
        }
    }
}

impl<T, V> fmt::Debug for Lexer<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("policy", &self.policy)
            .field("start_state", &self.start_state)
            .field("table", &self.table)
            .finish()
    }
}

impl<T, V> fmt::Display for Lexer<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "policy: {:?}", self.policy)?;
        writeln!(f, "start:  {}", self.start_state)?;
        write!(f, "{}", self.table.to_table())
    }
}
