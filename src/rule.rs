use crate::environment::Environment;
use crate::lex_error::ActionError;
use crate::pattern::Pattern;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// What an action decided to do with the text its rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit<T, V> {
    /// Produce no token. The matched text is still consumed.
    Skip,
    /// Produce a token with this tag and (optional) value.
    Token(T, Option<V>),
}

/// The code that runs when a rule is selected. It receives the lexer's [`Environment`], whose
/// current match has been set, along with the matched text.
///
/// Any closure `Fn(&mut Environment, &str) -> Result<Emit<T, V>, ActionError>` is an action.
pub trait Action<T, V>: Send + Sync {
    fn apply(&self, env: &mut Environment, text: &str) -> Result<Emit<T, V>, ActionError>;
}

impl<T, V, F> Action<T, V> for F
where
    F: Fn(&mut Environment, &str) -> Result<Emit<T, V>, ActionError> + Send + Sync,
{
    fn apply(&self, env: &mut Environment, text: &str) -> Result<Emit<T, V>, ActionError> {
        self(env, text)
    }
}

/// One lexical alternative: when `pattern` matches in `state` while all of `flags` are set, run
/// `action`.
pub struct Rule<T, V> {
    pattern: Pattern,
    state: String,
    flags: Vec<String>,
    action: Arc<dyn Action<T, V>>,
}

impl<T, V> Rule<T, V> {
    pub fn new(
        pattern: Pattern,
        state: &str,
        flags: &[&str],
        action: Arc<dyn Action<T, V>>,
    ) -> Rule<T, V> {
        let mut owned_flags: Vec<String> = vec![];
        for flag in flags {
            if !owned_flags.iter().any(|f| f == flag) {
                owned_flags.push((*flag).to_owned());
            }
        }
        Rule {
            pattern,
            state: state.to_owned(),
            flags: owned_flags,
            action,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The state this rule was declared for. Only informational: what matters is which states'
    /// rule lists it was placed in.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn required_flags(&self) -> &[String] {
        &self.flags
    }

    pub fn action(&self) -> &dyn Action<T, V> {
        self.action.as_ref()
    }

    /// A rule may fire only if every flag it requires is set.
    pub fn is_eligible(&self, flags: &HashSet<String>) -> bool {
        self.flags.iter().all(|flag| flags.contains(flag))
    }
}

impl<T, V> fmt::Debug for Rule<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("state", &self.state)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl<T, V> fmt::Display for Rule<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pattern)?;
        if !self.flags.is_empty() {
            write!(f, " [{}]", self.flags.join(", "))?;
        }
        Ok(())
    }
}

/// An action that discards the match.
pub fn skip<T, V>() -> Skip<T, V> {
    Skip(PhantomData)
}

/// An action that produces a token with `tag` and no value.
pub fn token<T, V>(tag: T) -> TagOnly<T, V> {
    TagOnly(tag, PhantomData)
}

/// An action that produces a token with `tag` whose value is computed from the matched text. If
/// `convert` fails, so does the action.
pub fn token_with<T, F, E>(tag: T, convert: F) -> TagWith<T, F, E> {
    TagWith {
        tag,
        convert,
        _error: PhantomData,
    }
}

/// An action that produces a token with `tag` whose value is the matched text.
pub fn token_text<T, V>(tag: T) -> TagText<T, V> {
    TagText(tag, PhantomData)
}

#[derive(Debug, Clone, Copy)]
pub struct Skip<T, V>(PhantomData<fn() -> (T, V)>);

#[derive(Debug, Clone, Copy)]
pub struct TagOnly<T, V>(T, PhantomData<fn() -> V>);

#[derive(Debug, Clone, Copy)]
pub struct TagText<T, V>(T, PhantomData<fn() -> V>);

#[derive(Debug, Clone, Copy)]
pub struct TagWith<T, F, E> {
    tag: T,
    convert: F,
    _error: PhantomData<fn() -> E>,
}

impl<T, V> Action<T, V> for Skip<T, V> {
    fn apply(&self, _env: &mut Environment, _text: &str) -> Result<Emit<T, V>, ActionError> {
        Ok(Emit::Skip)
    }
}

impl<T: Clone + Send + Sync, V> Action<T, V> for TagOnly<T, V> {
    fn apply(&self, _env: &mut Environment, _text: &str) -> Result<Emit<T, V>, ActionError> {
        Ok(Emit::Token(self.0.clone(), None))
    }
}

impl<T, V> Action<T, V> for TagText<T, V>
where
    T: Clone + Send + Sync,
    V: for<'a> From<&'a str>,
{
    fn apply(&self, _env: &mut Environment, text: &str) -> Result<Emit<T, V>, ActionError> {
        Ok(Emit::Token(self.0.clone(), Some(V::from(text))))
    }
}

impl<T, V, F, E> Action<T, V> for TagWith<T, F, E>
where
    T: Clone + Send + Sync,
    F: Fn(&str) -> Result<V, E> + Send + Sync,
    E: Into<ActionError>,
{
    fn apply(&self, _env: &mut Environment, text: &str) -> Result<Emit<T, V>, ActionError> {
        let value = (self.convert)(text).map_err(Into::into)?;
        Ok(Emit::Token(self.tag.clone(), Some(value)))
    }
}
