use crate::lex_error::EnvError;
use crate::token::Location;
use crate::DEFAULT_STATE;
use std::collections::HashSet;
use std::iter;
use tracing::trace;

/// The mutable part of lexing: which state the lexer is in, which flags are set, and what was
/// matched most recently. Rule actions receive it by `&mut` and may change the state and flags to
/// affect which rules are eligible next.
///
/// An `Environment` outlives a single call to `lex`. Re-using one across calls carries its state
/// stack and flags over; make a new one to start afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    // Top of the state stack. Kept apart so the stack can never be empty.
    current: String,
    below: Vec<String>,
    flags: HashSet<String>,
    current_match: Option<Match>,
}

/// The match that the running action was invoked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The matched text.
    pub text: String,
    /// Where the matched text starts.
    pub location: Location,
    /// Capture groups of the rule's pattern, excluding the whole match.
    pub groups: Vec<Option<String>>,
    /// The state the lexer was in when the rule was selected.
    pub state: String,
}

impl Environment {
    /// An environment with `start_state` as the only state on the stack, and no flags set.
    pub fn new(start_state: &str) -> Environment {
        Environment {
            current: start_state.to_owned(),
            below: vec![],
            flags: HashSet::new(),
            current_match: None,
        }
    }

    /// The current state: the top of the state stack.
    pub fn state(&self) -> &str {
        &self.current
    }

    /// The whole state stack, from bottom to top.
    pub fn state_stack(&self) -> impl Iterator<Item = &str> + '_ {
        self.below
            .iter()
            .chain(iter::once(&self.current))
            .map(|state| state.as_str())
    }

    pub fn state_depth(&self) -> usize {
        self.below.len() + 1
    }

    /// Enter `state`, remembering the current state so that `pop_state` can return to it.
    pub fn push_state(&mut self, state: &str) {
        trace!(from = %self.current, to = state, "push state");
        let previous = std::mem::replace(&mut self.current, state.to_owned());
        self.below.push(previous);
    }

    /// Leave the current state and return to the one below it. Returns the state that was left.
    ///
    /// The last state on the stack can't be popped: doing so is an error, and leaves the stack
    /// unchanged.
    pub fn pop_state(&mut self) -> Result<String, EnvError> {
        match self.below.pop() {
            Some(below) => {
                trace!(from = %self.current, to = %below, "pop state");
                Ok(std::mem::replace(&mut self.current, below))
            }
            None => Err(EnvError::PopLastState(self.current.clone())),
        }
    }

    /// Replace the top of the state stack with `state`.
    pub fn set_state(&mut self, state: &str) {
        trace!(from = %self.current, to = state, "set state");
        self.current = state.to_owned();
    }

    pub fn set_flag(&mut self, flag: &str) {
        trace!(flag, "set flag");
        self.flags.insert(flag.to_owned());
    }

    /// Unset `flag`. Returns whether it had been set.
    pub fn unset_flag(&mut self, flag: &str) -> bool {
        trace!(flag, "unset flag");
        self.flags.remove(flag)
    }

    pub fn clear_flags(&mut self) {
        trace!("clear flags");
        self.flags.clear();
    }

    pub fn is_flag_set(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn flags(&self) -> &HashSet<String> {
        &self.flags
    }

    /// The match most recently handed to an action, if any.
    pub fn current_match(&self) -> Option<&Match> {
        self.current_match.as_ref()
    }

    pub(crate) fn set_current_match(&mut self, current_match: Match) {
        self.current_match = Some(current_match);
    }
}

impl Default for Environment {
    fn default() -> Environment {
        Environment::new(DEFAULT_STATE)
    }
}
