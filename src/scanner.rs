use crate::environment::{Environment, Match};
use crate::lex_error::{LexError, UnmatchedInput};
use crate::rule::{Emit, Rule};
use crate::rule_table::RuleTable;
use crate::token::{Location, Token};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// How to choose between several rules that all match at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchPolicy {
    /// The rule with the longest match wins. If there's a tie, the rule declared first wins.
    #[default]
    Longest,
    /// The first rule (in declaration order) that matches at all wins.
    First,
}

/// How far into the input the scanner has gotten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanPosition {
    // Byte index into the input, for slicing.
    index: usize,
    // Characters consumed.
    offset: usize,
    line: usize,
    column: usize,
}

impl ScanPosition {
    fn start() -> ScanPosition {
        ScanPosition {
            index: 0,
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    /// Step past `chunk`. A chunk containing newlines resets the column to zero, regardless of
    /// what follows its last newline.
    fn advance(&mut self, chunk: &str) {
        let len = chunk.chars().count();
        self.index += chunk.len();
        self.offset += len;
        let newlines = chunk.matches('\n').count();
        if newlines > 0 {
            self.line += newlines;
            self.column = 0;
        } else {
            self.column += len;
        }
    }

    fn location(&self, chunk: &str, source_label: &Arc<str>) -> Location {
        Location {
            offset: self.offset,
            line: self.line,
            column: self.column,
            length: chunk.chars().count(),
            source_label: source_label.clone(),
        }
    }
}

/// Lex all of `text`, starting from whatever state `env` is in. On success, the last token is
/// always the end-of-stream token.
pub(crate) fn scan<T, V>(
    table: &RuleTable<T, V>,
    policy: MatchPolicy,
    text: &str,
    source_label: &Arc<str>,
    env: &mut Environment,
) -> Result<Vec<Token<T, V>>, LexError> {
    let mut position = ScanPosition::start();
    let mut tokens = vec![];

    while position.index < text.len() {
        let remaining = &text[position.index..];
        let rules = table.rules(env.state());
        let (rule, matched) = match select(rules, env.flags(), remaining, policy) {
            Some(best) => best,
            None => {
                let unmatched = UnmatchedInput {
                    offset: position.offset,
                    line: position.line,
                    column: position.column,
                    remainder: remaining.to_owned(),
                    source_label: source_label.clone(),
                };
                debug!(state = env.state(), %unmatched, "lexing failed");
                return Err(LexError::Unmatched(unmatched));
            }
        };

        let location = position.location(matched, source_label);
        let state = env.state().to_owned();
        trace!(
            state = %state,
            offset = position.offset,
            pattern = %rule.pattern(),
            len = location.length,
            "matched"
        );
        env.set_current_match(Match {
            text: matched.to_owned(),
            location: location.clone(),
            groups: rule.pattern().captures(remaining),
            state: state.clone(),
        });
        let emit = rule
            .action()
            .apply(env, matched)
            .map_err(|source| LexError::Action {
                state,
                pattern: rule.pattern().to_string(),
                source,
            })?;
        if let Emit::Token(tag, value) = emit {
            tokens.push(Token::new(tag, value, location));
        }
        position.advance(matched);
    }

    tokens.push(Token::eos());
    Ok(tokens)
}

/// Pick the rule to fire at the start of `remaining`, along with the text it matched.
fn select<'r, 's, T, V>(
    rules: &'r [Arc<Rule<T, V>>],
    flags: &HashSet<String>,
    remaining: &'s str,
    policy: MatchPolicy,
) -> Option<(&'r Rule<T, V>, &'s str)> {
    let mut best: Option<(&'r Rule<T, V>, &'s str)> = None;
    let eligible = rules
        .iter()
        .map(|rule| &**rule)
        .filter(|rule| rule.is_eligible(flags));
    for rule in eligible {
        let matched = match rule.pattern().find_prefix(remaining) {
            Some(matched) => matched,
            None => continue,
        };
        match policy {
            MatchPolicy::First => return Some((rule, matched)),
            MatchPolicy::Longest => {
                // Both are prefixes of `remaining`, so comparing byte lengths is comparing
                // character lengths. Ties keep the earlier rule.
                let is_longer = match best {
                    Some((_, best_match)) => matched.len() > best_match.len(),
                    None => true,
                };
                if is_longer {
                    best = Some((rule, matched));
                }
            }
        }
    }
    best
}
