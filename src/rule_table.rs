use crate::rule::Rule;
use crate::DEFAULT_STATE;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The name recorded as the owning state of a rule declared for [`InState::All`].
pub const ALL_STATES: &str = "*";

/// Which state(s) a rule is declared for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InState {
    /// The default state, [`DEFAULT_STATE`].
    Default,
    Named(String),
    /// Every state that exists _at the time the rule is declared_. States first mentioned later
    /// will not have the rule.
    All,
}

impl InState {
    pub fn named(state: &str) -> InState {
        InState::Named(state.to_owned())
    }
}

/// For each state, the ordered list of rules that may fire in it.
pub struct RuleTable<T, V> {
    states: Vec<StateRules<T, V>>,
    state_indices: HashMap<String, usize>,
}

struct StateRules<T, V> {
    name: String,
    rules: Vec<Arc<Rule<T, V>>>,
}

impl<T, V> RuleTable<T, V> {
    /// A table containing only the default state, with no rules.
    pub fn new() -> RuleTable<T, V> {
        let mut table = RuleTable {
            states: vec![],
            state_indices: HashMap::new(),
        };
        table.declare_state(DEFAULT_STATE);
        table
    }

    /// Make sure `state` exists, even if it has no rules yet. Rules later declared for
    /// [`InState::All`] will then be placed in it.
    pub fn declare_state(&mut self, state: &str) -> usize {
        if let Some(id) = self.state_indices.get(state) {
            *id
        } else {
            let id = self.states.len();
            self.state_indices.insert(state.to_owned(), id);
            self.states.push(StateRules {
                name: state.to_owned(),
                rules: vec![],
            });
            id
        }
    }

    /// Append `rule` to the rule list of the state(s) it is for.
    pub fn add_rule(&mut self, in_state: &InState, rule: Rule<T, V>) {
        let rule = Arc::new(rule);
        match in_state {
            InState::Default => self.add_rule_to(DEFAULT_STATE, rule),
            InState::Named(state) => self.add_rule_to(state, rule),
            InState::All => {
                for state in &mut self.states {
                    state.rules.push(rule.clone());
                }
            }
        }
    }

    fn add_rule_to(&mut self, state: &str, rule: Arc<Rule<T, V>>) {
        let id = self.declare_state(state);
        self.states[id].rules.push(rule);
    }

    /// The rules of `state`, in declaration order. A state that was never declared has none.
    pub fn rules(&self, state: &str) -> &[Arc<Rule<T, V>>] {
        match self.state_indices.get(state) {
            Some(id) => &self.states[*id].rules,
            None => &[],
        }
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.state_indices.contains_key(state)
    }

    /// All states, in the order they were first mentioned.
    pub fn states(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.iter().map(|state| state.name.as_str())
    }

    /// Show every state's rules, one per line, in the order they will be tried.
    pub fn to_table(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for state in &self.states {
            for (i, rule) in state.rules.iter().enumerate() {
                let _ = writeln!(out, "{:<12}{:<4}{:<12}{}", state.name, i, rule.state(), rule);
            }
            if state.rules.is_empty() {
                let _ = writeln!(out, "{:<12}-", state.name);
            }
        }
        out
    }
}

impl<T, V> Default for RuleTable<T, V> {
    fn default() -> RuleTable<T, V> {
        RuleTable::new()
    }
}

impl<T, V> Clone for RuleTable<T, V> {
    fn clone(&self) -> RuleTable<T, V> {
        RuleTable {
            states: self
                .states
                .iter()
                .map(|state| StateRules {
                    name: state.name.clone(),
                    rules: state.rules.clone(),
                })
                .collect(),
            state_indices: self.state_indices.clone(),
        }
    }
}

impl<T, V> fmt::Debug for RuleTable<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        for state in &self.states {
            map.entry(&state.name, &state.rules);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::rule::skip;

    fn rule(pattern: &str, state: &str) -> Rule<(), ()> {
        Rule::new(Pattern::string(pattern).unwrap(), state, &[], Arc::new(skip::<(), ()>()))
    }

    fn patterns(table: &RuleTable<(), ()>, state: &str) -> Vec<String> {
        table
            .rules(state)
            .iter()
            .map(|rule| rule.pattern().to_string())
            .collect()
    }

    #[test]
    fn test_declaration_order() {
        let mut table = RuleTable::new();
        table.add_rule(&InState::Default, rule("a", DEFAULT_STATE));
        table.add_rule(&InState::named("s"), rule("b", "s"));
        table.add_rule(&InState::Default, rule("c", DEFAULT_STATE));
        assert_eq!(patterns(&table, DEFAULT_STATE), vec!["\"a\"", "\"c\""]);
        assert_eq!(patterns(&table, "s"), vec!["\"b\""]);
        assert_eq!(table.states().collect::<Vec<_>>(), vec![DEFAULT_STATE, "s"]);
    }

    #[test]
    fn test_all_states_only_reaches_existing_states() {
        let mut table = RuleTable::new();
        table.add_rule(&InState::named("early"), rule("a", "early"));
        table.add_rule(&InState::All, rule("ws", ALL_STATES));
        table.add_rule(&InState::named("late"), rule("b", "late"));
        assert_eq!(patterns(&table, DEFAULT_STATE), vec!["\"ws\""]);
        assert_eq!(patterns(&table, "early"), vec!["\"a\"", "\"ws\""]);
        assert_eq!(patterns(&table, "late"), vec!["\"b\""]);
    }

    #[test]
    fn test_declared_state_receives_all_states_rules() {
        let mut table = RuleTable::new();
        table.declare_state("late");
        table.add_rule(&InState::All, rule("ws", ALL_STATES));
        assert_eq!(patterns(&table, "late"), vec!["\"ws\""]);
    }

    #[test]
    fn test_missing_state_is_empty() {
        let table = RuleTable::<(), ()>::new();
        assert!(table.rules("nowhere").is_empty());
        assert!(!table.contains_state("nowhere"));
    }
}
