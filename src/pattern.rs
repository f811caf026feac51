use regex::{escape, Error as RegexError, Regex};
use std::fmt;

/// Something a rule can match against the front of the remaining input: either an exact string
/// or a regex. Patterns are compiled once, when the rule is declared.
#[derive(Debug, Clone)]
pub struct Pattern {
    literal: Option<String>,
    regex: Regex,
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.literal == other.literal
    }
}

impl Eq for Pattern {}

impl Pattern {
    /// A pattern that matches exactly the string provided.
    pub fn string(literal: &str) -> Result<Pattern, RegexError> {
        Ok(Pattern {
            literal: Some(literal.to_owned()),
            regex: new_regex(&escape(literal))?,
        })
    }

    /// A pattern that matches the given regex. The syntax is that of the `regex` crate. You do not
    /// need to begin the pattern with a start-of-string character `^`.
    pub fn regex(regex: &str) -> Result<Pattern, RegexError> {
        Ok(Pattern {
            literal: None,
            regex: new_regex(regex)?,
        })
    }

    /// Does this pattern match a prefix of `input`? If so, return that prefix. Empty matches do
    /// not count.
    pub fn find_prefix<'s>(&self, input: &'s str) -> Option<&'s str> {
        let len = match &self.literal {
            Some(literal) if input.starts_with(literal.as_str()) => literal.len(),
            Some(_) => return None,
            None => self.regex.find(input)?.end(),
        };
        if len == 0 {
            None
        } else {
            Some(&input[..len])
        }
    }

    /// The capture groups of this pattern's prefix match against `input`, numbered the way they
    /// were written (group 0, the whole match, is excluded). Groups that did not participate are
    /// `None`.
    pub fn captures(&self, input: &str) -> Vec<Option<String>> {
        match self.regex.captures(input) {
            None => vec![],
            Some(caps) => caps
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_owned()))
                .collect(),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }

    /// The source text of the (anchored) regex this pattern was compiled to.
    pub fn regex_pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "\"{}\"", literal.escape_default()),
            None => {
                let source = self.regex.as_str();
                let source = &source["^(?:".len()..source.len() - 1];
                write!(f, "/{}/", source)
            }
        }
    }
}

fn new_regex(regex: &str) -> Result<Regex, RegexError> {
    Regex::new(&format!("^(?:{})", regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_only() {
        let digits = Pattern::regex("[0-9]+").unwrap();
        assert_eq!(digits.find_prefix("123abc"), Some("123"));
        assert_eq!(digits.find_prefix("abc123"), None);

        let arrow = Pattern::string("->").unwrap();
        assert_eq!(arrow.find_prefix("->x"), Some("->"));
        assert_eq!(arrow.find_prefix("x->"), None);
    }

    #[test]
    fn test_alternation_is_anchored() {
        let pattern = Pattern::regex("a|b").unwrap();
        assert_eq!(pattern.find_prefix("xb"), None);
        assert_eq!(pattern.find_prefix("bx"), Some("b"));
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let pattern = Pattern::regex("a*").unwrap();
        assert_eq!(pattern.find_prefix("bbb"), None);
        assert_eq!(pattern.find_prefix("aab"), Some("aa"));
    }

    #[test]
    fn test_string_escapes_metacharacters() {
        let pattern = Pattern::string("(*)").unwrap();
        assert_eq!(pattern.find_prefix("(*)"), Some("(*)"));
        assert_eq!(pattern.find_prefix("((("), None);
        assert!(pattern.is_literal());
    }

    #[test]
    fn test_captures_keep_numbering() {
        let pattern = Pattern::regex(r"([a-z]+)=([0-9]+)?").unwrap();
        assert_eq!(
            pattern.captures("x=12;"),
            vec![Some("x".to_owned()), Some("12".to_owned())]
        );
        assert_eq!(pattern.captures("x=;"), vec![Some("x".to_owned()), None]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Pattern::string("\n").unwrap().to_string(), "\"\\n\"");
        assert_eq!(Pattern::regex("[0-9]+").unwrap().to_string(), "/[0-9]+/");
    }
}
