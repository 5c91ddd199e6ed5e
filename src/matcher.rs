//! Label matching for both engines.
//!
//! Automaton labels are literal prefixes or anchored patterns matched against the unconsumed
//! input. Turing labels read a single symbol, and blank-like symbols match an empty cell.

use log::warn;
use regex::Regex;

use crate::types::{BLANK_SYMBOL, EPSILON_SYMBOL, LAMBDA_SYMBOL};

const PATTERN_METACHARACTERS: [char; 11] = ['[', ']', '(', ')', '*', '+', '?', '|', '^', '$', '.'];
const PATTERN_CLASSES: [&str; 3] = ["\\d", "\\w", "\\s"];

/// Returns `true` when a label should be compiled as a pattern rather than compared literally:
/// it is wrapped in `/…/` or contains a pattern metacharacter or character class.
pub fn is_pattern(label: &str) -> bool {
    is_slash_wrapped(label)
        || label.contains(&PATTERN_METACHARACTERS[..])
        || PATTERN_CLASSES.iter().any(|class| label.contains(class))
}

fn is_slash_wrapped(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('/') && label.ends_with('/')
}

/// Compiles a pattern label into a regular expression anchored at the start of the input.
pub fn compile_pattern(label: &str) -> Result<Regex, regex::Error> {
    let source = if is_slash_wrapped(label) {
        &label[1..label.len() - 1]
    } else {
        label
    };

    Regex::new(&format!("^(?:{source})"))
}

/// The compiled form of a single automaton label.
#[derive(Debug, Clone)]
pub enum LabelMatcher {
    Literal(String),
    Pattern(Regex),
    /// A pattern that failed to compile. It never matches.
    Invalid,
}

impl LabelMatcher {
    pub fn new(label: &str) -> Self {
        if !is_pattern(label) {
            return LabelMatcher::Literal(label.to_string());
        }

        match compile_pattern(label) {
            Ok(regex) => LabelMatcher::Pattern(regex),
            Err(e) => {
                warn!("Ignoring label '{label}': {e}");
                LabelMatcher::Invalid
            }
        }
    }

    /// Returns the prefix of `input` this label consumes, if any.
    ///
    /// Zero-length matches count as no match, so a successful match always advances.
    pub fn find<'a>(&self, input: &'a str) -> Option<&'a str> {
        match self {
            LabelMatcher::Literal(literal) => (!literal.is_empty() && input.starts_with(literal))
                .then(|| &input[..literal.len()]),
            LabelMatcher::Pattern(regex) => regex
                .find(input)
                .filter(|m| m.start() == 0 && !m.as_str().is_empty())
                .map(|m| m.as_str()),
            LabelMatcher::Invalid => None,
        }
    }
}

/// Returns the prefix of `input` matched by `label`, or `None`.
pub fn find_match<'a>(label: &str, input: &'a str) -> Option<&'a str> {
    LabelMatcher::new(label).find(input)
}

/// A successful label match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch<'a> {
    /// Position of the matching label in the slice given to [`find_all_matches`].
    pub index: usize,
    pub matched: &'a str,
}

/// Matches every label against `input` and returns the successes, longest first.
///
/// The sort is stable: labels matching the same length keep the order they were given in.
pub fn find_all_matches<'a, L: AsRef<str>>(labels: &[L], input: &'a str) -> Vec<LabelMatch<'a>> {
    let mut matches: Vec<LabelMatch<'a>> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            find_match(label.as_ref(), input).map(|matched| LabelMatch { index, matched })
        })
        .collect();

    matches.sort_by(|a, b| b.matched.len().cmp(&a.matched.len()));
    matches
}

/// Returns `true` for the symbols that stand for an empty tape cell in a read position.
pub fn is_blank_like(symbol: char) -> bool {
    matches!(symbol, BLANK_SYMBOL | EPSILON_SYMBOL | LAMBDA_SYMBOL)
}

/// Decides whether a Turing label reading `read` applies to the `scanned` tape symbol.
pub fn symbol_matches(read: char, scanned: char) -> bool {
    read == scanned || (scanned == BLANK_SYMBOL && is_blank_like(read))
}
