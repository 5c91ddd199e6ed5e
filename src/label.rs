//! Transition labels: the label value carried by an edge, the decoded form of Turing
//! `read,write,move` triples, and the validation routine the editor runs before a label is
//! handed to an engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::matcher::{compile_pattern, is_pattern};
use crate::types::{Direction, Mode, BLANK_SYMBOL, EPSILON_SYMBOL, LAMBDA_SYMBOL};

/// A label as stored on a transition.
///
/// The editor stores either a bare string or an object with a `text` field; both shapes
/// deserialize into this type and expose the same text through [`Label::text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Annotated(AnnotatedLabel),
}

/// A label object carrying extra editor metadata next to its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLabel {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Label {
    pub fn text(&self) -> &str {
        match self {
            Label::Text(text) => text,
            Label::Annotated(annotated) => &annotated.text,
        }
    }
}

/// Returns the text of a label regardless of its shape.
pub fn label_text(label: &Label) -> &str {
    label.text()
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Reasons a Turing label fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("Expected 'read,write,move' but found {0} part(s)")]
    WrongArity(usize),
    #[error("Symbol '{0}' must be a single character or blank")]
    InvalidSymbol(String),
    #[error("Move '{0}' must be one of L, R, M or S")]
    InvalidMove(String),
    #[error("Label cannot be empty")]
    Empty,
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// The decoded form of a Turing label `read,write,move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeAction {
    /// Symbol that must be under the head. `□`, `ε` and `λ` all match a blank cell.
    pub read: char,
    /// Symbol written before moving. Always `□` when the label erases the cell.
    pub write: char,
    pub direction: Direction,
}

impl TapeAction {
    /// The canonical text of this action, e.g. `1,□,R`.
    pub fn normalized(&self) -> String {
        format!("{},{},{}", self.read, self.write, self.direction.as_char())
    }
}

impl FromStr for TapeAction {
    type Err = LabelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(LabelError::WrongArity(parts.len()));
        }

        let read = parse_symbol(parts[0])?;
        let write = match parse_symbol(parts[1])? {
            EPSILON_SYMBOL | LAMBDA_SYMBOL => BLANK_SYMBOL,
            symbol => symbol,
        };
        let direction = parts[2]
            .parse::<Direction>()
            .map_err(|_| LabelError::InvalidMove(parts[2].trim().to_string()))?;

        Ok(TapeAction {
            read,
            write,
            direction,
        })
    }
}

impl fmt::Display for TapeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

/// Parses one tape symbol. Empty text, `□` and `blank` all denote the blank symbol.
fn parse_symbol(raw: &str) -> Result<char, LabelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("blank") {
        return Ok(BLANK_SYMBOL);
    }

    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(LabelError::InvalidSymbol(trimmed.to_string())),
    }
}

/// Outcome of [`validate_transition_label`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelValidation {
    pub is_valid: bool,
    pub error: Option<String>,
    pub normalized_label: Option<String>,
}

impl LabelValidation {
    fn valid(normalized: String) -> Self {
        Self {
            is_valid: true,
            error: None,
            normalized_label: Some(normalized),
        }
    }

    fn invalid(error: LabelError) -> Self {
        Self {
            is_valid: false,
            error: Some(error.to_string()),
            normalized_label: None,
        }
    }
}

/// Checks label text typed into the editor and returns its normalized form.
///
/// Automaton labels must be non-empty, and patterns must compile. Turing labels must decode
/// as `read,write,move`; the normalized text spells blanks as `□` and the move in upper case.
pub fn validate_transition_label(text: &str, mode: Mode) -> LabelValidation {
    let result = match mode {
        Mode::Automaton => validate_automaton_label(text),
        Mode::Turing => text.parse::<TapeAction>().map(|action| action.normalized()),
    };

    match result {
        Ok(normalized) => LabelValidation::valid(normalized),
        Err(error) => LabelValidation::invalid(error),
    }
}

fn validate_automaton_label(text: &str) -> Result<String, LabelError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LabelError::Empty);
    }

    if is_pattern(trimmed) {
        compile_pattern(trimmed).map_err(|e| LabelError::InvalidPattern(e.to_string()))?;
    }

    Ok(trimmed.to_string())
}
