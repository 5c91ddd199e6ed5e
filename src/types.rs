//! This module defines the core data structures shared by both execution engines: the graph
//! of states and transitions, the status vocabulary of a run, and the crate's error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::label::Label;

/// The symbol stored in every tape cell that was never written.
pub const BLANK_SYMBOL: char = '□';
/// Epsilon, accepted in Turing read positions as a synonym for blank.
pub const EPSILON_SYMBOL: char = 'ε';
/// Lambda, accepted in Turing read positions as a synonym for blank.
pub const LAMBDA_SYMBOL: char = 'λ';
/// The default ceiling on applied transitions before a Turing run times out.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Caller-assigned identity of a state.
pub type StateId = u32;

/// A node of the automaton or Turing machine graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Stable identity used by transitions to refer to this state.
    pub id: StateId,
    /// Display name, used in step messages.
    pub label: String,
    /// Marks the state a run starts in. Exactly one state should carry it.
    #[serde(default)]
    pub is_start: bool,
    /// Marks an accepting state. Any number of states may carry it.
    #[serde(default)]
    pub is_end: bool,
    /// Free-form annotation, ignored by the engines.
    #[serde(default)]
    pub note: String,
}

impl State {
    /// Creates a plain state with no flags set.
    pub fn new(id: StateId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            is_start: false,
            is_end: false,
            note: String::new(),
        }
    }

    /// Marks this state as the start state.
    pub fn start(mut self) -> Self {
        self.is_start = true;
        self
    }

    /// Marks this state as accepting.
    pub fn end(mut self) -> Self {
        self.is_end = true;
        self
    }
}

/// A directed edge carrying one or more labels.
///
/// For automata, labels are literal strings or patterns; for Turing machines they are
/// `read,write,move` triples. Label order is significant for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub labels: Vec<Label>,
}

impl Transition {
    /// Creates a transition whose labels are all plain text.
    pub fn new<I, L>(from: StateId, to: StateId, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            from,
            to,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// An immutable snapshot of the editor graph handed to an engine.
///
/// The order of `transitions` is creation order, and it is the order in which the engines
/// enumerate candidates whenever two labels tie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

impl Graph {
    pub fn new(states: Vec<State>, transitions: Vec<Transition>) -> Self {
        Self {
            states,
            transitions,
        }
    }

    /// Looks up a state by its identifier.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|state| state.id == id)
    }

    /// Returns `true` if `id` names an accepting state.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.state(id).is_some_and(|state| state.is_end)
    }

    /// Returns the display label of a state, falling back to its numeric id.
    pub fn state_name(&self, id: StateId) -> String {
        self.state(id)
            .map(|state| state.label.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    /// Iterates, in creation order, over the transitions leaving `id` together with their
    /// index in `transitions`.
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = (usize, &Transition)> {
        self.transitions
            .iter()
            .enumerate()
            .filter(move |(_, transition)| transition.from == id)
    }
}

/// Status of a single history step.
///
/// The serialized and displayed forms are the literal strings the UI branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Running,
    Accepted,
    Rejected,
    /// Turing machines only: the step ceiling was reached.
    Timeout,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Running => "RUNNING",
            Status::Accepted => "ACCEPTED",
            Status::Rejected => "REJECTED",
            Status::Timeout => "TIMEOUT",
        }
    }

    /// Returns `true` for every status other than `Running`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The signed head displacement for this direction.
    pub fn offset(&self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    /// The canonical single-letter form used in normalized labels.
    pub fn as_char(&self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Parses `L`, `R`, `M` or `S` in either case. `M` and `S` both mean stay.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "M" | "S" => Ok(Direction::Stay),
            other => Err(format!("Unsupported move: '{other}'")),
        }
    }
}

/// Which label syntax applies to a graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Literal or pattern labels consumed from an input string.
    #[default]
    Automaton,
    /// `read,write,move` labels driving a tape.
    Turing,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Automaton => f.write_str("automaton"),
            Mode::Turing => f.write_str("turing"),
        }
    }
}

/// Errors surfaced to callers as `Result`s.
///
/// Data-driven outcomes (no start state, no matching transition, runaway machines) are never
/// reported through this type; they are encoded as terminal steps in the run's history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Indicates a machine document that could not be decoded.
    #[error("Document parsing error: {0}")]
    ParseError(String),
    /// Indicates a structurally invalid graph, such as edges to undefined states.
    #[error("Graph validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
