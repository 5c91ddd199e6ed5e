//! This module provides functions for analyzing a state graph before it is executed. It covers
//! the run preconditions the engines enforce (a unique start state, an accepting state for
//! Turing machines) and the structural checks applied when a machine document is loaded.

use std::collections::{HashSet, VecDeque};
use thiserror::Error;

use crate::label::validate_transition_label;
use crate::types::{EngineError, Graph, Mode, State, StateId};

/// Represents the problems that can be found while analyzing a graph.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// No state is marked as the start state.
    #[error("No start state defined")]
    MissingStartState,
    /// More than one state is marked as the start state, so the run is ambiguous.
    #[error("Multiple start states defined: {0:?}")]
    MultipleStartStates(Vec<StateId>),
    /// No state is marked as accepting.
    #[error("No accepting state defined")]
    NoAcceptingState,
    /// Two states share the same identifier.
    #[error("Duplicate state id: {0}")]
    DuplicateStateId(StateId),
    /// Transitions reference states that are not part of the graph.
    #[error("Transitions reference undefined states: {0:?}")]
    UndefinedStates(Vec<StateId>),
    /// States that cannot be reached from the start state.
    #[error("Unreachable states detected: {0:?}")]
    UnreachableStates(Vec<StateId>),
    /// A label that does not follow the syntax of the graph's mode.
    #[error("Invalid label '{label}' on transition {from} -> {to}: {reason}")]
    InvalidLabel {
        from: StateId,
        to: StateId,
        label: String,
        reason: String,
    },
}

impl AnalysisError {
    /// Returns `true` for defects that make the graph itself malformed, as opposed to
    /// conditions the engines report as a rejected run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::DuplicateStateId(_)
                | AnalysisError::UndefinedStates(_)
                | AnalysisError::InvalidLabel { .. }
        )
    }
}

impl From<AnalysisError> for EngineError {
    /// Converts an `AnalysisError` into an `EngineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        EngineError::ValidationError(error.to_string())
    }
}

/// Analyzes a graph and returns every problem found, in check order.
///
/// An empty result means the graph is runnable. Use [`AnalysisError::is_fatal`] to separate
/// malformed graphs from graphs whose runs will simply be rejected.
pub fn analyze(graph: &Graph, mode: Mode) -> Vec<AnalysisError> {
    let checks: [fn(&Graph) -> Result<(), AnalysisError>; 5] = [
        check_duplicate_ids,
        check_undefined_states,
        check_start_state,
        check_accepting_states,
        check_unreachable_states,
    ];

    let mut errors: Vec<AnalysisError> = checks
        .iter()
        .filter_map(|check| check(graph).err())
        .collect();

    errors.extend(check_labels(graph, mode));
    errors
}

/// Returns the unique start state.
///
/// # Returns
///
/// * `Err(AnalysisError::MissingStartState)` if no state is marked as start.
/// * `Err(AnalysisError::MultipleStartStates)` if the choice is ambiguous.
pub fn find_start_state(graph: &Graph) -> Result<&State, AnalysisError> {
    let starts: Vec<&State> = graph.states.iter().filter(|s| s.is_start).collect();

    match starts.as_slice() {
        [] => Err(AnalysisError::MissingStartState),
        [start] => Ok(*start),
        _ => Err(AnalysisError::MultipleStartStates(
            starts.iter().map(|s| s.id).collect(),
        )),
    }
}

fn check_start_state(graph: &Graph) -> Result<(), AnalysisError> {
    find_start_state(graph).map(|_| ())
}

/// Checks that at least one state is accepting.
pub fn check_accepting_states(graph: &Graph) -> Result<(), AnalysisError> {
    if graph.states.iter().any(|s| s.is_end) {
        Ok(())
    } else {
        Err(AnalysisError::NoAcceptingState)
    }
}

/// Checks that every state id is used once.
fn check_duplicate_ids(graph: &Graph) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();

    graph
        .states
        .iter()
        .find(|state| !seen.insert(state.id))
        .map_or(Ok(()), |state| {
            Err(AnalysisError::DuplicateStateId(state.id))
        })
}

/// Checks that both endpoints of every transition are defined states.
fn check_undefined_states(graph: &Graph) -> Result<(), AnalysisError> {
    let defined: HashSet<StateId> = graph.states.iter().map(|s| s.id).collect();

    let mut undefined: Vec<StateId> = graph
        .transitions
        .iter()
        .flat_map(|t| [t.from, t.to])
        .filter(|id| !defined.contains(id))
        .collect();
    undefined.sort_unstable();
    undefined.dedup();

    if undefined.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UndefinedStates(undefined))
    }
}

/// Finds states that cannot be reached from the start state.
///
/// The check is skipped when there is no unique start state, since that is reported on its own.
fn check_unreachable_states(graph: &Graph) -> Result<(), AnalysisError> {
    let Ok(start) = find_start_state(graph) else {
        return Ok(());
    };

    let mut reachable = HashSet::from([start.id]);
    let mut queue = VecDeque::from([start.id]);

    while let Some(current) = queue.pop_front() {
        for (_, transition) in graph.outgoing(current) {
            if reachable.insert(transition.to) {
                queue.push_back(transition.to);
            }
        }
    }

    let unreachable: Vec<StateId> = graph
        .states
        .iter()
        .map(|s| s.id)
        .filter(|id| !reachable.contains(id))
        .collect();

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UnreachableStates(unreachable))
    }
}

/// Validates every label against the syntax of `mode`.
fn check_labels(graph: &Graph, mode: Mode) -> Vec<AnalysisError> {
    graph
        .transitions
        .iter()
        .flat_map(|t| t.labels.iter().map(move |label| (t, label)))
        .filter_map(|(t, label)| {
            let validation = validate_transition_label(label.text(), mode);
            validation.error.map(|reason| AnalysisError::InvalidLabel {
                from: t.from,
                to: t.to,
                label: label.text().to_string(),
                reason,
            })
        })
        .collect()
}
