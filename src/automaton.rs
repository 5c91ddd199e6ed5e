//! The finite-automaton execution engine.
//!
//! A run is computed in full when the engine is constructed. At every step the engine matches
//! all labels leaving the current state against the unconsumed input and follows the longest
//! match; the run is accepted when the input is exhausted in an accepting state.

use log::{debug, trace};
use serde::Serialize;

use crate::analyzer::find_start_state;
use crate::history::{Execution, History, Snapshot};
use crate::matcher::find_all_matches;
use crate::types::{Graph, StateId, Status};

/// One frozen moment of an automaton run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatonStep {
    pub index: usize,
    /// The current state, or `None` when the graph has no unique start state.
    pub state: Option<StateId>,
    /// Input consumed so far.
    pub consumed: String,
    /// Input still to be read.
    pub remaining: String,
    /// Text consumed by the transition that led to this step.
    pub matched: Option<String>,
    /// Index into the graph's transitions of the edge that led to this step.
    pub transition: Option<usize>,
    pub status: Status,
    pub message: String,
}

impl Snapshot for AutomatonStep {
    fn status(&self) -> Status {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// The edge and label chosen for one step.
#[derive(Debug)]
struct Selection<'a> {
    transition: usize,
    to: StateId,
    matched: &'a str,
}

/// A finite automaton together with the complete run over one input string.
#[derive(Debug, Clone)]
pub struct Automaton {
    graph: Graph,
    input: String,
    history: History<AutomatonStep>,
}

impl Automaton {
    /// Runs `graph` over `input` and keeps the resulting history.
    ///
    /// A graph without exactly one start state produces a single rejected step explaining why.
    pub fn new(graph: Graph, input: &str) -> Self {
        let history = simulate(&graph, input);
        debug!(
            "Automaton run over {:?} finished {} after {} step(s)",
            input,
            history.last().status,
            history.len()
        );

        Self {
            graph,
            input: input.to_string(),
            history,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Execution for Automaton {
    type Step = AutomatonStep;

    fn history_ref(&self) -> &History<AutomatonStep> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<AutomatonStep> {
        &mut self.history
    }
}

fn simulate(graph: &Graph, input: &str) -> History<AutomatonStep> {
    let start = match find_start_state(graph) {
        Ok(start) => start,
        Err(e) => {
            return History::from_run(
                Vec::new(),
                AutomatonStep {
                    index: 0,
                    state: None,
                    consumed: String::new(),
                    remaining: input.to_string(),
                    matched: None,
                    transition: None,
                    status: Status::Rejected,
                    message: e.to_string(),
                },
            )
        }
    };

    let mut steps = Vec::new();
    let mut pending = AutomatonStep {
        index: 0,
        state: Some(start.id),
        consumed: String::new(),
        remaining: input.to_string(),
        matched: None,
        transition: None,
        status: Status::Running,
        message: format!("Started in {}", start.label),
    };

    // Each iteration either classifies `pending` as terminal or commits it and moves on. A step
    // is only stored once its status is final.
    let mut state = start.id;
    let last = loop {
        let name = graph.state_name(state);

        if pending.remaining.is_empty() {
            let (status, verdict) = if graph.is_accepting(state) {
                (Status::Accepted, "accepting")
            } else {
                (Status::Rejected, "not accepting")
            };
            pending.status = status;
            pending.message = format!(
                "{}. Input consumed, {} is {}",
                pending.message, name, verdict
            );
            break pending;
        }

        let Some(selection) = select(graph, state, &pending.remaining) else {
            let symbol = pending.remaining.chars().next().unwrap_or_default();
            pending.status = Status::Rejected;
            pending.message = format!(
                "{}. No transition from {} matches '{}'",
                pending.message, name, symbol
            );
            break pending;
        };

        let next = AutomatonStep {
            index: pending.index + 1,
            state: Some(selection.to),
            consumed: format!("{}{}", pending.consumed, selection.matched),
            remaining: pending.remaining[selection.matched.len()..].to_string(),
            matched: Some(selection.matched.to_string()),
            transition: Some(selection.transition),
            status: Status::Running,
            message: format!(
                "Read '{}' in {}, moved to {}",
                selection.matched,
                name,
                graph.state_name(selection.to)
            ),
        };
        trace!("step {}: {}", next.index, next.message);

        state = selection.to;
        steps.push(pending);
        pending = next;
    };

    History::from_run(steps, last)
}

/// Picks the label with the longest match among all labels leaving `state`.
///
/// Candidates are enumerated transition by transition in graph order, then label by label, and
/// the first candidate at the maximal length wins.
fn select<'a>(graph: &Graph, state: StateId, input: &'a str) -> Option<Selection<'a>> {
    let candidates: Vec<(usize, StateId, &str)> = graph
        .outgoing(state)
        .flat_map(|(index, transition)| {
            transition
                .labels
                .iter()
                .map(move |label| (index, transition.to, label.text()))
        })
        .collect();
    let labels: Vec<&str> = candidates.iter().map(|(_, _, label)| *label).collect();

    find_all_matches(&labels, input)
        .into_iter()
        .next()
        .map(|best| {
            let (transition, to, _) = candidates[best.index];
            Selection {
                transition,
                to,
                matched: best.matched,
            }
        })
}
