//! A machine document bundles a graph with its mode, a default input and run options. It is
//! the unit the loader reads and the samples registry ships.

use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;
use crate::history::Execution;
use crate::machine::{MachineOptions, TuringMachine};
use crate::types::{Graph, Mode, State, Status, Transition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub mode: Mode,
    pub states: Vec<State>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Input used when the caller does not supply one.
    #[serde(default)]
    pub input: String,
    /// Turing machine options; ignored for automata.
    #[serde(default)]
    pub options: MachineOptions,
}

impl Document {
    /// A snapshot of the document's graph.
    pub fn graph(&self) -> Graph {
        Graph::new(self.states.clone(), self.transitions.clone())
    }

    /// Runs the document on its own input with its own options.
    pub fn run(&self) -> Run {
        self.run_with(&self.input, self.options)
    }

    /// Runs the document with the engine matching its mode.
    pub fn run_with(&self, input: &str, options: MachineOptions) -> Run {
        match self.mode {
            Mode::Automaton => Run::Automaton(Automaton::new(self.graph(), input)),
            Mode::Turing => Run::Turing(TuringMachine::with_options(self.graph(), input, options)),
        }
    }
}

/// A computed run of either engine.
#[derive(Debug, Clone)]
pub enum Run {
    Automaton(Automaton),
    Turing(TuringMachine),
}

impl Run {
    pub fn outcome(&self) -> Status {
        match self {
            Run::Automaton(automaton) => automaton.outcome(),
            Run::Turing(machine) => machine.outcome(),
        }
    }

    /// Number of steps in the run's history.
    pub fn len(&self) -> usize {
        match self {
            Run::Automaton(automaton) => automaton.history().len(),
            Run::Turing(machine) => machine.history().len(),
        }
    }

    /// Always `false`: every run has at least one step.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
