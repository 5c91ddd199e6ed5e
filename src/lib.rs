//! This crate provides the execution core of a visual editor for finite automata and Turing
//! machines. Each engine takes a snapshot of the editor's graph plus an input, computes the
//! complete run eagerly, and exposes a cursor for stepping forwards and backwards through it.

pub mod analyzer;
pub mod automaton;
pub mod document;
pub mod history;
pub mod label;
pub mod loader;
pub mod machine;
pub mod matcher;
pub mod samples;
pub mod tape;
pub mod types;

/// Re-exports the graph analysis entry points from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the finite-automaton engine and its step type.
pub use automaton::{Automaton, AutomatonStep};
/// Re-exports machine documents and the engine-agnostic `Run`.
pub use document::{Document, Run};
/// Re-exports the cursor contract shared by both engines.
pub use history::{Execution, History, Snapshot};
/// Re-exports label types and the editor-facing validation routine.
pub use label::{label_text, validate_transition_label, Label, LabelValidation, TapeAction};
/// Re-exports the `DocumentLoader` struct from the loader module.
pub use loader::DocumentLoader;
/// Re-exports the Turing-machine engine and its associated types.
pub use machine::{AvailableTransition, MachineOptions, MachineStep, TuringMachine};
/// Re-exports the label matching functions.
pub use matcher::{find_all_matches, find_match};
/// Re-exports the samples registry.
pub use samples::{SampleRegistry, SAMPLES};
/// Re-exports the sparse tape.
pub use tape::Tape;
/// Re-exports the graph model, status vocabulary and error type.
pub use types::{Direction, EngineError, Graph, Mode, State, StateId, Status, Transition};
