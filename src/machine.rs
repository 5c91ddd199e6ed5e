//! This module defines the `TuringMachine` engine, which simulates a single-tape Turing
//! machine described by a state graph. The whole run is computed up front, each step carrying
//! its own snapshot of the tape, so that the run can be replayed in either direction.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::analyzer::{check_accepting_states, find_start_state};
use crate::history::{Execution, History, Snapshot};
use crate::label::{Label, TapeAction};
use crate::matcher::symbol_matches;
use crate::tape::Tape;
use crate::types::{Direction, Graph, StateId, Status, DEFAULT_MAX_STEPS};

/// Settings for a Turing machine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineOptions {
    /// Cell the head starts on. The input is always written from cell 0.
    pub head_position: i64,
    /// Number of transitions applied before the run is stopped with `TIMEOUT`.
    pub max_steps: usize,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            head_position: 0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// The transition label applied to reach a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTransition {
    /// Index of the edge in the graph's transitions.
    pub transition: usize,
    /// Index of the label within that edge.
    pub label: usize,
    pub from: StateId,
    pub to: StateId,
    pub action: TapeAction,
}

/// One frozen moment of a Turing machine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineStep {
    pub index: usize,
    /// The current state, or `None` when the graph has no unique start state.
    pub state: Option<StateId>,
    /// The tape as it was at this step, owned by the step.
    pub tape: Tape,
    pub status: Status,
    pub message: String,
    /// The transition applied to reach this step; `None` for the first and terminal steps.
    pub transition: Option<AppliedTransition>,
}

impl Snapshot for MachineStep {
    fn status(&self) -> Status {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// A label leaving the current state, as reported by [`TuringMachine::available_transitions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTransition {
    pub transition: usize,
    pub label: usize,
    pub to: StateId,
    /// The label text as stored on the edge.
    pub text: String,
    /// The decoded label, or `None` if the text is not a valid `read,write,move` triple.
    pub action: Option<TapeAction>,
    /// Whether the label reads the symbol currently under the head.
    pub matches: bool,
    pub description: String,
}

/// A Turing machine together with its complete run over one input.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    graph: Graph,
    input: String,
    options: MachineOptions,
    history: History<MachineStep>,
}

impl TuringMachine {
    /// Runs `graph` on `input` with the head on cell 0 and the default step ceiling.
    pub fn new(graph: Graph, input: &str) -> Self {
        Self::with_options(graph, input, MachineOptions::default())
    }

    /// Runs `graph` on `input` with explicit options.
    ///
    /// The graph must have exactly one start state and at least one accepting state; otherwise
    /// the history holds a single rejected step whose message names the problem.
    pub fn with_options(graph: Graph, input: &str, options: MachineOptions) -> Self {
        let history = simulate(&graph, input, options);
        debug!(
            "Turing run over {:?} finished {} after {} step(s)",
            input,
            history.last().status,
            history.len()
        );

        Self {
            graph,
            input: input.to_string(),
            options,
            history,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// Lists every label leaving the state of the step under the cursor, and whether each one
    /// reads the symbol currently under the head.
    ///
    /// This only inspects the history; the cursor and the run are left untouched.
    pub fn available_transitions(&self) -> Vec<AvailableTransition> {
        let step = self.history.current();
        let Some(state) = step.state else {
            return Vec::new();
        };
        let scanned = step.tape.read();
        let from = self.graph.state_name(state);

        self.graph
            .outgoing(state)
            .flat_map(|(index, transition)| {
                transition
                    .labels
                    .iter()
                    .enumerate()
                    .map(move |(label, text)| (index, transition.to, label, text))
            })
            .map(|(index, to, label, text)| {
                let to_name = self.graph.state_name(to);
                let (action, description) = match text.text().parse::<TapeAction>() {
                    Ok(action) => (
                        Some(action),
                        format!(
                            "{} -> {}: read '{}', write '{}', move {}",
                            from,
                            to_name,
                            action.read,
                            action.write,
                            describe(action.direction)
                        ),
                    ),
                    Err(e) => (None, format!("{} -> {}: {}", from, to_name, e)),
                };

                AvailableTransition {
                    transition: index,
                    label,
                    to,
                    text: text.text().to_string(),
                    action,
                    matches: action.is_some_and(|a| symbol_matches(a.read, scanned)),
                    description,
                }
            })
            .collect()
    }
}

impl Execution for TuringMachine {
    type Step = MachineStep;

    fn history_ref(&self) -> &History<MachineStep> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<MachineStep> {
        &mut self.history
    }
}

fn describe(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "left",
        Direction::Right => "right",
        Direction::Stay => "none",
    }
}

fn simulate(graph: &Graph, input: &str, options: MachineOptions) -> History<MachineStep> {
    let mut tape = Tape::from_input(input, options.head_position);

    let start = match find_start_state(graph) {
        Ok(start) => start,
        Err(e) => return rejected(None, tape, e.to_string()),
    };
    if let Err(e) = check_accepting_states(graph) {
        return rejected(Some(start.id), tape, e.to_string());
    }

    let mut state = start.id;
    let mut steps = vec![MachineStep {
        index: 0,
        state: Some(state),
        tape: tape.clone(),
        status: Status::Running,
        message: format!("Started in {} with the head on cell {}", start.label, tape.head()),
        transition: None,
    }];

    let last = loop {
        let index = steps.len();
        let scanned = tape.read();
        let name = graph.state_name(state);

        let Some(applied) = select(graph, state, scanned) else {
            let (status, verdict) = if graph.is_accepting(state) {
                (Status::Accepted, "an accepting state")
            } else {
                (Status::Rejected, "a non-accepting state")
            };
            break MachineStep {
                index,
                state: Some(state),
                tape: tape.clone(),
                status,
                message: format!(
                    "No transition from {} reads '{}'. Halted in {}",
                    name, scanned, verdict
                ),
                transition: None,
            };
        };

        // `index - 1` transitions have been applied so far.
        if index > options.max_steps {
            break MachineStep {
                index,
                state: Some(state),
                tape: tape.clone(),
                status: Status::Timeout,
                message: format!("Stopped after {} steps without halting", options.max_steps),
                transition: None,
            };
        }

        let action = applied.action;
        tape.write(action.write);
        tape.move_head(action.direction);
        state = applied.to;

        let step = MachineStep {
            index,
            state: Some(state),
            tape: tape.clone(),
            status: Status::Running,
            message: format!(
                "Read '{}', wrote '{}', moved {}, now in {}",
                scanned,
                action.write,
                describe(action.direction),
                graph.state_name(state)
            ),
            transition: Some(applied),
        };
        trace!("step {}: {}", step.index, step.message);
        steps.push(step);
    };

    History::from_run(steps, last)
}

fn rejected(state: Option<StateId>, tape: Tape, message: String) -> History<MachineStep> {
    History::from_run(
        Vec::new(),
        MachineStep {
            index: 0,
            state,
            tape,
            status: Status::Rejected,
            message,
            transition: None,
        },
    )
}

/// Finds the first label, in edge order and then label order, that reads `scanned`.
fn select(graph: &Graph, state: StateId, scanned: char) -> Option<AppliedTransition> {
    graph.outgoing(state).find_map(|(index, transition)| {
        transition
            .labels
            .iter()
            .enumerate()
            .find_map(|(label, text)| {
                let action = decode(text)?;
                symbol_matches(action.read, scanned).then_some(AppliedTransition {
                    transition: index,
                    label,
                    from: transition.from,
                    to: transition.to,
                    action,
                })
            })
    })
}

fn decode(label: &Label) -> Option<TapeAction> {
    match label.text().parse::<TapeAction>() {
        Ok(action) => Some(action),
        Err(e) => {
            debug!("Skipping label '{}': {}", label, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{State, Transition, BLANK_SYMBOL};

    fn create_test_graph(transitions: Vec<Transition>) -> Graph {
        Graph::new(
            vec![State::new(0, "q0").start(), State::new(1, "q1").end()],
            transitions,
        )
    }

    #[test]
    fn test_accepts_after_moving_onto_blank() {
        let graph = create_test_graph(vec![Transition::new(0, 1, ["1,1,R"])]);
        let machine = TuringMachine::new(graph, "1");
        let history = machine.history();

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].tape.read(), '1');
        assert_eq!(history[0].transition, None);

        assert_eq!(history[1].state, Some(1));
        assert_eq!(history[1].status, Status::Running);
        assert_eq!(history[1].tape.head(), 1);
        assert_eq!(history[1].tape.read(), BLANK_SYMBOL);
        assert_eq!(history[1].transition.as_ref().map(|t| t.to), Some(1));

        assert_eq!(history[2].status, Status::Accepted);
        assert_eq!(history[2].state, Some(1));
        assert_eq!(machine.outcome(), Status::Accepted);
    }

    #[test]
    fn test_rejects_when_halting_outside_accepting_state() {
        let graph = create_test_graph(vec![Transition::new(0, 1, ["1,1,R"])]);
        let machine = TuringMachine::new(graph, "0");

        assert_eq!(machine.history().len(), 2);
        assert_eq!(machine.outcome(), Status::Rejected);
        assert!(machine.final_step().message.contains("q0"));
    }

    #[test]
    fn test_times_out_at_step_ceiling() {
        let graph = create_test_graph(vec![Transition::new(0, 0, ["□,□,S"])]);
        let machine = TuringMachine::new(graph.clone(), "");

        assert_eq!(machine.history().len(), DEFAULT_MAX_STEPS + 2);
        assert_eq!(machine.outcome(), Status::Timeout);
        assert_eq!(machine.history()[DEFAULT_MAX_STEPS].status, Status::Running);

        let options = MachineOptions {
            max_steps: 5,
            ..MachineOptions::default()
        };
        let machine = TuringMachine::with_options(graph, "", options);
        assert_eq!(machine.history().len(), 7);
        assert_eq!(machine.outcome(), Status::Timeout);
    }

    #[test]
    fn test_halting_on_the_last_allowed_step_is_not_a_timeout() {
        let graph = create_test_graph(vec![Transition::new(0, 1, ["a,a,R"])]);
        let options = MachineOptions {
            max_steps: 1,
            ..MachineOptions::default()
        };
        let machine = TuringMachine::with_options(graph, "a", options);

        assert_eq!(machine.outcome(), Status::Accepted);
    }

    #[test]
    fn test_epsilon_and_blank_read_empty_cells() {
        for read in ["□", "ε", "λ", ""] {
            let label = format!("{read},x,S");
            let machine = TuringMachine::new(
                create_test_graph(vec![Transition::new(0, 1, [label.as_str()])]),
                "",
            );

            assert_eq!(machine.history()[1].tape.read(), 'x', "label {label}");
            assert_eq!(machine.outcome(), Status::Accepted, "label {label}");
        }
    }

    #[test]
    fn test_first_matching_label_wins() {
        let graph = Graph::new(
            vec![
                State::new(0, "q0").start(),
                State::new(1, "q1").end(),
                State::new(2, "q2").end(),
            ],
            vec![
                Transition::new(0, 1, ["0,0,R", "1,a,R"]),
                Transition::new(0, 2, ["1,b,R"]),
            ],
        );
        let machine = TuringMachine::new(graph, "1");
        let applied = machine.history()[1].transition.clone().unwrap();

        assert_eq!((applied.transition, applied.label), (0, 1));
        assert_eq!(machine.history()[1].tape.read_at(0), 'a');
    }

    #[test]
    fn test_malformed_label_is_skipped() {
        let machine = TuringMachine::new(
            create_test_graph(vec![Transition::new(0, 1, ["1,1", "1,0,R"])]),
            "1",
        );

        assert_eq!(machine.history()[1].tape.read_at(0), '0');
        assert_eq!(machine.outcome(), Status::Accepted);
    }

    #[test]
    fn test_head_moves_left_of_the_input() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["1,1,L"]),
            Transition::new(0, 1, ["□,#,R"]),
        ]);
        let machine = TuringMachine::with_options(
            graph,
            "01",
            MachineOptions {
                head_position: 1,
                ..MachineOptions::default()
            },
        );
        let history = machine.history();

        // q0 reads '1' at cell 1, moves to cell 0, reads '0' and halts.
        assert_eq!(history[0].tape.head(), 1);
        assert_eq!(history[1].tape.head(), 0);
        assert_eq!(machine.outcome(), Status::Rejected);
    }

    #[test]
    fn test_writes_before_the_first_cell() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["1,1,L"]),
            Transition::new(0, 1, ["□,#,R"]),
        ]);
        let machine = TuringMachine::new(graph, "1");
        let last = machine.final_step();

        assert_eq!(last.tape.read_at(-1), '#');
        assert_eq!(last.tape.bounds(), (-1, 0));
        assert_eq!(last.tape.to_string(), "#1");
        assert_eq!(machine.outcome(), Status::Accepted);
    }

    #[test]
    fn test_preconditions_reject_without_running() {
        let graph = Graph::new(vec![State::new(0, "q0").start()], vec![]);
        let machine = TuringMachine::new(graph, "1");

        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.outcome(), Status::Rejected);
        assert_eq!(machine.current_state().message, "No accepting state defined");
        assert_eq!(machine.current_state().tape.read(), '1');

        let graph = Graph::new(vec![State::new(0, "q0").end()], vec![]);
        let machine = TuringMachine::new(graph, "1");
        assert_eq!(machine.current_state().state, None);
        assert_eq!(machine.current_state().message, "No start state defined");
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["a,b,R"]),
            Transition::new(0, 1, ["□,□,S"]),
        ]);
        let mut machine = TuringMachine::new(graph, "aa");

        machine.step_forward();
        let mut tape = machine.current_state().tape.clone();
        tape.write('z');

        assert_eq!(machine.history()[0].tape.read_at(0), 'a');
        assert_eq!(machine.history()[1].tape.read_at(0), 'b');
        assert_eq!(machine.history()[1].tape.read_at(1), 'a');
        assert_eq!(machine.history()[2].tape.read_at(1), 'b');
        assert_ne!(machine.current_state().tape, tape);
    }

    #[test]
    fn test_available_transitions_follow_cursor() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["a,a,R", "b,b,R"]),
            Transition::new(0, 1, ["□,□,S", "oops"]),
        ]);
        let mut machine = TuringMachine::new(graph, "b");

        let available = machine.available_transitions();
        assert_eq!(available.len(), 4);
        let matching: Vec<&str> = available
            .iter()
            .filter(|t| t.matches)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(matching, vec!["b,b,R"]);
        assert!(available[3].action.is_none());
        assert!(available[0].description.contains("read 'a'"));

        machine.step_forward();
        let matching: Vec<String> = machine
            .available_transitions()
            .into_iter()
            .filter(|t| t.matches)
            .map(|t| t.text)
            .collect();
        assert_eq!(matching, vec!["□,□,S"]);
        assert_eq!(machine.current_step(), 1);
    }

    #[test]
    fn test_reset_rewinds_without_recomputing() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["1,0,R"]),
            Transition::new(0, 1, ["□,□,S"]),
        ]);
        let mut machine = TuringMachine::new(graph, "111");
        let before = machine.history().to_vec();

        while machine.step_forward().is_some() {}
        assert_eq!(machine.current_step(), before.len() - 1);
        assert!(machine.step_forward().is_none());

        machine.reset();
        assert_eq!(machine.current_step(), 0);
        assert!(machine.step_backward().is_none());
        assert_eq!(machine.history(), before.as_slice());
        assert_eq!(machine.final_step().tape.to_string(), "000□");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let graph = create_test_graph(vec![
            Transition::new(0, 0, ["0,1,R", "1,0,R"]),
            Transition::new(0, 1, ["□,□,L"]),
        ]);

        let first = TuringMachine::new(graph.clone(), "0110");
        let second = TuringMachine::new(graph, "0110");
        assert_eq!(first.history(), second.history());
        assert_eq!(first.final_step().tape.to_string(), "1001□");
    }
}
