//! The precomputed step history of a run and the cursor used to navigate it.
//!
//! Both engines compute their whole run at construction time. Navigation afterwards only
//! moves an index, so stepping backwards is as cheap as stepping forwards and never re-runs
//! the machine.

use crate::types::Status;

/// A never-empty sequence of steps with a cursor.
///
/// Only the engine that computes a run can create a history; consumers see its steps
/// through a shared slice.
#[derive(Debug, Clone, PartialEq)]
pub struct History<S> {
    steps: Vec<S>,
    cursor: usize,
}

impl<S> History<S> {
    /// Seals a computed run: the steps taken so far followed by the terminal step. The cursor
    /// starts on the first step.
    pub(crate) fn from_run(mut steps: Vec<S>, last: S) -> Self {
        steps.push(last);
        Self { steps, cursor: 0 }
    }

    /// Moves the cursor one step forward and returns the new step.
    ///
    /// Returns `None` without moving when the cursor is already on the last step.
    pub fn step_forward(&mut self) -> Option<&S> {
        if self.is_at_end() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Moves the cursor one step back and returns the new step.
    ///
    /// Returns `None` without moving when the cursor is already on the first step.
    pub fn step_backward(&mut self) -> Option<&S> {
        if self.is_at_start() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Moves the cursor to `index`, or returns `None` if it is out of bounds.
    pub fn seek(&mut self, index: usize) -> Option<&S> {
        if index >= self.steps.len() {
            return None;
        }
        self.cursor = index;
        Some(self.current())
    }

    /// Puts the cursor back on the initial step.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn current(&self) -> &S {
        &self.steps[self.cursor]
    }

    /// The zero-based cursor position.
    pub fn current_step(&self) -> usize {
        self.cursor
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn last(&self) -> &S {
        &self.steps[self.steps.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: a history holds at least its initial step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }
}

/// A step stored in a history.
pub trait Snapshot {
    fn status(&self) -> Status;
    fn message(&self) -> &str;
}

/// The navigation surface shared by both engines.
pub trait Execution {
    type Step: Snapshot;

    fn history_ref(&self) -> &History<Self::Step>;
    fn history_mut(&mut self) -> &mut History<Self::Step>;

    fn step_forward(&mut self) -> Option<&Self::Step> {
        self.history_mut().step_forward()
    }

    fn step_backward(&mut self) -> Option<&Self::Step> {
        self.history_mut().step_backward()
    }

    /// The step under the cursor.
    fn current_state(&self) -> &Self::Step {
        self.history_ref().current()
    }

    /// Every step of the run, in order.
    fn history(&self) -> &[Self::Step] {
        self.history_ref().steps()
    }

    fn current_step(&self) -> usize {
        self.history_ref().current_step()
    }

    /// Rewinds the cursor to the initial step without recomputing the run.
    fn reset(&mut self) {
        self.history_mut().rewind()
    }

    fn final_step(&self) -> &Self::Step {
        self.history_ref().last()
    }

    /// The status the run terminated with.
    fn outcome(&self) -> Status {
        self.final_step().status()
    }
}
