//! The results sink contract.

use std::sync::Arc;

use j1939_core::{Outcome, PartResult, StepResult};

/// Receives everything a test run produces.
///
/// Calls arrive strictly in order from a single worker at a time, so an
/// implementation only needs to preserve append order. Every method has an
/// empty default so a sink implements only what it consumes.
pub trait ResultsListener: Send + Sync {
    /// A graded finding attributed to a part and step.
    fn add_outcome(&self, _part_number: u8, _step_number: u8, _outcome: Outcome, _message: &str) {}

    /// One line of human-readable result text. An empty string is a blank line.
    fn on_result(&self, _result: &str) {}

    fn on_results(&self, results: &[String]) {
        for result in results {
            self.on_result(result);
        }
    }

    /// Step progress within a part: `current` of `total`.
    fn on_progress(&self, _current: u32, _total: u32, _message: &str) {}

    /// A milestone such as `Begin Step 1.2. ...`.
    fn on_progress_message(&self, _message: &str) {}

    fn begin_part(&self, _part: &PartResult) {}

    fn end_part(&self, _part: &PartResult) {}

    fn begin_step(&self, _step: &StepResult) {}

    fn end_step(&self, _step: &StepResult) {}

    fn on_complete(&self, _success: bool) {}
}

/// Listener that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResultsListener;

impl ResultsListener for NoOpResultsListener {}

/// Fans every call out to several listeners, in registration order.
#[derive(Clone, Default)]
pub struct CompositeListener {
    listeners: Vec<Arc<dyn ResultsListener>>,
}

impl CompositeListener {
    pub fn new(listeners: Vec<Arc<dyn ResultsListener>>) -> Self {
        Self { listeners }
    }

    pub fn with(mut self, listener: Arc<dyn ResultsListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl ResultsListener for CompositeListener {
    fn add_outcome(&self, part_number: u8, step_number: u8, outcome: Outcome, message: &str) {
        for l in &self.listeners {
            l.add_outcome(part_number, step_number, outcome, message);
        }
    }

    fn on_result(&self, result: &str) {
        for l in &self.listeners {
            l.on_result(result);
        }
    }

    fn on_results(&self, results: &[String]) {
        for l in &self.listeners {
            l.on_results(results);
        }
    }

    fn on_progress(&self, current: u32, total: u32, message: &str) {
        for l in &self.listeners {
            l.on_progress(current, total, message);
        }
    }

    fn on_progress_message(&self, message: &str) {
        for l in &self.listeners {
            l.on_progress_message(message);
        }
    }

    fn begin_part(&self, part: &PartResult) {
        for l in &self.listeners {
            l.begin_part(part);
        }
    }

    fn end_part(&self, part: &PartResult) {
        for l in &self.listeners {
            l.end_part(part);
        }
    }

    fn begin_step(&self, step: &StepResult) {
        for l in &self.listeners {
            l.begin_step(step);
        }
    }

    fn end_step(&self, step: &StepResult) {
        for l in &self.listeners {
            l.end_step(step);
        }
    }

    fn on_complete(&self, success: bool) {
        for l in &self.listeners {
            l.on_complete(success);
        }
    }
}
