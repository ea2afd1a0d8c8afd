//! In-memory recording listener for tests.

use std::sync::Mutex;
use tokio::sync::Notify;

use j1939_core::{ActionOutcome, Outcome, PartResult, StepResult};

use crate::listener::ResultsListener;
use crate::types::ResultEvent;

#[derive(Default)]
struct Recorded {
    events: Vec<ResultEvent>,
    last_progress: Option<(u32, u32)>,
    completed: Option<bool>,
}

/// Records every call as a [`ResultEvent`] in arrival order.
///
/// Progress must run `1..=total` by exactly one per call and may restart at
/// 1 only after the previous sequence reached its total; anything else is a
/// broken step sequence and panics.
#[derive(Default)]
pub struct TestResultsListener {
    recorded: Mutex<Recorded>,
    complete: Notify,
}

impl TestResultsListener {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: ResultEvent) {
        self.lock().events.push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<ResultEvent> {
        self.lock().events.clone()
    }

    pub fn outcomes(&self) -> Vec<ActionOutcome> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                ResultEvent::Outcome { outcome, message, .. } => {
                    Some(ActionOutcome::new(*outcome, message.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                ResultEvent::Result { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Result lines joined with newlines.
    pub fn results_text(&self) -> String {
        self.results().join("\n")
    }

    pub fn milestones(&self) -> Vec<String> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                ResultEvent::Milestone { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<(u32, u32)> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                ResultEvent::Progress { current, total, .. } => Some((*current, *total)),
                _ => None,
            })
            .collect()
    }

    /// `Some(success)` once `on_complete` has been called.
    pub fn completed(&self) -> Option<bool> {
        self.lock().completed
    }

    /// Wait until `on_complete` is called and return its flag.
    pub async fn wait_for_complete(&self) -> bool {
        loop {
            let notified = self.complete.notified();
            if let Some(success) = self.completed() {
                return success;
            }
            notified.await;
        }
    }
}

impl ResultsListener for TestResultsListener {
    fn add_outcome(&self, part_number: u8, step_number: u8, outcome: Outcome, message: &str) {
        self.record(ResultEvent::Outcome {
            part_number,
            step_number,
            outcome,
            message: message.to_string(),
        });
    }

    fn on_result(&self, result: &str) {
        self.record(ResultEvent::Result {
            text: result.to_string(),
        });
    }

    fn on_progress(&self, current: u32, total: u32, message: &str) {
        let mut recorded = self.lock();
        let expected = match recorded.last_progress {
            Some((last, last_total)) if last < last_total => (last + 1, last_total),
            _ => (1, total),
        };
        if (current, total) != expected || current > total {
            drop(recorded);
            panic!(
                "progress ({}, {}) out of sequence, expected ({}, {})",
                current, total, expected.0, expected.1
            );
        }
        recorded.last_progress = Some((current, total));
        recorded.events.push(ResultEvent::Progress {
            current,
            total,
            message: message.to_string(),
        });
    }

    fn on_progress_message(&self, message: &str) {
        self.record(ResultEvent::Milestone {
            message: message.to_string(),
        });
    }

    fn begin_part(&self, part: &PartResult) {
        self.record(ResultEvent::begin_part(part));
    }

    fn end_part(&self, part: &PartResult) {
        self.record(ResultEvent::end_part(part));
    }

    fn begin_step(&self, step: &StepResult) {
        self.record(ResultEvent::begin_step(step));
    }

    fn end_step(&self, step: &StepResult) {
        self.record(ResultEvent::end_step(step));
    }

    fn on_complete(&self, success: bool) {
        {
            let mut recorded = self.lock();
            recorded.completed = Some(success);
            recorded.events.push(ResultEvent::Complete { success });
        }
        self.complete.notify_waiters();
    }
}
