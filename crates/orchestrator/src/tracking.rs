use std::sync::Mutex;

use events::ResultsListener;
use j1939_core::{ActionOutcome, Outcome, PartResult, StepResult};

/// Forwards to an inner listener and attributes outcomes to the step
/// currently running.
pub(crate) struct TrackingListener<'a> {
    inner: &'a dyn ResultsListener,
    current: Mutex<Option<StepResult>>,
}

impl<'a> TrackingListener<'a> {
    pub(crate) fn new(inner: &'a dyn ResultsListener) -> Self {
        Self {
            inner,
            current: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StepResult>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn start(&self, step: StepResult) {
        *self.lock() = Some(step);
    }

    /// Take the current step result, frozen.
    pub(crate) fn finish(&self) -> Option<StepResult> {
        let mut step = self.lock().take()?;
        step.complete();
        Some(step)
    }
}

impl ResultsListener for TrackingListener<'_> {
    fn add_outcome(&self, part_number: u8, step_number: u8, outcome: Outcome, message: &str) {
        if let Some(step) = self.lock().as_mut() {
            if step.part_number == part_number && step.step_number == step_number {
                step.add_outcome(ActionOutcome::new(outcome, message));
            }
        }
        self.inner.add_outcome(part_number, step_number, outcome, message);
    }

    fn on_result(&self, result: &str) {
        self.inner.on_result(result);
    }

    fn on_results(&self, results: &[String]) {
        self.inner.on_results(results);
    }

    fn on_progress(&self, current: u32, total: u32, message: &str) {
        self.inner.on_progress(current, total, message);
    }

    fn on_progress_message(&self, message: &str) {
        self.inner.on_progress_message(message);
    }

    fn begin_part(&self, part: &PartResult) {
        self.inner.begin_part(part);
    }

    fn end_part(&self, part: &PartResult) {
        self.inner.end_part(part);
    }

    fn begin_step(&self, step: &StepResult) {
        self.inner.begin_step(step);
    }

    fn end_step(&self, step: &StepResult) {
        self.inner.end_step(step);
    }

    fn on_complete(&self, success: bool) {
        self.inner.on_complete(success);
    }
}
