//! Part orchestration.
//!
//! A [`PartController`] owns the ordered steps of one part. `execute` hands
//! a single task to the configured submitter and returns; the task walks the
//! steps in order on whatever thread the submitter provides.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use events::{CompositeListener, ResultsListener};
use j1939_core::{Lookup, Outcome, PartResult, StepResult};

use crate::bus::{Bus, BusAware};
use crate::error::{OrchestratorError, Result};
use crate::executor::TaskSubmitter;
use crate::report::report_outcome;
use crate::step::StepController;
use crate::tracking::TrackingListener;

pub struct PartController {
    part_number: u8,
    steps: Vec<Arc<dyn StepController>>,
    collaborators: Vec<Arc<dyn BusAware>>,
    submitter: Arc<dyn TaskSubmitter>,
}

impl PartController {
    pub fn new(part_number: u8, submitter: Arc<dyn TaskSubmitter>) -> Self {
        Self {
            part_number,
            steps: Vec::new(),
            collaborators: Vec::new(),
            submitter,
        }
    }

    pub fn with_step(mut self, step: Arc<dyn StepController>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_steps(mut self, steps: Vec<Arc<dyn StepController>>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Register a collaborator that receives the bus handle on `execute`.
    pub fn with_collaborator(mut self, collaborator: Arc<dyn BusAware>) -> Self {
        self.collaborators.push(collaborator);
        self
    }

    pub fn part_number(&self) -> u8 {
        self.part_number
    }

    pub fn part_name(&self) -> &'static str {
        Lookup::part_name(self.part_number as i32)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Hand the bus to every registered collaborator.
    pub fn configure_bus(&self, bus: &Arc<dyn Bus>) {
        for collaborator in &self.collaborators {
            collaborator.set_bus(Arc::clone(bus));
        }
    }

    /// Submit the part for execution and return immediately.
    ///
    /// Every listener call goes to both `listener` and `report`. When the
    /// task finishes it reports `on_complete(success)`, where success means
    /// no step failed and the step sequence was intact.
    pub fn execute(
        &self,
        listener: Arc<dyn ResultsListener>,
        bus: Arc<dyn Bus>,
        report: Arc<dyn ResultsListener>,
    ) {
        self.configure_bus(&bus);

        let run = PartRun {
            part_number: self.part_number,
            steps: self.steps.clone(),
        };
        let sink = CompositeListener::new(vec![listener, report]);

        info!(
            part = self.part_number,
            steps = self.steps.len(),
            "Submitting part for execution"
        );
        self.submitter.submit(Box::new(move || {
            let success = match run.run(&sink, &bus) {
                Ok(result) => result.outcome() != Outcome::Fail,
                Err(e) => {
                    error!(part = run.part_number, error = %e, "Part execution halted");
                    sink.on_result(&e.to_string());
                    false
                }
            };
            sink.on_complete(success);
        }));
    }

    /// Run all steps on the calling thread.
    ///
    /// Used by `execute` inside the submitted task and by callers that
    /// sequence several parts in one task.
    pub fn run(&self, listener: &dyn ResultsListener, bus: &Arc<dyn Bus>) -> Result<PartResult> {
        PartRun {
            part_number: self.part_number,
            steps: self.steps.clone(),
        }
        .run(listener, bus)
    }
}

struct PartRun {
    part_number: u8,
    steps: Vec<Arc<dyn StepController>>,
}

impl PartRun {
    fn run(&self, listener: &dyn ResultsListener, bus: &Arc<dyn Bus>) -> Result<PartResult> {
        if self.steps.is_empty() {
            return Err(OrchestratorError::EmptyPart(self.part_number));
        }

        let tracker = TrackingListener::new(listener);
        let mut part_result = PartResult::new(self.part_number);
        let total = self.steps.len();

        info!(part = self.part_number, name = %part_result.name, "Part started");

        for (index, step) in self.steps.iter().enumerate() {
            let step_number = step.step_number();
            if step_number as usize != index + 1 || step.total_steps() as usize != total {
                let err = OrchestratorError::StepSequence {
                    part: self.part_number,
                    expected: index + 1,
                    expected_total: total,
                    step: step_number,
                    total: step.total_steps(),
                };
                error!(part = self.part_number, error = %err, "Broken step sequence");
                return Err(err);
            }

            if index == 0 {
                tracker.begin_part(&part_result);
                tracker.on_progress_message(&format!("Begin Part: {}", part_result.name));
            }

            let step_result = StepResult::new(self.part_number, step_number);
            let title = step_result.title();
            tracker.start(step_result.clone());
            tracker.begin_step(&step_result);
            tracker.on_progress_message(&format!("Begin Step {}", title));
            tracker.on_results(&framed(format!("Start Step {}", title)));

            debug!(part = self.part_number, step = step_number, "Running step");
            let outcome = catch_unwind(AssertUnwindSafe(|| step.run(&tracker, bus)))
                .unwrap_or_else(|panic| {
                    Err(OrchestratorError::StepPanicked {
                        part: self.part_number,
                        step: step_number,
                        reason: panic_message(panic.as_ref()),
                    })
                });
            if let Err(e) = outcome {
                warn!(
                    part = self.part_number,
                    step = step_number,
                    error = %e,
                    "Step failed, continuing with next step"
                );
                report_outcome(
                    &tracker,
                    self.part_number,
                    step_number,
                    Outcome::Fail,
                    &step_result.section(),
                    &e.to_string(),
                );
            }

            tracker.on_progress(step_number as u32, total as u32, &format!("Step {}", title));

            let step_result = tracker.finish().unwrap_or(step_result);
            tracker.end_step(&step_result);
            tracker.on_progress_message(&format!("End Step {}", title));
            tracker.on_results(&framed(format!("End Step {}", title)));

            debug!(
                part = self.part_number,
                step = step_number,
                outcome = %step_result.outcome(),
                "Step completed"
            );
            part_result.add_step(step_result);
        }

        part_result.complete();
        tracker.end_part(&part_result);
        tracker.on_progress_message(&format!("End Part: {}", part_result.name));
        tracker.on_results(&framed(format!("End {}", part_result.name)));

        info!(
            part = self.part_number,
            outcome = %part_result.outcome(),
            warnings = part_result.warn_count(),
            failures = part_result.fail_count(),
            "Part completed"
        );
        Ok(part_result)
    }
}

/// A result block surrounded by blank lines.
fn framed(line: String) -> [String; 3] {
    [String::new(), line, String::new()]
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
