use std::sync::Arc;
use tracing::{error, info};

use events::{CompositeListener, ResultsListener};
use j1939_core::Outcome;

use crate::bus::Bus;
use crate::executor::TaskSubmitter;
use crate::part::PartController;

/// Runs several parts back to back in one submitted task.
///
/// Completion is reported once, after the last part. A broken step
/// sequence in any part stops the whole run.
pub struct OverallController {
    parts: Vec<Arc<PartController>>,
    submitter: Arc<dyn TaskSubmitter>,
}

impl OverallController {
    pub fn new(submitter: Arc<dyn TaskSubmitter>) -> Self {
        Self {
            parts: Vec::new(),
            submitter,
        }
    }

    pub fn with_part(mut self, part: PartController) -> Self {
        self.parts.push(Arc::new(part));
        self
    }

    pub fn part_numbers(&self) -> Vec<u8> {
        self.parts.iter().map(|p| p.part_number()).collect()
    }

    pub fn execute(
        &self,
        listener: Arc<dyn ResultsListener>,
        bus: Arc<dyn Bus>,
        report: Arc<dyn ResultsListener>,
    ) {
        for part in &self.parts {
            part.configure_bus(&bus);
        }

        let parts = self.parts.clone();
        let sink = CompositeListener::new(vec![listener, report]);
        info!(parts = ?self.part_numbers(), "Submitting test run");

        self.submitter.submit(Box::new(move || {
            let mut success = true;
            for part in &parts {
                match part.run(&sink, &bus) {
                    Ok(result) => success &= result.outcome() != Outcome::Fail,
                    Err(e) => {
                        error!(part = part.part_number(), error = %e, "Test run halted");
                        sink.on_result(&e.to_string());
                        success = false;
                        break;
                    }
                }
            }
            info!(success, "Test run finished");
            sink.on_complete(success);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::tests::FixedSpeedBus;
    use crate::error::{OrchestratorError, Result};
    use crate::executor::InlineSubmitter;
    use crate::step::StepController;
    use events::{NoOpResultsListener, ResultEvent, TestResultsListener};
    use j1939_core::Lookup;

    struct Step {
        part: u8,
        number: u8,
        total: u8,
        fail: bool,
    }

    impl StepController for Step {
        fn step_number(&self) -> u8 {
            self.number
        }

        fn total_steps(&self) -> u8 {
            self.total
        }

        fn run(&self, _listener: &dyn ResultsListener, _bus: &Arc<dyn Bus>) -> Result<()> {
            if self.fail {
                Err(OrchestratorError::step_failed(self.part, self.number, "no response"))
            } else {
                Ok(())
            }
        }
    }

    fn part(part: u8, total: u8, failing: Option<u8>) -> PartController {
        let steps: Vec<Arc<dyn StepController>> = (1..=total)
            .map(|number| {
                Arc::new(Step {
                    part,
                    number,
                    total,
                    fail: failing == Some(number),
                }) as Arc<dyn StepController>
            })
            .collect();
        PartController::new(part, Arc::new(InlineSubmitter)).with_steps(steps)
    }

    fn run(controller: OverallController) -> Arc<TestResultsListener> {
        let listener = Arc::new(TestResultsListener::new());
        controller.execute(
            listener.clone(),
            Arc::new(FixedSpeedBus::new(Some(0.0))),
            Arc::new(NoOpResultsListener),
        );
        listener
    }

    #[test]
    fn test_parts_run_in_order_with_single_completion() {
        let controller = OverallController::new(Arc::new(InlineSubmitter))
            .with_part(part(1, 2, None))
            .with_part(part(2, 3, None));
        let listener = run(controller);

        assert_eq!(listener.progress(), vec![(1, 2), (2, 2), (1, 3), (2, 3), (3, 3)]);
        let milestones = listener.milestones();
        assert_eq!(milestones.first().unwrap(), &format!("Begin Part: {}", Lookup::part_name(1)));
        assert_eq!(milestones.last().unwrap(), &format!("End Part: {}", Lookup::part_name(2)));

        let completions = listener
            .events()
            .iter()
            .filter(|e| matches!(e, ResultEvent::Complete { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(listener.completed(), Some(true));
    }

    #[test]
    fn test_failed_step_keeps_running_later_parts() {
        let controller = OverallController::new(Arc::new(InlineSubmitter))
            .with_part(part(1, 2, Some(1)))
            .with_part(part(2, 1, None));
        let listener = run(controller);

        assert_eq!(listener.progress().len(), 3);
        assert_eq!(listener.completed(), Some(false));
    }

    #[test]
    fn test_sequence_defect_stops_later_parts() {
        let broken = PartController::new(1, Arc::new(InlineSubmitter)).with_step(Arc::new(Step {
            part: 1,
            number: 2,
            total: 1,
            fail: false,
        }));
        let controller = OverallController::new(Arc::new(InlineSubmitter))
            .with_part(broken)
            .with_part(part(2, 1, None));
        let listener = run(controller);

        assert!(listener.progress().is_empty());
        assert_eq!(listener.completed(), Some(false));
    }
}
