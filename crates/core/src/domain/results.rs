use serde::{Deserialize, Serialize};

use super::outcome::{ActionOutcome, Outcome};
use crate::lookup::Lookup;

/// Result of one step, accumulated while the step runs.
///
/// Once [`StepResult::complete`] is called the result is frozen and further
/// outcomes are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepResult {
    pub part_number: u8,
    pub step_number: u8,
    pub name: String,
    outcomes: Vec<ActionOutcome>,
    completed: bool,
}

impl StepResult {
    pub fn new(part_number: u8, step_number: u8) -> Self {
        Self {
            part_number,
            step_number,
            name: Lookup::step_name(part_number as i32, step_number as i32).to_string(),
            outcomes: Vec::new(),
            completed: false,
        }
    }

    /// `"<part>.<step>. <name>"`, the form used in milestones.
    pub fn title(&self) -> String {
        format!("{}.{}. {}", self.part_number, self.step_number, self.name)
    }

    /// Procedure section of the step, e.g. `6.1.26`.
    pub fn section(&self) -> String {
        format!("6.{}.{}", self.part_number, self.step_number)
    }

    pub fn add_outcome(&mut self, outcome: ActionOutcome) -> bool {
        if self.completed {
            return false;
        }
        self.outcomes.push(outcome);
        true
    }

    pub fn outcomes(&self) -> &[ActionOutcome] {
        &self.outcomes
    }

    /// Worst outcome recorded, `Pass` when nothing was recorded.
    pub fn outcome(&self) -> Outcome {
        self.outcomes
            .iter()
            .map(|o| o.outcome)
            .max()
            .unwrap_or(Outcome::Pass)
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}

/// Result of one part; owns its step results in execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartResult {
    pub part_number: u8,
    pub name: String,
    steps: Vec<StepResult>,
    completed: bool,
}

impl PartResult {
    pub fn new(part_number: u8) -> Self {
        Self {
            part_number,
            name: Lookup::part_name(part_number as i32).to_string(),
            steps: Vec::new(),
            completed: false,
        }
    }

    pub fn add_step(&mut self, step: StepResult) {
        if !self.completed {
            self.steps.push(step);
        }
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn step(&self, step_number: u8) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.step_number == step_number)
    }

    pub fn outcome(&self) -> Outcome {
        self.steps
            .iter()
            .map(StepResult::outcome)
            .max()
            .unwrap_or(Outcome::Pass)
    }

    pub fn warn_count(&self) -> usize {
        self.steps.iter().map(|s| s.count(Outcome::Warn)).sum()
    }

    pub fn fail_count(&self) -> usize {
        self.steps.iter().map(|s| s.count(Outcome::Fail)).sum()
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }
}
