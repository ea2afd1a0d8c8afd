use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Part {0} has no steps")]
    EmptyPart(u8),

    #[error(
        "Step sequence broken in part {part}: expected step {expected} of {expected_total}, \
         got step {step} of {total}"
    )]
    StepSequence {
        part: u8,
        expected: usize,
        expected_total: usize,
        step: u8,
        total: u8,
    },

    #[error("Step {part}.{step} failed: {reason}")]
    StepFailed { part: u8, step: u8, reason: String },

    #[error("Step {part}.{step} panicked: {reason}")]
    StepPanicked { part: u8, step: u8, reason: String },

    #[error("Vehicle bus not configured")]
    BusNotConfigured,

    #[error("Vehicle bus error: {0}")]
    Bus(String),

    #[error("Core error: {0}")]
    Core(#[from] j1939_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    /// Create a step failed error.
    pub fn step_failed(part: u8, step: u8, reason: impl Into<String>) -> Self {
        Self::StepFailed {
            part,
            step,
            reason: reason.into(),
        }
    }

    /// Create a bus error.
    pub fn bus(reason: impl Into<String>) -> Self {
        Self::Bus(reason.into())
    }

    /// Whether the error signals a broken step sequence rather than a
    /// failed check.
    pub fn is_sequence_defect(&self) -> bool {
        matches!(self, Self::StepSequence { .. } | Self::EmptyPart(_))
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
