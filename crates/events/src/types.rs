//! Event types carried on the results event bus

use chrono::{DateTime, Utc};
use j1939_core::{Outcome, PartResult, StepResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// Position in the publishing listener's stream, starting at 0
    pub sequence: u64,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ResultEvent,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(sequence: u64, event: ResultEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            timestamp: Utc::now(),
            event,
        }
    }
}

/// One call made on a results listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultEvent {
    #[serde(rename = "outcome")]
    Outcome {
        part_number: u8,
        step_number: u8,
        outcome: Outcome,
        message: String,
    },

    #[serde(rename = "result")]
    Result { text: String },

    #[serde(rename = "progress")]
    Progress {
        current: u32,
        total: u32,
        message: String,
    },

    /// Milestone such as "Begin Part: ..."
    #[serde(rename = "progress.message")]
    Milestone { message: String },

    #[serde(rename = "part.begin")]
    BeginPart { part_number: u8, name: String },

    #[serde(rename = "part.end")]
    EndPart {
        part_number: u8,
        name: String,
        outcome: Outcome,
    },

    #[serde(rename = "step.begin")]
    BeginStep {
        part_number: u8,
        step_number: u8,
        name: String,
    },

    #[serde(rename = "step.end")]
    EndStep {
        part_number: u8,
        step_number: u8,
        name: String,
        outcome: Outcome,
    },

    #[serde(rename = "complete")]
    Complete { success: bool },
}

impl ResultEvent {
    pub fn begin_part(part: &PartResult) -> Self {
        Self::BeginPart {
            part_number: part.part_number,
            name: part.name.clone(),
        }
    }

    pub fn end_part(part: &PartResult) -> Self {
        Self::EndPart {
            part_number: part.part_number,
            name: part.name.clone(),
            outcome: part.outcome(),
        }
    }

    pub fn begin_step(step: &StepResult) -> Self {
        Self::BeginStep {
            part_number: step.part_number,
            step_number: step.step_number,
            name: step.name.clone(),
        }
    }

    pub fn end_step(step: &StepResult) -> Self {
        Self::EndStep {
            part_number: step.part_number,
            step_number: step.step_number,
            name: step.name.clone(),
            outcome: step.outcome(),
        }
    }

    /// Part number the event belongs to, if any
    pub fn part_number(&self) -> Option<u8> {
        match self {
            Self::Outcome { part_number, .. }
            | Self::BeginPart { part_number, .. }
            | Self::EndPart { part_number, .. }
            | Self::BeginStep { part_number, .. }
            | Self::EndStep { part_number, .. } => Some(*part_number),
            Self::Result { .. }
            | Self::Progress { .. }
            | Self::Milestone { .. }
            | Self::Complete { .. } => None,
        }
    }
}
