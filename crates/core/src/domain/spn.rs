use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded signal reading.
///
/// The transport layer resolves the label and unit while decoding; this
/// crate only ever sees the finished value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Spn {
    pub id: u32,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    /// `None` when the sender marked the value as not available.
    #[serde(default)]
    pub value: Option<f64>,
}

impl Spn {
    pub fn new(id: u32, label: impl Into<String>, unit: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            id,
            label: label.into(),
            unit: unit.into(),
            value,
        }
    }

    pub fn is_not_available(&self) -> bool {
        self.value.is_none()
    }

    /// Value rendered with six decimal places, or `Not Available`.
    pub fn value_string(&self) -> String {
        match self.value {
            Some(value) => format!("{:.6}", value),
            None => "Not Available".to_string(),
        }
    }
}

impl fmt::Display for Spn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPN {:>5}, {}: ", self.id, self.label)?;
        match self.value {
            Some(value) if self.unit.is_empty() => write!(f, "{:.6}", value),
            Some(value) => write!(f, "{:.6} {}", value, self.unit),
            None => f.write_str("Not Available"),
        }
    }
}
