use serde::{Deserialize, Serialize};
use std::fmt;

use super::spn::Spn;

/// A diagnostic trouble code: suspect signal plus failure mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DiagnosticTroubleCode {
    pub spn: u32,
    pub fmi: u8,
    #[serde(default)]
    pub occurrence_count: u8,
    #[serde(default)]
    pub conversion_method: u8,
}

impl DiagnosticTroubleCode {
    pub fn new(spn: u32, fmi: u8, occurrence_count: u8) -> Self {
        Self {
            spn,
            fmi,
            occurrence_count,
            conversion_method: 0,
        }
    }
}

impl fmt::Display for DiagnosticTroubleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DM25 DTC {}:{} - {} times",
            self.spn, self.fmi, self.occurrence_count
        )
    }
}

/// Snapshot of signal values captured when a fault was recorded.
///
/// Built in two phases: the frame is decoded first, then the signals are
/// resolved against the module's supported freeze frame list and assigned
/// with [`FreezeFrame::set_spns`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreezeFrame {
    pub dtc: DiagnosticTroubleCode,
    #[serde(default)]
    pub spn_data: Vec<u8>,
    #[serde(default)]
    spns: Vec<Spn>,
}

impl FreezeFrame {
    pub fn new(dtc: DiagnosticTroubleCode, spn_data: Vec<u8>) -> Self {
        Self {
            dtc,
            spn_data,
            spns: Vec::new(),
        }
    }

    pub fn set_spns(&mut self, spns: Vec<Spn>) {
        self.spns = spns;
    }

    pub fn spns(&self) -> &[Spn] {
        &self.spns
    }

    pub fn spn(&self, id: u32) -> Option<&Spn> {
        self.spns.iter().find(|s| s.id == id)
    }
}

impl fmt::Display for FreezeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Freeze Frame: {{")?;
        writeln!(f, "  {}", self.dtc)?;
        for spn in &self.spns {
            writeln!(f, "  {}", spn)?;
        }
        write!(f, "}}")
    }
}
