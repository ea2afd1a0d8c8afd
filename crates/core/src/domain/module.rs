use serde::{Deserialize, Serialize};

use crate::lookup::Lookup;

/// One entry of a module's DM24 supported-signal declaration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SupportedSpn {
    pub spn: u32,
    #[serde(default = "default_true")]
    pub supports_data_stream: bool,
    #[serde(default)]
    pub supports_freeze_frame: bool,
    #[serde(default)]
    pub supports_scaled_test_results: bool,
    #[serde(default)]
    pub length: u8,
}

fn default_true() -> bool {
    true
}

impl SupportedSpn {
    pub fn data_stream(spn: u32) -> Self {
        Self {
            spn,
            supports_data_stream: true,
            supports_freeze_frame: false,
            supports_scaled_test_results: false,
            length: 0,
        }
    }

    pub fn freeze_frame(spn: u32, length: u8) -> Self {
        Self {
            spn,
            supports_data_stream: false,
            supports_freeze_frame: true,
            supports_scaled_test_results: false,
            length,
        }
    }
}

/// What the tool knows about one OBD module on the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleInfo {
    pub source_address: u8,
    /// Overrides the standard address name when set.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub supported_spns: Vec<SupportedSpn>,
    #[serde(default)]
    pub engine_family: Option<String>,
    #[serde(default)]
    pub model_year: Option<u16>,
}

impl ModuleInfo {
    pub fn new(source_address: u8) -> Self {
        Self {
            source_address,
            name: None,
            supported_spns: Vec::new(),
            engine_family: None,
            model_year: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_supported_spns(mut self, spns: Vec<SupportedSpn>) -> Self {
        self.supported_spns = spns;
        self
    }

    pub fn module_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| Lookup::address_name(self.source_address).to_string())
    }

    /// Identifiers this module declares for the data stream, ascending.
    pub fn data_stream_spns(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .supported_spns
            .iter()
            .filter(|s| s.supports_data_stream)
            .map(|s| s.spn)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn freeze_frame_spns(&self) -> Vec<SupportedSpn> {
        self.supported_spns
            .iter()
            .filter(|s| s.supports_freeze_frame)
            .copied()
            .collect()
    }

    pub fn declares(&self, spn: u32) -> bool {
        self.supported_spns.iter().any(|s| s.spn == spn)
    }
}
