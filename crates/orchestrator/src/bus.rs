//! Vehicle bus contract and the engine speed helper.
//!
//! The transport itself lives outside this crate; it hands back packets
//! that are already decoded.

use std::sync::{Arc, RwLock};
use tracing::debug;

use j1939_core::Packet;

use crate::error::{OrchestratorError, Result};

/// Electronic Engine Controller 1, carries engine speed.
pub const EEC1_PGN: u32 = 61444;
pub const ENGINE_SPEED_SPN: u32 = 190;
pub const ENGINE_ADDRESS: u8 = 0x00;
pub const GLOBAL_ADDRESS: u8 = 0xFF;

/// Default engine speed above which the engine is considered running.
pub const DEFAULT_ENGINE_SPEED_THRESHOLD_RPM: f64 = 300.0;

/// Handle on the vehicle network.
pub trait Bus: Send + Sync {
    /// Source address the tool transmits from.
    fn address(&self) -> u8;

    /// Request `pgn` from `destination` and collect the decoded responses.
    fn request(&self, pgn: u32, destination: u8) -> Result<Vec<Packet>>;
}

/// A collaborator that needs the bus handle before steps run.
pub trait BusAware: Send + Sync {
    fn set_bus(&self, bus: Arc<dyn Bus>);
}

/// Reads engine speed to tell whether the engine is running.
pub struct EngineSpeedModule {
    bus: RwLock<Option<Arc<dyn Bus>>>,
    threshold_rpm: f64,
}

impl EngineSpeedModule {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_ENGINE_SPEED_THRESHOLD_RPM)
    }

    pub fn with_threshold(threshold_rpm: f64) -> Self {
        Self {
            bus: RwLock::new(None),
            threshold_rpm,
        }
    }

    fn bus(&self) -> Result<Arc<dyn Bus>> {
        self.bus
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(OrchestratorError::BusNotConfigured)
    }

    pub fn threshold_rpm(&self) -> f64 {
        self.threshold_rpm
    }

    /// Current engine speed in rpm, `None` when the engine does not
    /// answer or reports it as not available.
    pub fn engine_speed(&self) -> Result<Option<f64>> {
        let packets = self.bus()?.request(EEC1_PGN, ENGINE_ADDRESS)?;
        let speed = packets
            .iter()
            .filter(|p| p.source_address == ENGINE_ADDRESS)
            .find_map(|p| p.spn(ENGINE_SPEED_SPN).and_then(|s| s.value));
        debug!(engine_speed = ?speed, "Engine speed read");
        Ok(speed)
    }

    pub fn is_engine_on(&self) -> Result<bool> {
        Ok(self
            .engine_speed()?
            .map(|rpm| rpm > self.threshold_rpm)
            .unwrap_or(false))
    }

    pub fn is_engine_communicating(&self) -> bool {
        matches!(self.engine_speed(), Ok(Some(_)))
    }
}

impl Default for EngineSpeedModule {
    fn default() -> Self {
        Self::new()
    }
}

impl BusAware for EngineSpeedModule {
    fn set_bus(&self, bus: Arc<dyn Bus>) {
        *self.bus.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(bus);
    }
}
