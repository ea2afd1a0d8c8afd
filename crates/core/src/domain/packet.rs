use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::spn::Spn;
use crate::lookup::Lookup;

const DEFAULT_PRIORITY: u8 = 6;

/// Identity of one received message.
///
/// Assigned once when the message is decoded. Clones of a [`Packet`] share
/// it, so two entries with the same id are the same physical message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PacketId(pub Uuid);

impl PacketId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PacketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The authoritative list of signals expected in one message type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PgnDefinition {
    pub pgn: u32,
    pub label: String,
    #[serde(default)]
    pub acronym: String,
    pub spn_ids: Vec<u32>,
}

impl PgnDefinition {
    pub fn new(pgn: u32, label: impl Into<String>, spn_ids: Vec<u32>) -> Self {
        Self {
            pgn,
            label: label.into(),
            acronym: String::new(),
            spn_ids,
        }
    }

    pub fn with_acronym(mut self, acronym: impl Into<String>) -> Self {
        self.acronym = acronym.into();
        self
    }

    /// Identifiers in ascending order, comma separated.
    pub fn spn_list(&self) -> String {
        let mut ids = self.spn_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A decoded message from one module on the vehicle network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Packet {
    #[serde(default)]
    pub id: PacketId,
    pub pgn: u32,
    #[serde(default = "default_priority")]
    pub priority: u8,
    pub source_address: u8,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub spns: Vec<Spn>,
    #[serde(default)]
    pub definition: Option<PgnDefinition>,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Packet {
    pub fn new(pgn: u32, source_address: u8, bytes: Vec<u8>) -> Self {
        Self {
            id: PacketId::new(),
            pgn,
            priority: DEFAULT_PRIORITY,
            source_address,
            timestamp: Utc::now(),
            bytes,
            spns: Vec::new(),
            definition: None,
        }
    }

    pub fn with_spns(mut self, spns: Vec<Spn>) -> Self {
        self.spns = spns;
        self
    }

    pub fn with_definition(mut self, definition: PgnDefinition) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn spn(&self, id: u32) -> Option<&Spn> {
        self.spns.iter().find(|s| s.id == id)
    }

    pub fn label(&self) -> String {
        match &self.definition {
            Some(def) if !def.label.is_empty() => def.label.clone(),
            _ => format!("PGN {}", self.pgn),
        }
    }

    /// 29-bit CAN identifier: priority, PGN and source address.
    pub fn can_id(&self) -> u32 {
        ((self.priority as u32 & 0x07) << 26) | ((self.pgn & 0x3FFFF) << 8) | self.source_address as u32
    }

    /// Raw form used in reports: `HH:MM:SS.fff 18FEEE00 [8] 01 02 ...`.
    pub fn to_time_string(&self) -> String {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{} {:08X} [{}] {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.can_id(),
            self.bytes.len(),
            bytes
        )
        .trim_end()
        .to_string()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} ({}): ",
            self.label(),
            Lookup::address_name(self.source_address),
            self.source_address
        )?;
        for spn in &self.spns {
            write!(f, "\n  {}", spn)?;
        }
        Ok(())
    }
}
