//! Static name tables for parts, steps and network addresses.
//!
//! Every lookup is total: anything outside the tables resolves to
//! [`UNKNOWN`].

pub const UNKNOWN: &str = "Unknown";

const PART_NAMES: [&str; 12] = [
    "Part 1 - Test Vehicle Data Collection",
    "Part 2 - Key On Engine Running Data Collection",
    "Part 3 - Test Pending Fault A",
    "Part 4 - Test Confirmed Fault A",
    "Part 5 - Test MIL Status for Fault A",
    "Part 6 - Complete Fault A Three Cycle Countdown",
    "Part 7 - Verify DM23 Transition",
    "Part 8 - Verify Fault B for General Denominator Demonstration",
    "Part 9 - Code Clear",
    "Part 10 - Verify Fault B Key On Engine Running",
    "Part 11 - Exercise General Denominator",
    "Part 12 - Verify Deletion of Fault B",
];

const PART_1_STEPS: &[&str] = &[
    "Test vehicle data collection",
    "Verify engine operation",
    "DM5: Diagnostic readiness 1",
    "DM24: SPN support",
    "PGN 65260 VIN verification",
    "DM56: Model year and certification engine family",
    "DM19: Calibration information",
    "DM20: Monitor performance ratio",
    "Component ID: Make, Serial Number, Unit Number, and Model",
    "DM11: Diagnostic data clear/reset for active DTCs",
    "DM21: Diagnostic readiness 2",
    "DM7/DM30: Command non-continuously monitored test/scaled test results",
    "DM5: Diagnostic readiness 1: Monitor readiness",
    "DM26: Diagnostic readiness 3",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM6: Emission related pending DTCs",
    "DM12: Emissions related active DTCs",
    "DM23: Emission related previously active DTCs",
    "DM28: Permanent DTCs",
    "DM27: All pending DTCs",
    "DM29: Regulated DTC counts",
    "DM31: DTC to lamp association",
    "DM25: Expanded freeze frame",
    "DM20: Monitor performance ratio",
    "Data stream support",
    "Part 1 to Part 2 transition",
];

const PART_2_STEPS: &[&str] = &[
    "Verify engine operation",
    "DM5: Diagnostic readiness 1",
    "DM24: SPN support",
    "DM26: Diagnostic readiness 3",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM6: Emission related pending DTCs",
    "DM12: Emissions related active DTCs",
    "DM23: Emission related previously active DTCs",
    "DM28: Permanent DTCs",
    "DM27: All pending DTCs",
    "DM29: Regulated DTC counts",
    "DM20: Monitor performance ratio",
    "DM21: Diagnostic readiness 2",
    "DM7/DM30: Command non-continuously monitored test/scaled test results",
    "DM25: Expanded freeze frame",
    "Data stream support",
    "Part 2 to Part 3 transition",
];

const PART_3_STEPS: &[&str] = &[
    "Wait for manufacturer's DTC to be set",
    "DM6: Emission related pending DTCs",
    "DM12: Emissions related active DTCs",
    "DM27: All pending DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM5: Diagnostic readiness 1",
    "DM25: Expanded freeze frame",
    "Part 3 to Part 4 transition",
];

const PART_4_STEPS: &[&str] = &[
    "Confirmed and active DTC",
    "DM12: Emissions related active DTCs",
    "DM6: Emission related pending DTCs",
    "DM27: All pending DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM5: Diagnostic readiness 1",
    "DM25: Expanded freeze frame",
    "DM20: Monitor performance ratio",
    "DM31: DTC to lamp association",
    "Part 4 to Part 5 transition",
];

const PART_5_STEPS: &[&str] = &[
    "DM12: Emissions related active DTCs",
    "DM6: Emission related pending DTCs",
    "DM27: All pending DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "Part 5 to Part 6 transition",
];

const PART_6_STEPS: &[&str] = &[
    "Complete fault A three cycle countdown",
    "DM12: Emissions related active DTCs",
    "DM23: Emission related previously active DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM5: Diagnostic readiness 1",
    "DM20: Monitor performance ratio",
    "DM31: DTC to lamp association",
    "Part 6 to Part 7 transition",
];

const PART_7_STEPS: &[&str] = &[
    "Verify DM23 transition",
    "DM23: Emission related previously active DTCs",
    "DM12: Emissions related active DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM5: Diagnostic readiness 1",
    "Part 7 to Part 8 transition",
];

const PART_8_STEPS: &[&str] = &[
    "Implant fault B",
    "DM12: Emissions related active DTCs",
    "DM6: Emission related pending DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM1: Active diagnostic trouble codes (DTCs)",
    "DM2: Previously active diagnostic trouble codes (DTCs)",
    "DM5: Diagnostic readiness 1",
    "DM25: Expanded freeze frame",
    "DM20: Monitor performance ratio",
    "DM21: Diagnostic readiness 2",
    "DM31: DTC to lamp association",
    "DM33: Emission increasing auxiliary emission control device active time",
    "Part 8 to Part 9 transition",
];

const PART_9_STEPS: &[&str] = &[
    "Code clear",
    "DM5: Diagnostic readiness 1",
    "DM11: Diagnostic data clear/reset for active DTCs",
    "DM3: Diagnostic data clear/reset of previously active DTCs",
    "DM12: Emissions related active DTCs",
    "DM6: Emission related pending DTCs",
    "DM23: Emission related previously active DTCs",
    "DM29: Regulated DTC counts",
    "DM28: Permanent DTCs",
    "DM20: Monitor performance ratio",
    "DM21: Diagnostic readiness 2",
    "Part 9 to Part 10 transition",
];

const PART_10_STEPS: &[&str] = &[
    "Verify fault B key on engine running",
    "DM12: Emissions related active DTCs",
    "DM28: Permanent DTCs",
    "DM29: Regulated DTC counts",
    "DM20: Monitor performance ratio",
    "Part 10 to Part 11 transition",
];

const PART_11_STEPS: &[&str] = &[
    "Exercise general denominator",
    "DM5: Diagnostic readiness 1",
    "DM20: Monitor performance ratio",
    "DM21: Diagnostic readiness 2",
    "DM28: Permanent DTCs",
    "DM29: Regulated DTC counts",
    "DM12: Emissions related active DTCs",
    "Part 11 to Part 12 transition",
];

const PART_12_STEPS: &[&str] = &[
    "Verify deletion of fault B",
    "DM28: Permanent DTCs",
    "DM29: Regulated DTC counts",
    "DM12: Emissions related active DTCs",
    "DM5: Diagnostic readiness 1",
    "DM20: Monitor performance ratio",
    "DM21: Diagnostic readiness 2",
    "End of test",
];

const STEP_NAMES: [&[&str]; 12] = [
    PART_1_STEPS,
    PART_2_STEPS,
    PART_3_STEPS,
    PART_4_STEPS,
    PART_5_STEPS,
    PART_6_STEPS,
    PART_7_STEPS,
    PART_8_STEPS,
    PART_9_STEPS,
    PART_10_STEPS,
    PART_11_STEPS,
    PART_12_STEPS,
];

const ADDRESS_NAMES: &[(u8, &str)] = &[
    (0x00, "Engine #1"),
    (0x01, "Engine #2"),
    (0x02, "Turbocharger"),
    (0x03, "Transmission #1"),
    (0x04, "Transmission #2"),
    (0x0B, "Brakes - System Controller"),
    (0x0F, "Retarder, Engine"),
    (0x11, "Cruise Control"),
    (0x17, "Instrument Cluster #1"),
    (0x21, "Body Controller"),
    (0x31, "Cab Controller - Primary"),
    (0x3D, "Exhaust Emission Controller"),
    (0x55, "Diesel Particulate Filter Controller"),
    (0x5A, "Hybrid System Controller"),
    (0xF9, "Off Board Diagnostic-Service Tool #1"),
    (0xFA, "Off Board Diagnostic-Service Tool #2"),
    (0xFF, "Global"),
];

/// Static name registry.
pub struct Lookup;

impl Lookup {
    /// Name of a part, 1-based.
    pub fn part_name(part_number: i32) -> &'static str {
        usize::try_from(part_number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| PART_NAMES.get(i))
            .copied()
            .unwrap_or(UNKNOWN)
    }

    /// Name of a step within a part, both 1-based.
    pub fn step_name(part_number: i32, step_number: i32) -> &'static str {
        let index = |n: i32| usize::try_from(n).ok().and_then(|n| n.checked_sub(1));
        index(part_number)
            .and_then(|p| STEP_NAMES.get(p))
            .and_then(|steps| index(step_number).and_then(|s| steps.get(s)))
            .copied()
            .unwrap_or(UNKNOWN)
    }

    /// Number of steps defined for a part, 0 when unknown.
    pub fn step_count(part_number: i32) -> usize {
        usize::try_from(part_number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| STEP_NAMES.get(i))
            .map(|steps| steps.len())
            .unwrap_or(0)
    }

    pub fn part_count() -> usize {
        PART_NAMES.len()
    }

    /// Standard name of a source address.
    pub fn address_name(source_address: u8) -> &'static str {
        ADDRESS_NAMES
            .iter()
            .find(|(address, _)| *address == source_address)
            .map(|(_, name)| *name)
            .unwrap_or(UNKNOWN)
    }
}
