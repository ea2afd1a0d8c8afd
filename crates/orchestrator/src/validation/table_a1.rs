use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use events::ResultsListener;
use j1939_core::{DataRepository, Outcome, Packet, PacketId};

use super::table_outcome;
use super::value::{PlausibilityCheck, TableA1ValueValidator};
use crate::report::report_outcome;

/// Severity when more than one module provides the signal.
pub static DUPLICATE_SPN_OUTCOMES: &[(u32, Outcome)] = &[
    (84, Outcome::Warn),
    (91, Outcome::Warn),
    (92, Outcome::Fail),
    (96, Outcome::Warn),
    (102, Outcome::Warn),
    (105, Outcome::Warn),
    (108, Outcome::Warn),
    (110, Outcome::Fail),
    (168, Outcome::Warn),
    (175, Outcome::Fail),
    (190, Outcome::Fail),
    (512, Outcome::Fail),
    (513, Outcome::Fail),
    (514, Outcome::Fail),
    (539, Outcome::Fail),
    (540, Outcome::Fail),
    (541, Outcome::Fail),
    (542, Outcome::Fail),
    (543, Outcome::Fail),
    (544, Outcome::Fail),
];

/// Severity when a module other than the declaring one provides the signal.
/// SPN 158 is commonly rebroadcast and deliberately absent.
pub static NON_OBD_SPN_OUTCOMES: &[(u32, Outcome)] = &[
    (84, Outcome::Warn),
    (91, Outcome::Warn),
    (92, Outcome::Fail),
    (96, Outcome::Info),
    (102, Outcome::Warn),
    (105, Outcome::Warn),
    (108, Outcome::Warn),
    (110, Outcome::Warn),
    (168, Outcome::Info),
    (175, Outcome::Warn),
    (190, Outcome::Warn),
    (245, Outcome::Info),
    (247, Outcome::Info),
    (248, Outcome::Info),
    (512, Outcome::Fail),
    (513, Outcome::Fail),
    (514, Outcome::Fail),
    (539, Outcome::Fail),
    (540, Outcome::Fail),
    (541, Outcome::Fail),
    (542, Outcome::Fail),
    (543, Outcome::Fail),
    (544, Outcome::Fail),
];

/// Table A-1 data stream checks.
///
/// Tracks which packets it has already reported on, so the same physical
/// message seen twice is framed and graded once. Call [`reset`] between
/// independent runs.
///
/// [`reset`]: TableA1Validator::reset
pub struct TableA1Validator {
    data_repository: DataRepository,
    plausibility: Arc<dyn PlausibilityCheck>,
    reported_packets: Mutex<HashSet<PacketId>>,
}

impl TableA1Validator {
    pub fn new(data_repository: DataRepository) -> Self {
        Self::with_plausibility(data_repository, Arc::new(TableA1ValueValidator::new()))
    }

    pub fn with_plausibility(
        data_repository: DataRepository,
        plausibility: Arc<dyn PlausibilityCheck>,
    ) -> Self {
        Self {
            data_repository,
            plausibility,
            reported_packets: Mutex::new(HashSet::new()),
        }
    }

    /// Forget which packets have been reported.
    pub fn reset(&self) {
        self.reported().clear();
    }

    fn reported(&self) -> std::sync::MutexGuard<'_, HashSet<PacketId>> {
        self.reported_packets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Report every signal provided by more than one module.
    ///
    /// Repeated entries of the same packet count once. Signals marked not
    /// available do not count as provided. Findings come out in ascending
    /// SPN order; SPNs absent from [`DUPLICATE_SPN_OUTCOMES`] are silent.
    pub fn report_duplicate_spns(
        &self,
        packets: &[Packet],
        listener: &dyn ResultsListener,
        part_number: u8,
        step_number: u8,
        section: &str,
    ) {
        let mut seen = HashSet::new();
        let mut providers: BTreeMap<u32, BTreeSet<u8>> = BTreeMap::new();
        for packet in packets.iter().filter(|p| seen.insert(p.id)) {
            for spn in packet.spns.iter().filter(|s| !s.is_not_available()) {
                providers.entry(spn.id).or_default().insert(packet.source_address);
            }
        }

        let citation = format!("{}.5", section);
        for (spn, sources) in providers.iter().filter(|(_, sources)| sources.len() > 1) {
            debug!(spn, sources = ?sources, "SPN provided by several modules");
            if let Some(outcome) = table_outcome(DUPLICATE_SPN_OUTCOMES, *spn) {
                report_outcome(
                    listener,
                    part_number,
                    step_number,
                    outcome,
                    &citation,
                    &format!("SPN {} provided by more than one module", spn),
                );
            }
        }
    }

    /// Grade every signal in `packet` with the plausibility predicate.
    ///
    /// The predicate sees every signal of every call. Framing and WARN
    /// findings are only emitted the first time a packet is seen.
    pub fn report_implausible_spn_values(
        &self,
        packet: &Packet,
        listener: &dyn ResultsListener,
        engine_on: bool,
        part_number: u8,
        step_number: u8,
        section: &str,
    ) {
        let first_sighting = self.reported().insert(packet.id);
        if first_sighting {
            write_framing(packet, listener);
        } else {
            debug!(packet = %packet.id, "Packet already reported");
        }

        let fuel_type = self.data_repository.fuel_type();
        let citation = format!("{}.8", section);
        for spn in &packet.spns {
            let implausible = self
                .plausibility
                .is_implausible(spn.id, spn.value, engine_on, fuel_type);
            if implausible && first_sighting {
                report_outcome(
                    listener,
                    part_number,
                    step_number,
                    Outcome::Warn,
                    &citation,
                    &format!(
                        "{} ({}) reported value for SPN {} ({}) is implausible",
                        self.data_repository.module_name(packet.source_address),
                        packet.source_address,
                        spn.id,
                        spn.value_string()
                    ),
                );
            }
        }
    }

    /// Report signals that a non-OBD module provides in place of the OBD
    /// modules that declare them.
    ///
    /// Packets from registered OBD modules are framed but never graded. For
    /// any other source, each signal declared in the data stream of some
    /// registered OBD module is graded with [`NON_OBD_SPN_OUTCOMES`].
    pub fn report_non_obd_module_provided_spns(
        &self,
        packet: &Packet,
        listener: &dyn ResultsListener,
        part_number: u8,
        step_number: u8,
        section: &str,
    ) {
        if packet.spns.is_empty() {
            listener.on_result("");
            return;
        }
        write_framing(packet, listener);

        if self.data_repository.is_obd_module(packet.source_address) {
            debug!(source_address = packet.source_address, "Packet from OBD module");
            return;
        }

        let declared: HashSet<u32> = self
            .data_repository
            .obd_module_addresses()
            .into_iter()
            .flat_map(|address| self.data_repository.supported_spns(address))
            .collect();
        let module_name = self.data_repository.module_name(packet.source_address);
        let citation = format!("{}.6", section);

        let mut reported = 0;
        for spn in packet.spns.iter().filter(|s| declared.contains(&s.id)) {
            if let Some(outcome) = table_outcome(NON_OBD_SPN_OUTCOMES, spn.id) {
                report_outcome(
                    listener,
                    part_number,
                    step_number,
                    outcome,
                    &citation,
                    &format!(
                        "SPN {} provided by non-OBD Module {} ({})",
                        spn.id, module_name, packet.source_address
                    ),
                );
                reported += 1;
            }
        }
        if reported > 0 {
            info!(
                source_address = packet.source_address,
                pgn = packet.pgn,
                findings = reported,
                "Signals provided by non-OBD module"
            );
        }
    }
}

/// Header, raw form and decoded form of a packet, then a blank line. A
/// packet without a definition only gets the blank line.
fn write_framing(packet: &Packet, listener: &dyn ResultsListener) {
    if let Some(definition) = &packet.definition {
        listener.on_result(&format!(
            "PGN {} with Supported SPNs {}",
            definition.pgn,
            definition.spn_list()
        ));
        listener.on_result(&packet.to_time_string());
        listener.on_result(&format!("Found: {}", packet));
    }
    listener.on_result("");
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::TestResultsListener;
    use j1939_core::{FuelType, ModuleInfo, PgnDefinition, Spn, SupportedSpn};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spn(id: u32, value: Option<f64>) -> Spn {
        Spn::new(id, format!("Signal {}", id), "", value)
    }

    fn packet(source_address: u8, spns: Vec<Spn>) -> Packet {
        Packet::new(65262, source_address, vec![0; 8]).with_spns(spns)
    }

    fn never_implausible() -> Arc<dyn PlausibilityCheck> {
        Arc::new(|_: u32, _: Option<f64>, _: bool, _: FuelType| false)
    }

    #[test]
    fn test_duplicates_reported_in_ascending_order() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let packets = vec![
            packet(0x00, vec![spn(92, Some(10.0)), spn(84, Some(0.0)), spn(9999, Some(1.0))]),
            packet(0x17, vec![spn(84, Some(0.0)), spn(92, Some(11.0)), spn(9999, Some(1.0))]),
        ];

        validator.report_duplicate_spns(&packets, &listener, 1, 26, "6.1.26");

        let outcomes = listener.outcomes();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].outcome, Outcome::Warn);
        assert_eq!(outcomes[0].message, "6.1.26.5 - SPN 84 provided by more than one module");
        assert_eq!(outcomes[1].outcome, Outcome::Fail);
        assert_eq!(outcomes[1].message, "6.1.26.5 - SPN 92 provided by more than one module");
        assert_eq!(
            listener.results(),
            vec![
                "WARN: 6.1.26.5 - SPN 84 provided by more than one module".to_string(),
                "FAIL: 6.1.26.5 - SPN 92 provided by more than one module".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_packet_entries_count_once() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let once = packet(0x00, vec![spn(92, Some(10.0))]);
        let packets = vec![once.clone(), once];

        validator.report_duplicate_spns(&packets, &listener, 1, 26, "6.1.26");
        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_repeated_packet_gives_same_findings() {
        let validator = TableA1Validator::new(DataRepository::new());
        let engine = packet(0x00, vec![spn(84, Some(0.0)), spn(92, Some(10.0))]);
        let cluster = packet(0x17, vec![spn(84, Some(0.0)), spn(92, Some(11.0))]);

        let once = TestResultsListener::new();
        validator.report_duplicate_spns(&[engine.clone(), cluster.clone()], &once, 1, 26, "6.1.26");
        let twice = TestResultsListener::new();
        validator.report_duplicate_spns(&[engine, cluster.clone(), cluster], &twice, 1, 26, "6.1.26");

        assert_eq!(once.outcomes(), twice.outcomes());
        assert_eq!(once.results(), twice.results());
        let outcomes = twice.outcomes();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].outcome, Outcome::Warn);
        assert_eq!(outcomes[0].message, "6.1.26.5 - SPN 84 provided by more than one module");
        assert_eq!(outcomes[1].outcome, Outcome::Fail);
        assert_eq!(outcomes[1].message, "6.1.26.5 - SPN 92 provided by more than one module");
    }

    #[test]
    fn test_same_source_twice_is_not_duplicate() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let packets = vec![
            packet(0x00, vec![spn(92, Some(10.0))]),
            packet(0x00, vec![spn(92, Some(12.0))]),
        ];

        validator.report_duplicate_spns(&packets, &listener, 1, 26, "6.1.26");
        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_not_available_signal_is_not_a_provider() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let packets = vec![
            packet(0x00, vec![spn(92, Some(10.0))]),
            packet(0x17, vec![spn(92, None)]),
        ];

        validator.report_duplicate_spns(&packets, &listener, 1, 26, "6.1.26");
        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_implausible_packet_reported_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let check = move |spn: u32, _: Option<f64>, _: bool, _: FuelType| {
            counter.fetch_add(1, Ordering::SeqCst);
            spn == 190
        };
        let validator = TableA1Validator::with_plausibility(DataRepository::new(), Arc::new(check));
        let listener = TestResultsListener::new();
        let packet = packet(0x00, vec![spn(190, Some(15_000.0)), spn(92, Some(10.0))]);

        validator.report_implausible_spn_values(&packet, &listener, true, 1, 26, "6.1.26");
        validator.report_implausible_spn_values(&packet.clone(), &listener, true, 1, 26, "6.1.26");

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let outcomes = listener.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0].message,
            "6.1.26.8 - Engine #1 (0) reported value for SPN 190 (15000.000000) is implausible"
        );
        assert_eq!(
            listener.results(),
            vec![
                String::new(),
                "WARN: 6.1.26.8 - Engine #1 (0) reported value for SPN 190 (15000.000000) is implausible"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_implausible_framing_with_definition() {
        let validator = TableA1Validator::with_plausibility(DataRepository::new(), never_implausible());
        let listener = TestResultsListener::new();
        let packet = packet(0x00, vec![spn(110, Some(85.0))])
            .with_definition(PgnDefinition::new(65262, "Engine Temperature 1", vec![175, 110, 174]));

        validator.report_implausible_spn_values(&packet, &listener, false, 1, 26, "6.1.26");

        let results = listener.results();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0], "PGN 65262 with Supported SPNs 110, 174, 175");
        assert_eq!(results[1], packet.to_time_string());
        assert_eq!(results[2], format!("Found: {}", packet));
        assert_eq!(results[3], "");
    }

    #[test]
    fn test_reset_forgets_reported_packets() {
        let validator = TableA1Validator::with_plausibility(DataRepository::new(), never_implausible());
        let listener = TestResultsListener::new();
        let packet = packet(0x00, vec![spn(110, Some(85.0))]);

        validator.report_implausible_spn_values(&packet, &listener, false, 1, 26, "6.1.26");
        validator.reset();
        validator.report_implausible_spn_values(&packet, &listener, false, 1, 26, "6.1.26");

        assert_eq!(listener.results(), vec![String::new(), String::new()]);
    }

    #[test]
    fn test_implausible_uses_registered_fuel_type() {
        let repository = DataRepository::new();
        repository.set_vehicle_information(j1939_core::VehicleInformation {
            fuel_type: FuelType::Gasoline,
            ..Default::default()
        });
        let validator = TableA1Validator::new(repository);
        let listener = TestResultsListener::new();

        validator.report_implausible_spn_values(
            &packet(0x00, vec![spn(3719, Some(12.0))]),
            &listener,
            true,
            1,
            26,
            "6.1.26",
        );
        assert_eq!(listener.outcomes().len(), 1);
    }

    fn engine_declaring(spns: &[u32]) -> DataRepository {
        let repository = DataRepository::new();
        repository.put_module(
            ModuleInfo::new(0x00)
                .with_supported_spns(spns.iter().map(|id| SupportedSpn::data_stream(*id)).collect()),
        );
        repository
    }

    #[test]
    fn test_non_obd_module_findings() {
        let validator = TableA1Validator::new(engine_declaring(&[84, 96, 158, 190, 544]));
        let listener = TestResultsListener::new();
        let packet = packet(
            0x17,
            vec![
                spn(84, Some(0.0)),
                spn(92, Some(10.0)),
                spn(96, Some(50.0)),
                spn(158, Some(24.0)),
                spn(190, Some(700.0)),
                spn(544, Some(10.0)),
            ],
        );

        validator.report_non_obd_module_provided_spns(&packet, &listener, 1, 26, "6.1.26");

        let outcomes = listener.outcomes();
        let summary: Vec<(Outcome, &str)> = outcomes
            .iter()
            .map(|o| (o.outcome, o.message.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Outcome::Warn, "6.1.26.6 - SPN 84 provided by non-OBD Module Instrument Cluster #1 (23)"),
                (Outcome::Info, "6.1.26.6 - SPN 96 provided by non-OBD Module Instrument Cluster #1 (23)"),
                (Outcome::Warn, "6.1.26.6 - SPN 190 provided by non-OBD Module Instrument Cluster #1 (23)"),
                (Outcome::Fail, "6.1.26.6 - SPN 544 provided by non-OBD Module Instrument Cluster #1 (23)"),
            ]
        );
        assert_eq!(listener.results()[0], "");
    }

    #[test]
    fn test_obd_module_own_packet_is_silent() {
        let validator = TableA1Validator::new(engine_declaring(&[92]));
        let listener = TestResultsListener::new();
        let packet = packet(0x00, vec![spn(190, Some(700.0)), spn(92, Some(10.0))]);

        validator.report_non_obd_module_provided_spns(&packet, &listener, 1, 26, "6.1.26");

        assert!(listener.outcomes().is_empty());
        assert_eq!(listener.results(), vec![String::new()]);
    }

    #[test]
    fn test_non_obd_ignores_signals_no_obd_module_declares() {
        let validator = TableA1Validator::new(engine_declaring(&[92]));
        let listener = TestResultsListener::new();
        let packet = packet(0x17, vec![spn(190, Some(700.0)), spn(544, Some(10.0))]);

        validator.report_non_obd_module_provided_spns(&packet, &listener, 1, 26, "6.1.26");

        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_non_obd_without_registered_modules_is_silent() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let packet = packet(0x3D, vec![spn(92, Some(10.0))]);

        validator.report_non_obd_module_provided_spns(&packet, &listener, 1, 26, "6.1.26");

        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_non_obd_unregistered_source_uses_address_name() {
        let validator = TableA1Validator::new(engine_declaring(&[92]));
        let listener = TestResultsListener::new();
        let packet = packet(0x3D, vec![spn(92, Some(10.0))])
            .with_definition(PgnDefinition::new(61443, "Electronic Engine Controller 2", vec![92, 91]));

        validator.report_non_obd_module_provided_spns(&packet, &listener, 2, 3, "6.2.3");

        let results = listener.results();
        assert_eq!(results[0], "PGN 61443 with Supported SPNs 91, 92");
        assert_eq!(results[3], "");
        assert_eq!(
            results[4],
            "FAIL: 6.2.3.6 - SPN 92 provided by non-OBD Module Exhaust Emission Controller (61)"
        );
    }

    #[test]
    fn test_non_obd_packet_without_signals() {
        let validator = TableA1Validator::new(DataRepository::new());
        let listener = TestResultsListener::new();
        let packet = Packet::new(65262, 0x17, vec![])
            .with_definition(PgnDefinition::new(65262, "Engine Temperature 1", vec![110]));

        validator.report_non_obd_module_provided_spns(&packet, &listener, 1, 26, "6.1.26");

        assert_eq!(listener.results(), vec![String::new()]);
        assert!(listener.outcomes().is_empty());
    }
}
