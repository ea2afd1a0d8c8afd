use tracing::debug;

use events::ResultsListener;
use j1939_core::{FreezeFrame, Outcome, Spn};

use crate::bus::{DEFAULT_ENGINE_SPEED_THRESHOLD_RPM, ENGINE_SPEED_SPN};
use crate::report::report_outcome;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Below(f64),
    AtMost(f64),
    Above(f64),
    Equals(f64),
}

impl Comparison {
    fn violated_by(self, value: f64) -> bool {
        match self {
            Self::Below(limit) => value < limit,
            Self::AtMost(limit) => value <= limit,
            Self::Above(limit) => value > limit,
            Self::Equals(limit) => value == limit,
        }
    }
}

/// A group of freeze frame signals checked against the same limits.
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    spns: &'static [u32],
    limits: &'static [(Comparison, &'static str)],
    requires_engine_running: bool,
}

impl RangeRule {
    pub fn spns(&self) -> &'static [u32] {
        self.spns
    }

    pub fn requires_engine_running(&self) -> bool {
        self.requires_engine_running
    }

    /// Description of the first limit `value` violates.
    fn violation(&self, value: f64) -> Option<&'static str> {
        self.limits
            .iter()
            .find(|(comparison, _)| comparison.violated_by(value))
            .map(|(_, description)| *description)
    }
}

const ENGINE_TEMPERATURE: &[(Comparison, &str)] = &[
    (Comparison::Below(7.0), "< 7 C"),
    (Comparison::Above(110.0), "> 110 C"),
];
const ENGINE_STOPPED: &[(Comparison, &str)] = &[(Comparison::AtMost(300.0), "<= 300 rpm")];
const NO_LOAD: &[(Comparison, &str)] = &[(Comparison::AtMost(0.0), "<= 0 %")];
const NEGATIVE_TORQUE: &[(Comparison, &str)] = &[(Comparison::Below(0.0), "< 0 %")];
const NOT_STARTED: &[(Comparison, &str)] = &[(Comparison::Equals(0.0), "= 0 s")];

/// Freeze frame range checks, evaluated in order.
pub static RANGE_RULES: &[RangeRule] = &[
    // Coolant, intake, oil and exhaust related temperatures
    RangeRule {
        spns: &[105, 110, 175, 1637, 4076, 4193],
        limits: ENGINE_TEMPERATURE,
        requires_engine_running: false,
    },
    // Engine speed and its proxies
    RangeRule {
        spns: &[190, 723, 4201],
        limits: ENGINE_STOPPED,
        requires_engine_running: false,
    },
    // Percent load
    RangeRule {
        spns: &[92],
        limits: NO_LOAD,
        requires_engine_running: true,
    },
    // Driver's demand torque
    RangeRule {
        spns: &[512],
        limits: NO_LOAD,
        requires_engine_running: true,
    },
    // Actual torque
    RangeRule {
        spns: &[513],
        limits: NEGATIVE_TORQUE,
        requires_engine_running: true,
    },
    // Time since engine start
    RangeRule {
        spns: &[3301],
        limits: NOT_STARTED,
        requires_engine_running: true,
    },
];

/// Table A-2 freeze frame checks.
#[derive(Debug, Clone)]
pub struct TableA2ValueValidator {
    part_number: u8,
    step_number: u8,
    engine_speed_threshold_rpm: f64,
}

impl TableA2ValueValidator {
    pub fn new(part_number: u8, step_number: u8) -> Self {
        Self {
            part_number,
            step_number,
            engine_speed_threshold_rpm: DEFAULT_ENGINE_SPEED_THRESHOLD_RPM,
        }
    }

    pub fn with_engine_speed_threshold(mut self, rpm: f64) -> Self {
        self.engine_speed_threshold_rpm = rpm;
        self
    }

    /// Warn about freeze frame values outside their expected range.
    ///
    /// Nothing is checked when the frame has no usable engine speed; a
    /// single `Unable to confirm engine speed` line is written instead.
    pub fn report_warnings(&self, frame: &FreezeFrame, listener: &dyn ResultsListener, citation: &str) {
        let Some(engine_speed) = frame.spn(ENGINE_SPEED_SPN).and_then(|s| s.value) else {
            debug!(dtc = %frame.dtc, "Freeze frame without engine speed");
            listener.on_result("Unable to confirm engine speed");
            return;
        };
        let engine_running = engine_speed > self.engine_speed_threshold_rpm;

        for rule in RANGE_RULES {
            if rule.requires_engine_running && !engine_running {
                continue;
            }
            for id in rule.spns {
                let Some((spn, value)) = frame.spn(*id).and_then(|s| s.value.map(|v| (s, v))) else {
                    continue;
                };
                if let Some(condition) = rule.violation(value) {
                    report_outcome(
                        listener,
                        self.part_number,
                        self.step_number,
                        Outcome::Warn,
                        citation,
                        &warning(spn, value, condition),
                    );
                }
            }
        }
    }
}

fn warning(spn: &Spn, value: f64, condition: &str) -> String {
    format!(
        "SPN {:<5}, {}: {:.6} {} is {}",
        spn.id, spn.label, value, spn.unit, condition
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::TestResultsListener;
    use j1939_core::DiagnosticTroubleCode;

    fn frame(spns: Vec<Spn>) -> FreezeFrame {
        let mut frame = FreezeFrame::new(DiagnosticTroubleCode::new(102, 18, 1), vec![]);
        frame.set_spns(spns);
        frame
    }

    fn engine_speed(rpm: f64) -> Spn {
        Spn::new(190, "Engine Speed", "rpm", Some(rpm))
    }

    #[test]
    fn test_missing_engine_speed_stops_checks() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![Spn::new(110, "Engine Coolant Temperature", "C", Some(150.0))]),
            &listener,
            "6.1.12.2.c",
        );

        assert_eq!(listener.results(), vec!["Unable to confirm engine speed".to_string()]);
        assert!(listener.outcomes().is_empty());
    }

    #[test]
    fn test_not_available_engine_speed_stops_checks() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![Spn::new(190, "Engine Speed", "rpm", None)]),
            &listener,
            "6.1.12.2.c",
        );
        assert_eq!(listener.results(), vec!["Unable to confirm engine speed".to_string()]);
    }

    #[test]
    fn test_no_findings_writes_nothing() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![
                engine_speed(650.0),
                Spn::new(110, "Engine Coolant Temperature", "C", Some(85.0)),
                Spn::new(92, "Engine Percent Load At Current Speed", "%", Some(20.0)),
            ]),
            &listener,
            "6.1.12.2.c",
        );
        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_temperature_limits() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![
                engine_speed(650.0),
                Spn::new(175, "Engine Oil Temperature 1", "C", Some(120.5)),
                Spn::new(110, "Engine Coolant Temperature", "C", Some(5.0)),
            ]),
            &listener,
            "6.1.12.2.c",
        );

        assert_eq!(
            listener.results(),
            vec![
                "WARN: 6.1.12.2.c - SPN 110  , Engine Coolant Temperature: 5.000000 C is < 7 C".to_string(),
                "WARN: 6.1.12.2.c - SPN 175  , Engine Oil Temperature 1: 120.500000 C is > 110 C".to_string(),
            ]
        );
        assert_eq!(listener.outcomes().len(), 2);
    }

    #[test]
    fn test_engine_speed_at_threshold_skips_conditional_checks() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![
                engine_speed(300.0),
                Spn::new(92, "Engine Percent Load At Current Speed", "%", Some(0.0)),
                Spn::new(3301, "Time Since Engine Start", "s", Some(0.0)),
            ]),
            &listener,
            "6.1.12.2.c",
        );

        assert_eq!(
            listener.results(),
            vec!["WARN: 6.1.12.2.c - SPN 190  , Engine Speed: 300.000000 rpm is <= 300 rpm".to_string()]
        );
    }

    #[test]
    fn test_conditional_checks_when_running() {
        let validator = TableA2ValueValidator::new(1, 12);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![
                engine_speed(800.0),
                Spn::new(3301, "Time Since Engine Start", "s", Some(0.0)),
                Spn::new(513, "Actual Engine - Percent Torque", "%", Some(0.0)),
                Spn::new(512, "Driver's Demand Engine - Percent Torque", "%", Some(0.0)),
                Spn::new(92, "Engine Percent Load At Current Speed", "%", Some(0.0)),
            ]),
            &listener,
            "6.1.12.2.c",
        );

        let results = listener.results();
        assert_eq!(results.len(), 3);
        assert!(results[0].contains("SPN 92   , Engine Percent Load At Current Speed: 0.000000 % is <= 0 %"));
        assert!(results[1].contains("SPN 512  , Driver's Demand Engine - Percent Torque: 0.000000 % is <= 0 %"));
        assert!(results[2].contains("SPN 3301 , Time Since Engine Start: 0.000000 s is = 0 s"));
    }

    #[test]
    fn test_custom_threshold() {
        let validator = TableA2ValueValidator::new(1, 12).with_engine_speed_threshold(1000.0);
        let listener = TestResultsListener::new();
        validator.report_warnings(
            &frame(vec![
                engine_speed(800.0),
                Spn::new(92, "Engine Percent Load At Current Speed", "%", Some(0.0)),
            ]),
            &listener,
            "6.1.12.2.c",
        );
        assert!(listener.results().is_empty());
    }

    #[test]
    fn test_rules_cover_ascending_ids() {
        for rule in RANGE_RULES {
            assert!(rule.spns().windows(2).all(|w| w[0] < w[1]));
        }
        assert!(RANGE_RULES.iter().filter(|r| r.requires_engine_running()).count() == 4);
    }
}
