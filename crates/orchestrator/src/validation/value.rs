use j1939_core::FuelType;

/// Decides whether a reported signal value is implausible.
///
/// `engine_on` tells whether the engine was running when the value was
/// read. Closures with the same shape implement the trait, so tests and
/// callers can inject their own rule.
pub trait PlausibilityCheck: Send + Sync {
    fn is_implausible(&self, spn: u32, value: Option<f64>, engine_on: bool, fuel_type: FuelType) -> bool;
}

impl<F> PlausibilityCheck for F
where
    F: Fn(u32, Option<f64>, bool, FuelType) -> bool + Send + Sync,
{
    fn is_implausible(&self, spn: u32, value: Option<f64>, engine_on: bool, fuel_type: FuelType) -> bool {
        self(spn, value, engine_on, fuel_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    CompressionIgnition,
    Any,
}

/// Inclusive plausible range for one signal, split by engine state.
#[derive(Debug, Clone, Copy)]
struct PlausibleRange {
    spn: u32,
    engine_off: (f64, f64),
    engine_on: (f64, f64),
    engine: Engine,
}

const fn range(spn: u32, engine_off: (f64, f64), engine_on: (f64, f64)) -> PlausibleRange {
    PlausibleRange {
        spn,
        engine_off,
        engine_on,
        engine: Engine::Any,
    }
}

const fn compression_ignition(spn: u32, engine_off: (f64, f64), engine_on: (f64, f64)) -> PlausibleRange {
    PlausibleRange {
        spn,
        engine_off,
        engine_on,
        engine: Engine::CompressionIgnition,
    }
}

static PLAUSIBLE_RANGES: &[PlausibleRange] = &[
    // Wheel-based vehicle speed, km/h; the vehicle is parked for the test
    range(84, (0.0, 3.0), (0.0, 3.0)),
    // Accelerator pedal position, %
    range(91, (0.0, 100.0), (0.0, 100.0)),
    // Engine percent load at current speed, %
    range(92, (0.0, 0.0), (0.0, 100.0)),
    // Fuel level, %
    range(96, (0.0, 100.0), (0.0, 100.0)),
    // Intake manifold pressure, kPa
    range(102, (0.0, 10.0), (0.0, 400.0)),
    // Barometric pressure, kPa
    range(108, (70.0, 110.0), (70.0, 110.0)),
    // Engine coolant temperature, C
    range(110, (-40.0, 110.0), (-40.0, 130.0)),
    // Engine speed, rpm
    range(190, (0.0, 50.0), (300.0, 8_031.875)),
    // Driver's demand engine percent torque, %
    range(512, (0.0, 0.0), (0.0, 125.0)),
    // Actual engine percent torque, %
    range(513, (0.0, 0.0), (-125.0, 125.0)),
    // DEF tank level, %
    compression_ignition(1761, (0.0, 100.0), (0.0, 100.0)),
    // Time since engine start, s
    range(3301, (0.0, 0.0), (1.0, 64_255.0)),
    // DPF soot load, %
    compression_ignition(3719, (0.0, 250.0), (0.0, 250.0)),
];

/// Default plausibility rules for data stream values.
///
/// A value outside the inclusive range for the current engine state is
/// implausible, as is any value for a compression-ignition-only signal on
/// a vehicle without such an engine. Signals without a rule and values
/// marked not available are never implausible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableA1ValueValidator;

impl TableA1ValueValidator {
    pub fn new() -> Self {
        Self
    }
}

impl PlausibilityCheck for TableA1ValueValidator {
    fn is_implausible(&self, spn: u32, value: Option<f64>, engine_on: bool, fuel_type: FuelType) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(rule) = PLAUSIBLE_RANGES.iter().find(|r| r.spn == spn) else {
            return false;
        };
        if rule.engine == Engine::CompressionIgnition && !fuel_type.is_compression_ignition() {
            return true;
        }
        let (min, max) = if engine_on { rule.engine_on } else { rule.engine_off };
        value < min || value > max
    }
}
