//! Data validation performed by the diagnostic steps.
//!
//! - `table_a1`: who provides which signal, and whether packets carry
//!   plausible values
//! - `value`: the plausibility predicate used by `table_a1`
//! - `table_a2`: freeze frame range checks that depend on engine speed

mod table_a1;
mod table_a2;
mod value;

pub use table_a1::{TableA1Validator, DUPLICATE_SPN_OUTCOMES, NON_OBD_SPN_OUTCOMES};
pub use table_a2::{RangeRule, TableA2ValueValidator, RANGE_RULES};
pub use value::{PlausibilityCheck, TableA1ValueValidator};

use j1939_core::Outcome;

/// Severity configured for `spn` in an `(spn, outcome)` table.
pub(crate) fn table_outcome(table: &[(u32, Outcome)], spn: u32) -> Option<Outcome> {
    table.iter().find(|(id, _)| *id == spn).map(|(_, outcome)| *outcome)
}
