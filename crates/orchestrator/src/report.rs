use events::ResultsListener;
use j1939_core::Outcome;

/// Report a finding both as an outcome and as a result line.
///
/// The outcome message is `"<citation> - <text>"`; the result line prefixes
/// it with the severity.
pub fn report_outcome(
    listener: &dyn ResultsListener,
    part_number: u8,
    step_number: u8,
    outcome: Outcome,
    citation: &str,
    text: &str,
) {
    let message = format!("{} - {}", citation, text);
    listener.add_outcome(part_number, step_number, outcome, &message);
    listener.on_result(&format!("{}: {}", outcome, message));
}
