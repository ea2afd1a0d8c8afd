use std::sync::Arc;

use events::ResultsListener;

use crate::bus::Bus;
use crate::error::Result;

/// One diagnostic check within a part.
///
/// Step numbers are 1-based and must match the step's position in its
/// part; `total_steps` must equal the number of steps in the part.
pub trait StepController: Send + Sync {
    fn step_number(&self) -> u8;

    fn total_steps(&self) -> u8;

    /// Perform the check, reporting findings to `listener`.
    ///
    /// An `Err` is recorded as a failed step; the part continues with the
    /// next step.
    fn run(&self, listener: &dyn ResultsListener, bus: &Arc<dyn Bus>) -> Result<()>;
}
