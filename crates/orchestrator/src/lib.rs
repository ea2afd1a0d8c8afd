pub mod bus;
pub mod config;
pub mod error;
pub mod executor;
pub mod overall;
pub mod part;
pub mod report;
pub mod step;
mod tracking;
pub mod validation;

pub use bus::{Bus, BusAware, EngineSpeedModule};
pub use config::VerifierConfig;
pub use error::{OrchestratorError, Result};
pub use executor::{InlineSubmitter, QueuedSubmitter, Task, TaskSubmitter, TokioSubmitter};
pub use overall::OverallController;
pub use part::PartController;
pub use report::report_outcome;
pub use step::StepController;
pub use validation::{PlausibilityCheck, TableA1ValueValidator, TableA1Validator, TableA2ValueValidator};
