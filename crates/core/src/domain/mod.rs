mod freeze_frame;
mod fuel_type;
mod module;
mod outcome;
mod packet;
mod results;
mod spn;

pub use freeze_frame::{DiagnosticTroubleCode, FreezeFrame};
pub use fuel_type::FuelType;
pub use module::{ModuleInfo, SupportedSpn};
pub use outcome::{ActionOutcome, Outcome};
pub use packet::{Packet, PacketId, PgnDefinition};
pub use results::{PartResult, StepResult};
pub use spn::Spn;
