//! Shared data model for the J1939 diagnostic test engine.
//!
//! Decoded signals and packets, freeze frames, outcomes and part/step
//! results, the module registry and the static name tables.

pub mod data_repository;
pub mod domain;
pub mod error;
pub mod lookup;

pub use data_repository::{DataRepository, VehicleInformation};
pub use domain::*;
pub use error::{CoreError, Result};
pub use lookup::{Lookup, UNKNOWN};
