//! Results sinks for the J1939 diagnostic test engine
//!
//! This crate provides the listener contract every test run reports to,
//! the event types that mirror it, and a broadcast event bus.

mod bus;
mod listener;
pub mod testing;
mod types;

pub use bus::{EventBus, EventBusListener};
pub use listener::{CompositeListener, NoOpResultsListener, ResultsListener};
pub use testing::TestResultsListener;
pub use types::*;
