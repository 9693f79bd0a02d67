//! Unit tests for the pure parts of the crate: metrics, recommendation
//! rules, CSV export and the dashboard state machine.

pub mod analysis;
