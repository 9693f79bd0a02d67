//! Analysis module unit tests

pub mod insight_summary;
pub mod recommendations;
