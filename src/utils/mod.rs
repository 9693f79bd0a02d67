//! Shared helpers used across analysis, export and polling

pub mod math;
pub mod time;
