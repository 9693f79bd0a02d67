//! Onboarding funnel analytics client
//!
//! Fetches funnel analyses and AI insight collections from the analytics
//! backend, keeps a polled dashboard state consistent under out-of-order
//! responses, derives funnel metrics and exports results to CSV.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod poller;
pub mod types;
pub mod utils;
