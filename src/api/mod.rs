//! Analytics backend HTTP integration
//!
//! - **Client** - Async `reqwest` client with one typed method per endpoint
//! - **Endpoints** - Catalogue of backend paths and their HTTP methods
//!
//! Every call is a single attempt. Failures are classified into network,
//! parse and application errors and handed back to the caller; the poller
//! decides what to do with them.

pub mod client;
pub mod endpoints;

// Re-export main types
pub use client::{decode_body, ApiClient};
pub use endpoints::Endpoint;
