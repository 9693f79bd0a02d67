//! Funnel data polling
//!
//! - **State** - `DashboardState` and its single update entry point
//! - **Store** - Mutex-guarded state plus a `watch` channel of snapshots
//! - **Poller** - `FunnelPoller`: one-shot refresh, start/stop of the tick loop
//!
//! Ticks are never coalesced: each one runs as its own task. Responses can
//! therefore complete out of order, and the request-id guard in
//! [`DashboardState::apply`] decides which of them may touch the state.

pub mod funnel_poller;
pub mod state;
pub mod store;

pub use funnel_poller::{DashboardData, FunnelPoller, PollScope};
pub use state::{ApplyOutcome, ConnectionStatus, DashboardState, FetchEvent, RequestId};
pub use store::StateStore;
