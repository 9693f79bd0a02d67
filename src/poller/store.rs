use crate::config::SequencePolicy;
use crate::poller::state::{ApplyOutcome, DashboardState, FetchEvent, RequestId};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::debug;

/// Shared home of the dashboard state
///
/// All mutation is serialized behind one mutex; readers get cloned snapshots
/// through a `watch` channel so they never hold the lock.
#[derive(Debug)]
pub struct StateStore {
    state: Mutex<DashboardState>,
    snapshots: watch::Sender<DashboardState>,
}

impl StateStore {
    pub fn new(policy: SequencePolicy) -> Self {
        let initial = DashboardState::new(policy);
        let (snapshots, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            snapshots,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        // State is only ever replaced field by field, a poisoned guard is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin_request(&self) -> RequestId {
        self.lock().begin_request()
    }

    /// Apply an event and publish the resulting snapshot
    pub fn apply(&self, event: FetchEvent) -> ApplyOutcome {
        let request_id = event.request_id();
        let mut state = self.lock();
        let outcome = state.apply(event);
        if outcome == ApplyOutcome::Superseded {
            debug!(
                "Discarded response for request {} (latest issued {}, last applied {})",
                request_id, state.latest_issued, state.last_applied
            );
        }
        self.snapshots.send_replace(state.clone());
        outcome
    }

    pub fn snapshot(&self) -> DashboardState {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.snapshots.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(SequencePolicy::default())
    }
}
