use crate::config::SequencePolicy;
use crate::errors::{ApiError, ApiErrorKind};
use crate::poller::DashboardData;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Monotonically increasing id stamped on every fetch at dispatch time
pub type RequestId = u64;

/// Connection indicator shown next to the dashboard data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No response applied yet
    #[default]
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.pad(label)
    }
}

/// Completion of one dispatched fetch
#[derive(Debug, Clone)]
pub enum FetchEvent {
    Succeeded {
        request_id: RequestId,
        data: Box<DashboardData>,
        received_at: DateTime<Utc>,
    },
    Failed {
        request_id: RequestId,
        error: ApiError,
        failed_at: DateTime<Utc>,
    },
}

impl FetchEvent {
    pub fn succeeded(request_id: RequestId, data: DashboardData) -> Self {
        FetchEvent::Succeeded {
            request_id,
            data: Box::new(data),
            received_at: Utc::now(),
        }
    }

    pub fn failed(request_id: RequestId, error: ApiError) -> Self {
        FetchEvent::Failed {
            request_id,
            error,
            failed_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            FetchEvent::Succeeded { request_id, .. } | FetchEvent::Failed { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// What [`DashboardState::apply`] did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued or applied first
    Superseded,
}

/// Everything the dashboard displays
///
/// Mutated only through [`begin_request`](Self::begin_request) and
/// [`apply`](Self::apply).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub data: Option<DashboardData>,
    pub connection: ConnectionStatus,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_kind: Option<ApiErrorKind>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub latest_issued: RequestId,
    pub last_applied: RequestId,
    pub successes: u64,
    pub failures: u64,
    pub discarded: u64,
    #[serde(skip)]
    policy: SequencePolicy,
}

impl DashboardState {
    pub fn new(policy: SequencePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }

    /// Issue the id for a fetch about to be dispatched
    pub fn begin_request(&mut self) -> RequestId {
        self.latest_issued += 1;
        self.latest_issued
    }

    /// Whether an event with this id may still change the state
    pub fn accepts(&self, request_id: RequestId) -> bool {
        if request_id <= self.last_applied {
            return false;
        }
        match self.policy {
            SequencePolicy::LatestIssued => request_id == self.latest_issued,
            SequencePolicy::Monotonic => true,
        }
    }

    /// Single update entry point for fetch completions
    ///
    /// Success replaces the data wholesale and marks the connection healthy.
    /// Failure keeps whatever data was shown before and flags the connection.
    pub fn apply(&mut self, event: FetchEvent) -> ApplyOutcome {
        if !self.accepts(event.request_id()) {
            self.discarded += 1;
            return ApplyOutcome::Superseded;
        }

        match event {
            FetchEvent::Succeeded {
                request_id,
                data,
                received_at,
            } => {
                self.data = Some(*data);
                self.connection = ConnectionStatus::Connected;
                self.last_updated = Some(received_at);
                self.last_error = None;
                self.last_error_kind = None;
                self.last_applied = request_id;
                self.successes += 1;
            }
            FetchEvent::Failed {
                request_id,
                error,
                failed_at,
            } => {
                self.connection = ConnectionStatus::Error;
                self.last_error = Some(error.to_string());
                self.last_error_kind = Some(error.kind());
                self.last_error_at = Some(failed_at);
                self.last_applied = request_id;
                self.failures += 1;
            }
        }

        ApplyOutcome::Applied
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Data is on screen but the latest applied fetch failed
    pub fn is_stale(&self) -> bool {
        self.has_data() && self.connection == ConnectionStatus::Error
    }
}
