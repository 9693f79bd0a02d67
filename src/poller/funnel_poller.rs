use crate::api::ApiClient;
use crate::config::{AppConfig, SequencePolicy};
use crate::errors::{ApiResult, AppError, AppResult};
use crate::poller::state::{ApplyOutcome, DashboardState, FetchEvent};
use crate::poller::store::StateStore;
use crate::types::{FunnelAnalysisResult, InsightsResponse, RecommendationsResponse};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Insights requested alongside the funnel on each tick
const INSIGHTS_PER_TICK: usize = 10;

/// What one successful tick brings back
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub funnel: FunnelAnalysisResult,
    pub recommendations: Option<RecommendationsResponse>,
    pub insights: Option<InsightsResponse>,
}

/// Endpoints fetched per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollScope {
    #[default]
    FunnelOnly,
    /// Funnel, recommendations and insights, fetched concurrently
    WithInsights,
}

impl PollScope {
    pub fn from_flag(include_insights: bool) -> Self {
        if include_insights {
            PollScope::WithInsights
        } else {
            PollScope::FunnelOnly
        }
    }
}

/// Everything a refresh task needs, cloned into each spawned tick
#[derive(Debug, Clone)]
struct FetchContext {
    client: ApiClient,
    funnel_id: Arc<str>,
    scope: PollScope,
    store: Arc<StateStore>,
}

impl FetchContext {
    async fn fetch(&self) -> ApiResult<DashboardData> {
        let funnel_id: &str = &self.funnel_id;
        match self.scope {
            PollScope::FunnelOnly => Ok(DashboardData {
                funnel: self.client.fetch_funnel(funnel_id).await?,
                ..DashboardData::default()
            }),
            PollScope::WithInsights => {
                let (funnel, recommendations, insights) = futures::try_join!(
                    self.client.fetch_funnel(funnel_id),
                    self.client.fetch_recommendations(funnel_id),
                    self.client
                        .fetch_insights(funnel_id, None, Some(INSIGHTS_PER_TICK)),
                )?;
                Ok(DashboardData {
                    funnel,
                    recommendations: Some(recommendations),
                    insights: Some(insights),
                })
            }
        }
    }

    /// One guarded fetch-and-apply cycle
    async fn refresh(&self) -> ApplyOutcome {
        let request_id = self.store.begin_request();
        debug!("Dispatching request {} for funnel {}", request_id, self.funnel_id);

        let event = match self.fetch().await {
            Ok(data) => FetchEvent::succeeded(request_id, data),
            Err(e) => {
                warn!("Request {} failed: {}", request_id, e);
                FetchEvent::failed(request_id, e)
            }
        };

        self.store.apply(event)
    }
}

/// Periodically fetches one funnel and keeps a [`DashboardState`] current
///
/// Ticks are independent tasks: a slow response never delays the next tick,
/// and stopping the poller leaves requests already in flight to finish.
#[derive(Debug)]
pub struct FunnelPoller {
    ctx: FetchContext,
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Bumped on every start/stop so ticks of a stopped ticker never dispatch
    generation: Arc<AtomicU64>,
}

impl FunnelPoller {
    pub fn new(
        client: ApiClient,
        funnel_id: impl Into<String>,
        scope: PollScope,
        policy: SequencePolicy,
    ) -> Self {
        let funnel_id: String = funnel_id.into();
        Self {
            ctx: FetchContext {
                client,
                funnel_id: Arc::from(funnel_id),
                scope,
                store: Arc::new(StateStore::new(policy)),
            },
            ticker: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self::new(
            client,
            config.api.funnel_id.clone(),
            PollScope::from_flag(config.poller.include_insights),
            config.poller.sequence_policy,
        ))
    }

    pub fn funnel_id(&self) -> &str {
        &self.ctx.funnel_id
    }

    pub fn scope(&self) -> PollScope {
        self.ctx.scope
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.ctx.store.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.ctx.store.snapshot()
    }

    /// Fetch once and apply the result; resolves once the state is updated
    pub async fn refresh(&self) -> ApplyOutcome {
        self.ctx.refresh().await
    }

    /// Start ticking every `every`, the first tick firing immediately
    ///
    /// Restarts the ticker when already polling.
    pub fn start_polling(&self, every: Duration) -> AppResult<()> {
        if every.is_zero() {
            return Err(AppError::Config(
                "Polling interval must be greater than zero".to_string(),
            ));
        }

        let mut ticker = self.lock_ticker();
        if let Some(previous) = ticker.take() {
            debug!("Restarting poller for funnel {}", self.ctx.funnel_id);
            previous.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let ctx = self.ctx.clone();

        info!(
            "Polling funnel {} every {}ms",
            self.ctx.funnel_id,
            every.as_millis()
        );

        *ticker = Some(tokio::spawn(async move {
            let mut timer = interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if current.load(Ordering::SeqCst) != generation {
                    break;
                }
                let tick_ctx = ctx.clone();
                tokio::spawn(async move {
                    tick_ctx.refresh().await;
                });
            }
        }));

        Ok(())
    }

    /// Stop the ticker; returns whether it was running
    pub fn stop_polling(&self) -> bool {
        self.generation.fetch_add(1, Ordering::SeqCst);
        match self.lock_ticker().take() {
            Some(handle) => {
                handle.abort();
                info!("Stopped polling funnel {}", self.ctx.funnel_id);
                true
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_ticker(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for FunnelPoller {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
