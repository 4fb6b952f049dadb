use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Config, DashboardConfig};
use crate::providers::transit::{TransitClient, TransitError};
use crate::state::{EtaSession, EtaStore, FeedState, FeedStore};

/// Which part of the view state an update notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Feed,
    Eta,
    Countdown,
}

/// Update notification for view state changes
#[derive(Debug, Clone)]
pub struct ViewUpdate {
    /// Timestamp when this update was generated
    pub timestamp: String,
    /// The state group that changed
    pub source: UpdateSource,
}

/// Sender for view update notifications
pub type ViewUpdateSender = broadcast::Sender<ViewUpdate>;

/// The tracking & ETA synchronization engine.
///
/// Owns the feed and session stores, the countdown ticker loop, and
/// the coordination of the ETA sub-requests. All network outcomes are
/// converted into store transitions here; nothing propagates as an
/// unhandled fault.
pub struct SyncEngine {
    client: TransitClient,
    config: DashboardConfig,
    feed: FeedStore,
    session: EtaStore,
    updates_tx: ViewUpdateSender,
    /// In-flight feed fetch, aborted on teardown
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncEngine {
    pub fn new(config: &Config) -> Result<Self, TransitError> {
        let client = TransitClient::new(
            config.api_base_url.as_str(),
            Duration::from_secs(config.dashboard.request_timeout_secs),
            Duration::from_secs(config.dashboard.connect_timeout_secs),
        )?;

        // Capacity 16 - the display re-reads the stores anyway
        let (updates_tx, _) = broadcast::channel(16);

        Ok(Self {
            client,
            config: config.dashboard.clone(),
            feed: Arc::new(RwLock::new(FeedState::new())),
            session: Arc::new(RwLock::new(EtaSession::new())),
            updates_tx,
            feed_task: Mutex::new(None),
        })
    }

    /// Get a reference to the feed store for display access
    pub fn feed_store(&self) -> FeedStore {
        self.feed.clone()
    }

    /// Get a reference to the ETA session store for display access
    pub fn session_store(&self) -> EtaStore {
        self.session.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.updates_tx.subscribe()
    }

    fn notify(&self, source: UpdateSource) {
        // Ignore send errors - they just mean no one is listening
        let _ = self.updates_tx.send(ViewUpdate {
            timestamp: Utc::now().to_rfc3339(),
            source,
        });
    }

    /// Start the engine: one feed fetch on activation, then the
    /// countdown ticker for the life of the view. The position feed
    /// has no re-fetch interval; refreshes come from `trigger_refresh`.
    pub async fn start(self: Arc<Self>) {
        info!("Starting dashboard engine");

        self.clone().trigger_refresh().await;

        let tick_self = self.clone();
        let ticker = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(tick_self.config.tick_interval_secs));
            // Skip the first tick which fires immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let changed = tick_self.session.write().await.tick();
                if changed {
                    tick_self.notify(UpdateSource::Countdown);
                }
            }
        });

        // The ticker runs until the view is torn down
        let _ = ticker.await;
    }

    /// Abort the in-flight feed request on teardown. An aborted fetch
    /// never reaches a completion transition, so cancellation is not
    /// surfaced as a feed error.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.feed_task.lock().await.take() {
            handle.abort();
        }
        info!("Dashboard engine stopped");
    }

    /// Re-trigger the vehicle feed fetch. Ignored while a fetch is
    /// already outstanding.
    pub async fn trigger_refresh(self: Arc<Self>) {
        {
            let mut feed = self.feed.write().await;
            if feed.loading {
                debug!("Vehicle fetch already in flight, ignoring refresh");
                return;
            }
            feed.begin_fetch();
        }
        self.notify(UpdateSource::Feed);

        let fetch_self = self.clone();
        let handle = tokio::spawn(async move {
            fetch_self.fetch_vehicles().await;
        });
        *self.feed_task.lock().await = Some(handle);
    }

    async fn fetch_vehicles(&self) {
        match self.client.get_vehicles().await {
            Ok(vehicles) => {
                info!(count = vehicles.len(), "Fetched vehicle positions");
                self.feed.write().await.apply_vehicles(vehicles);
            }
            Err(e) => {
                warn!(error = %e, "Vehicle fetch failed");
                self.feed.write().await.apply_error("Failed to fetch vehicles");
            }
        }
        self.notify(UpdateSource::Feed);
    }

    /// Submit a stop identifier for an ETA query. Validation failures
    /// and query failures both end in a fully reset session with a
    /// surfaced message; success installs the new snapshot atomically.
    pub async fn submit_stop_query(&self, input: &str) {
        let stop_id = input.trim();

        if stop_id.is_empty() {
            self.session.write().await.reject_empty_input();
            self.notify(UpdateSource::Eta);
            return;
        }

        let token = self.session.write().await.begin_query();
        self.notify(UpdateSource::Eta);

        info!(stop_id, "Querying arrivals and stop metadata");
        let (arrivals, stop) = tokio::join!(
            self.client.get_arrivals(stop_id, self.config.arrivals_limit),
            self.client.get_stop(stop_id)
        );

        let mut session = self.session.write().await;
        let applied = match (arrivals, stop) {
            (Ok(arrivals), Ok(stop)) => {
                let count = arrivals.len();
                let applied = session.apply_success(
                    token,
                    arrivals,
                    stop,
                    self.config.arrivals_limit as usize,
                );
                if applied {
                    info!(stop_id, arrivals = count, "ETA query succeeded");
                }
                applied
            }
            (arrivals, stop) => {
                if let Err(e) = &arrivals {
                    warn!(stop_id, error = %e, "Arrivals request failed");
                }
                if let Err(e) = &stop {
                    warn!(stop_id, error = %e, "Stop metadata request failed");
                }
                session.apply_failure(token, "Failed to fetch ETA")
            }
        };
        drop(session);

        if applied {
            self.notify(UpdateSource::Eta);
        } else {
            debug!(stop_id, "Discarded response for an abandoned query");
        }
    }
}
