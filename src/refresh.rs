//! Refresh Coordinator
//!
//! Owns the live dashboard state and decides which fetch results may update
//! it. Every refresh takes a token from a monotonically increasing counter;
//! a completed fetch is committed only if its token is still the latest one
//! issued. Results of superseded fetches are dropped silently, so the
//! transport never needs cancellation support.

use crate::analytics::{ColumnMap, Snapshot};
use crate::dashboard::{Dashboard, DisplayOptions};
use crate::sheet::{Dataset, SheetSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Configuration for refresh behaviour
#[derive(Debug, Clone, Default)]
pub struct RefreshConfig {
    /// Seconds between background refreshes; 0 disables them
    pub interval_secs: u64,
}

/// Connection state shown in the status bar
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LiveStatus {
    /// Nothing fetched yet
    #[default]
    Idle,
    Loading,
    Connected,
    Failed { error: String },
}

impl LiveStatus {
    /// Status bar message
    pub fn message(&self) -> String {
        match self {
            LiveStatus::Idle => "Not connected".to_string(),
            LiveStatus::Loading => "Connecting to Google Sheets…".to_string(),
            LiveStatus::Connected => "Live data connected".to_string(),
            LiveStatus::Failed { error } => format!("Connection failed: {}", error),
        }
    }
}

/// Current state of the live dashboard
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    pub status: LiveStatus,
    /// Source columns of the committed dataset
    pub columns: Vec<String>,
    pub column_map: ColumnMap,
    pub row_count: usize,
    pub snapshot: Option<Arc<Snapshot>>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Token of the last committed refresh
    pub committed_token: u64,
    /// Whether any refresh has finished (successfully or not)
    pub completed: bool,
}

/// What happened to a refresh request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Committed { token: u64, rows: usize, duration_ms: u64 },
    /// A newer refresh was issued before this one finished
    Superseded { token: u64, latest: u64 },
    Failed { token: u64, error: String },
}

/// Coordinates fetches from a sheet source into the live state
pub struct RefreshCoordinator {
    source: Arc<dyn SheetSource>,
    latest: AtomicU64,
    state: RwLock<LiveState>,
    config: RefreshConfig,
}

impl RefreshCoordinator {
    pub fn new(source: Arc<dyn SheetSource>, config: RefreshConfig) -> Self {
        Self {
            source,
            latest: AtomicU64::new(0),
            state: RwLock::new(LiveState::default()),
            config,
        }
    }

    pub fn source(&self) -> &dyn SheetSource {
        self.source.as_ref()
    }

    /// Latest token issued so far
    pub fn latest_token(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Copy of the current live state
    pub async fn state(&self) -> LiveState {
        self.state.read().await.clone()
    }

    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Whether any refresh has completed yet
    pub async fn has_completed(&self) -> bool {
        self.state.read().await.completed
    }

    /// Live dashboard, or the fallback while no snapshot exists
    pub async fn dashboard(&self, display: &DisplayOptions) -> (bool, Dashboard) {
        let snapshot = self.snapshot().await;
        (
            snapshot.is_some(),
            Dashboard::from_optional(snapshot.as_deref(), display),
        )
    }

    /// Fetch the sheet and commit the result if no newer refresh was issued
    pub async fn refresh(&self) -> RefreshOutcome {
        // Issue under the write lock so Loading transitions follow token order
        let token = {
            let mut state = self.state.write().await;
            let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            state.status = LiveStatus::Loading;
            token
        };

        tracing::debug!(token, source = self.source.name(), "Refresh started");
        let started = Instant::now();
        let result = self.source.fetch().await;
        let duration_ms = started.elapsed().as_millis() as u64;

        if let Some(outcome) = self.superseded(token) {
            return outcome;
        }

        // Aggregate outside the lock
        let prepared = result.map(|dataset| {
            let snapshot = dataset.snapshot().map(Arc::new);
            (dataset, snapshot)
        });

        let mut state = self.state.write().await;
        if let Some(outcome) = self.superseded(token) {
            return outcome;
        }

        state.completed = true;
        state.committed_token = token;

        match prepared {
            Ok((dataset, snapshot)) => {
                let rows = dataset.rows.len();
                commit_dataset(&mut state, dataset, snapshot);
                state.status = LiveStatus::Connected;
                state.refreshed_at = Some(Utc::now());

                tracing::info!(token, rows, duration_ms, "Refresh committed");
                RefreshOutcome::Committed {
                    token,
                    rows,
                    duration_ms,
                }
            }
            Err(e) => {
                let error = e.to_string();
                commit_dataset(&mut state, Dataset::default(), None);
                state.status = LiveStatus::Failed {
                    error: error.clone(),
                };

                tracing::warn!(token, error = %error, "Refresh failed");
                RefreshOutcome::Failed { token, error }
            }
        }
    }

    fn superseded(&self, token: u64) -> Option<RefreshOutcome> {
        let latest = self.latest_token();
        if latest == token {
            return None;
        }

        tracing::debug!(token, latest, "Discarding superseded refresh");
        Some(RefreshOutcome::Superseded { token, latest })
    }

    /// Start background refresh task
    ///
    /// Spawns a tokio task that refreshes on the configured interval.
    /// Returns `None` when periodic refresh is disabled.
    pub fn start_background_refresh(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if self.config.interval_secs == 0 {
            tracing::info!("Background refresh disabled");
            return None;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            "Starting background refresh"
        );

        Some(tokio::spawn(async move {
            let interval = std::time::Duration::from_secs(self.config.interval_secs);
            let mut ticker = tokio::time::interval(interval);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;
                tracing::debug!("Running scheduled refresh");
                self.refresh().await;
            }
        }))
    }
}

fn commit_dataset(state: &mut LiveState, dataset: Dataset, snapshot: Option<Arc<Snapshot>>) {
    state.column_map = dataset.column_map();
    state.row_count = dataset.rows.len();
    state.columns = dataset.columns;
    state.snapshot = snapshot;
}
