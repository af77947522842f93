//! Data refresh engine: one fetch-normalize-publish cycle

use crate::models::{Averages, HistoryWindow, OnlineStatus};
use crate::transport::{
    averages_or_empty, history_or_empty, status_or_unknown, HealthApi, MetricsSnapshot,
};
use crate::view::ViewStore;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// The data published by one refresh cycle
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub status: OnlineStatus,
    pub averages: Averages,
    pub history: HistoryWindow,
    pub loading: bool,
    pub error: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::loading()
    }
}

impl Snapshot {
    /// State before the first cycle completes
    pub fn loading() -> Self {
        Self {
            status: OnlineStatus::Unknown,
            averages: Averages::new(),
            history: HistoryWindow::empty(),
            loading: true,
            error: false,
        }
    }

    pub fn from_parts(status: OnlineStatus, averages: Averages, history: HistoryWindow) -> Self {
        let error = derive_error(status, &averages, &history);
        Self {
            status,
            averages,
            history,
            loading: false,
            error,
        }
    }
}

/// The error banner shows when any of the three sources degraded
pub fn derive_error(status: OnlineStatus, averages: &Averages, history: &HistoryWindow) -> bool {
    !status.is_known() || !averages.is_complete() || history.first().is_none()
}

/// Fetches the three sources concurrently and publishes the result
pub struct RefreshEngine {
    api: Arc<dyn HealthApi>,
    store: Arc<ViewStore>,
    cycles: AtomicU64,
}

impl RefreshEngine {
    pub fn new(api: Arc<dyn HealthApi>, store: Arc<ViewStore>) -> Self {
        Self {
            api,
            store,
            cycles: AtomicU64::new(0),
        }
    }

    /// Number of cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Request counters of the underlying client, if it keeps any
    pub fn transport_metrics(&self) -> Option<MetricsSnapshot> {
        self.api.metrics()
    }

    /// Fetch and normalize without publishing
    pub async fn fetch_snapshot(&self) -> Snapshot {
        let api = self.api.as_ref();
        let today = Utc::now().date_naive();

        let (status, averages, history) = tokio::join!(
            status_or_unknown(api),
            averages_or_empty(api),
            history_or_empty(api, today),
        );

        Snapshot::from_parts(status, averages, history)
    }

    /// Run one cycle and publish its snapshot as a single state transition.
    ///
    /// Never fails; a degraded source only sets the error flag. The snapshot
    /// is dropped if the view store was closed while the fetches were in flight.
    #[instrument(skip(self), fields(cycle = tracing::field::Empty))]
    pub async fn refresh(&self) -> Snapshot {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::Span::current().record("cycle", cycle);
        let started = Instant::now();

        let snapshot = self.fetch_snapshot().await;

        if snapshot.error {
            warn!(
                "Refresh cycle {} degraded - status: {}, averages: {}/3, history days: {}",
                cycle,
                snapshot.status,
                snapshot.averages.len(),
                snapshot.history.len()
            );
        } else {
            info!(
                "Refresh cycle {} completed in {}ms - service is {}",
                cycle,
                started.elapsed().as_millis(),
                snapshot.status
            );
        }

        if let Some(metrics) = self.transport_metrics() {
            debug!(
                "Health API requests: {} attempts, {} failed ({:.1}% success)",
                metrics.attempts, metrics.failures, metrics.success_rate
            );
        }

        if !self.store.publish_snapshot(snapshot.clone()) {
            debug!("Refresh cycle {} finished after teardown", cycle);
        }

        snapshot
    }
}
