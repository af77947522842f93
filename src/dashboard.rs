//! Dashboard controller: owns the poll timer and the resize listener

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::errors::Result;
use crate::refresh::{RefreshEngine, Snapshot};
use crate::transport::{HealthApi, HttpHealthApi};
use crate::view::{ViewState, ViewStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

/// A running dashboard.
///
/// Refreshes once on start and then every `refresh_interval`; resize events are
/// debounced before breakpoints are recomputed. Dropping the dashboard (or
/// calling [`Dashboard::shutdown`]) stops both the poll timer and the resize
/// listener. Cycles already in flight are left to finish but can no longer
/// publish.
pub struct Dashboard {
    id: String,
    engine: Arc<RefreshEngine>,
    store: Arc<ViewStore>,
    poll_task: JoinHandle<()>,
    resize: Debouncer<u32>,
}

impl Dashboard {
    /// Start a dashboard against the HTTP health API described by `config`
    pub fn start(config: &Config) -> Result<Self> {
        let api = HttpHealthApi::new(
            config.base_url.clone(),
            config.service.clone(),
            config.http_timeout,
        )?;

        Self::with_api(config, Arc::new(api))
    }

    /// Start a dashboard against any [`HealthApi`]. Must be called within a
    /// tokio runtime.
    pub fn with_api(config: &Config, api: Arc<dyn HealthApi>) -> Result<Self> {
        config.validate()?;

        let id = Uuid::new_v4().to_string();
        let store = Arc::new(ViewStore::new());

        store.recompute_breakpoints(config.initial_viewport_width);

        let engine = Arc::new(RefreshEngine::new(api, Arc::clone(&store)));
        let poll_task = tokio::spawn(poll(Arc::clone(&engine), config.refresh_interval));

        let resize_store = Arc::clone(&store);
        let resize = Debouncer::spawn(config.resize_debounce, move |width: u32| {
            resize_store.recompute_breakpoints(width);
        });

        info!(
            "Dashboard {} started - refresh every {}s, resize debounce {}ms",
            id,
            config.refresh_interval.as_secs(),
            config.resize_debounce.as_millis()
        );

        Ok(Self {
            id,
            engine,
            store,
            poll_task,
            resize,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.store.current()
    }

    /// Report a viewport resize; applied once the burst settles
    pub fn resize(&self, viewport_width: u32) {
        if !self.resize.push(viewport_width) {
            debug!("Resize to {}px ignored, listener stopped", viewport_width);
        }
    }

    pub fn scroll(&self, offset: f64) {
        self.store.set_scroll_offset(offset);
    }

    /// Run one extra cycle now, outside the schedule
    pub fn retry(&self) -> JoinHandle<Snapshot> {
        info!("Manual refresh requested for dashboard {}", self.id);
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move { engine.refresh().await })
    }

    /// Number of refresh cycles started so far
    pub fn cycles(&self) -> u64 {
        self.engine.cycles()
    }

    /// Stop the poll timer and the resize listener
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.store.close();
        self.poll_task.abort();
        self.resize.cancel();
        info!("Dashboard {} stopped after {} refresh cycles", self.id, self.engine.cycles());

        if let Some(metrics) = self.engine.transport_metrics() {
            info!(
                "Health API totals - attempts: {}, failures: {}, success rate: {:.1}%",
                metrics.attempts, metrics.failures, metrics.success_rate
            );
        }
    }
}

/// Start a cycle on every tick, the first one immediately. Cycles are spawned
/// so a slow one never delays the next tick. Missed ticks are not replayed.
async fn poll(engine: Arc<RefreshEngine>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine.refresh().await;
        });
    }
}
