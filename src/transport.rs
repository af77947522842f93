//! HTTP transport for the health API

use crate::errors::{DashboardError, Result};
use crate::history;
use crate::models::{Averages, HistoryEntry, HistoryWindow, OnlineStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Read-only view of the health API
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// `GET /online`. `Ok(None)` when the body is JSON `null`.
    async fn fetch_online(&self) -> Result<Option<bool>>;

    /// `GET /averages`
    async fn fetch_averages(&self) -> Result<Averages>;

    /// `GET /history?service=...`, most recent last
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Request counters, for clients that keep them
    fn metrics(&self) -> Option<MetricsSnapshot> {
        None
    }
}

/// Health API client backed by reqwest
#[derive(Debug)]
pub struct HttpHealthApi {
    client: Client,
    base_url: String,
    service: String,
    timeout: Duration,
    metrics: EndpointMetrics,
}

impl HttpHealthApi {
    pub fn new(base_url: String, service: String, http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("status_dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
            timeout: http_timeout,
            metrics: EndpointMetrics::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let result = self.get_json_attempt(path, query).await;
        match &result {
            Ok(_) => self.metrics.successes.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.metrics.failures.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    async fn get_json_attempt<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = timeout(self.timeout, self.client.get(&url).query(query).send())
            .await
            .map_err(|_| DashboardError::Timeout(path.to_string()))?
            .map_err(|err| {
                if err.is_timeout() {
                    DashboardError::Timeout(path.to_string())
                } else {
                    DashboardError::Http(err)
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DashboardError::BadStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(DashboardError::Http)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HealthApi for HttpHealthApi {
    async fn fetch_online(&self) -> Result<Option<bool>> {
        self.get_json("/online", &[]).await
    }

    async fn fetch_averages(&self) -> Result<Averages> {
        self.get_json("/averages", &[]).await
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        self.get_json("/history", &[("service", self.service.as_str())]).await
    }

    fn metrics(&self) -> Option<MetricsSnapshot> {
        Some(self.metrics.snapshot())
    }
}

/// `/online` with every failure collapsed to [`OnlineStatus::Unknown`]
pub async fn status_or_unknown(api: &dyn HealthApi) -> OnlineStatus {
    match api.fetch_online().await {
        Ok(online) => OnlineStatus::from(online),
        Err(e) => {
            warn!("Online status unavailable: {}", e);
            OnlineStatus::Unknown
        }
    }
}

/// `/averages` with every failure collapsed to an empty mapping
pub async fn averages_or_empty(api: &dyn HealthApi) -> Averages {
    api.fetch_averages().await.unwrap_or_else(|e| {
        warn!("Uptime averages unavailable: {}", e);
        Averages::new()
    })
}

/// `/history` normalized into a window, with every failure collapsed to an
/// empty window
pub async fn history_or_empty(api: &dyn HealthApi, today: NaiveDate) -> HistoryWindow {
    match api.fetch_history().await {
        Ok(entries) => history::normalize(entries, today),
        Err(e) => {
            warn!("Uptime history unavailable: {}", e);
            HistoryWindow::empty()
        }
    }
}

#[derive(Debug, Default)]
struct EndpointMetrics {
    successes: AtomicU64,
    failures: AtomicU64,
}

impl EndpointMetrics {
    fn snapshot(&self) -> MetricsSnapshot {
        let successes = self.successes.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let attempts = successes + failures;

        let success_rate = if attempts > 0 {
            (successes as f64 / attempts as f64) * 100.0
        } else {
            0.0
        };

        MetricsSnapshot {
            attempts,
            successes,
            failures,
            success_rate,
        }
    }
}

/// Snapshot of request counters
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub success_rate: f64,
}
