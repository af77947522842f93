//! Uptime Status Dashboard Library
//!
//! This library polls a health-check API, normalizes the uptime history it
//! returns and maintains the view state a renderer draws: online status, uptime
//! averages, a 30-day uptime strip and the responsive layout around them.

pub mod config;
pub mod errors;
pub mod models;
pub mod history;
pub mod transport;
pub mod refresh;
pub mod breakpoints;
pub mod debounce;
pub mod scroll;
pub mod view;
pub mod dashboard;
pub mod render;

pub use config::Config;
pub use dashboard::Dashboard;
pub use errors::{DashboardError, Result};
pub use models::{Averages, HistoryEntry, HistoryWindow, OnlineStatus, Period, HISTORY_WINDOW};
pub use refresh::{derive_error, RefreshEngine, Snapshot};
pub use transport::{HealthApi, HttpHealthApi, MetricsSnapshot};
pub use view::{ViewState, ViewStore};
