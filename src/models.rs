//! Health data structures shared by the fetch, view and render layers

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of days shown in the uptime strip
pub const HISTORY_WINDOW: usize = 30;

/// Whether the monitored service is currently reachable
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnlineStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl OnlineStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, OnlineStatus::Unknown)
    }
}

impl From<Option<bool>> for OnlineStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => OnlineStatus::Online,
            Some(false) => OnlineStatus::Offline,
            None => OnlineStatus::Unknown,
        }
    }
}

impl std::fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnlineStatus::Online => write!(f, "online"),
            OnlineStatus::Offline => write!(f, "offline"),
            OnlineStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Averaging periods reported by `/averages`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Day, Period::Week, Period::Month];

    /// Key used by the health API
    pub fn key(&self) -> &'static str {
        match self {
            Period::Day => "24hours",
            Period::Week => "7days",
            Period::Month => "30days",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "Last 24 hours",
            Period::Week => "Last 7 days",
            Period::Month => "Last 30 days",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Period::ALL.into_iter().find(|period| period.key() == key)
    }
}

/// Uptime ratios keyed by period. Partial or empty when the fetch degraded.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Averages {
    values: BTreeMap<Period, f64>,
}

impl Averages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, period: Period, ratio: f64) -> Self {
        self.values.insert(period, ratio);
        self
    }

    pub fn get(&self, period: Period) -> Option<f64> {
        self.values.get(&period).copied()
    }

    /// True when every period has a value
    pub fn is_complete(&self) -> bool {
        Period::ALL.iter().all(|period| self.values.contains_key(period))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Build from a decoded `/averages` body. `null` is an empty mapping;
    /// unknown keys and non-numeric values are skipped.
    pub fn from_json(body: &Value) -> Self {
        let mut averages = Averages::new();

        if let Some(object) = body.as_object() {
            for (key, value) in object {
                if let (Some(period), Some(ratio)) = (Period::from_key(key), value.as_f64()) {
                    averages.values.insert(period, ratio);
                }
            }
        }

        averages
    }
}

impl<'de> Deserialize<'de> for Averages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = Value::deserialize(deserializer)?;
        Ok(Averages::from_json(&body))
    }
}

/// One day of the uptime history. `uptime` is `None` when the day has no data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(default)]
    pub uptime: Option<f64>,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, uptime: Option<f64>) -> Self {
        Self { date, uptime }
    }

    pub fn placeholder(date: NaiveDate) -> Self {
        Self { date, uptime: None }
    }

    pub fn color(&self) -> UptimeColor {
        UptimeColor::classify(self.uptime)
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp and keeps the UTC day
fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_utc().date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Fixed-length, date-ordered uptime history.
///
/// Holds exactly [`HISTORY_WINDOW`] entries once normalized; a window is empty
/// only when the history fetch degraded.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HistoryWindow {
    entries: Vec<HistoryEntry>,
}

impl HistoryWindow {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_normalized(entries: Vec<HistoryEntry>) -> Self {
        debug_assert_eq!(entries.len(), HISTORY_WINDOW);
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

/// Color class of a day cell in the uptime strip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UptimeColor {
    Green,
    Yellow,
    Red,
    NoData,
}

impl UptimeColor {
    pub fn classify(uptime: Option<f64>) -> Self {
        match uptime {
            None => UptimeColor::NoData,
            Some(ratio) if ratio > 0.99 => UptimeColor::Green,
            Some(ratio) if ratio > 0.95 => UptimeColor::Yellow,
            Some(_) => UptimeColor::Red,
        }
    }

    /// Hex color the web dashboard paints the cell with
    pub fn hex(&self) -> &'static str {
        match self {
            UptimeColor::Green => "#00B512",
            UptimeColor::Yellow => "#ffc804",
            UptimeColor::Red => "#f44336",
            UptimeColor::NoData => "#eee",
        }
    }
}

/// Format a ratio as a percentage with two decimals, e.g. `0.999` -> `99.90%`
pub fn format_percentage(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
