//! Error types for the status dashboard

use std::fmt;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub enum DashboardError {
    /// Reading a configuration file failed
    Io(std::io::Error),

    /// The health API could not be reached
    Http(reqwest::Error),

    /// A response or configuration body was not the expected JSON
    Json(serde_json::Error),

    /// Settings rejected by `Config::validate`
    Config(String),

    /// Health API answered with a non-success status
    BadStatus { endpoint: String, status: u16 },

    /// Health API did not answer in time
    Timeout(String),

    /// Anything else, used by test doubles
    Other(String),
}

impl DashboardError {
    /// Whether the failure happened before a response was received
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Http(_) | DashboardError::Timeout(_) | DashboardError::Io(_)
        )
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Io(err) => write!(f, "could not read configuration: {}", err),
            DashboardError::Http(err) => write!(f, "health API unreachable: {}", err),
            DashboardError::Json(err) => write!(f, "malformed JSON: {}", err),
            DashboardError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            DashboardError::BadStatus { endpoint, status } => {
                write!(f, "{} answered {}", endpoint, status)
            }
            DashboardError::Timeout(endpoint) => write!(f, "{} timed out", endpoint),
            DashboardError::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Io(err) => Some(err),
            DashboardError::Http(err) => Some(err),
            DashboardError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err)
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Json(err)
    }
}
