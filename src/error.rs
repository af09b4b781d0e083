// Service error types
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dashboard '{0}' not found")]
    UnknownDashboard(String),

    #[error("widget template '{0}' not found")]
    UnknownTemplate(String),

    #[error("layout storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("layout backend request failed: {0}")]
    Backend(#[from] reqwest::Error),

    #[error("invalid layout data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}
