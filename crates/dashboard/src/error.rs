//! Dashboard error types.

use habitboard_render::RenderError;
use habitboard_sources::SourceError;

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur while configuring or refreshing the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A setting required by the selected source is missing
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    /// A setting has a value that cannot be used
    #[error("Invalid setting {0}: {1}")]
    InvalidSetting(&'static str, &'static str),

    /// Goal discovery or counter fetch failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Goal discovery and counter fetch did not finish in time
    #[error("Fetching counts timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Image encoding failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
