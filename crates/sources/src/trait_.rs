//! Collaborator traits for goal discovery and counter values.

use std::collections::HashMap;

use async_trait::async_trait;
use habitboard_core::{CounterRef, Goal};

/// Error type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while talking to a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Raw state of one counter as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawState {
    /// State string, `None` when the source has no value at all
    pub value: Option<String>,

    /// Display name reported alongside the state
    pub friendly_name: Option<String>,
}

impl RawState {
    /// A state with only a value.
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            friendly_name: None,
        }
    }
}

/// Produces the list of configured goals.
#[async_trait]
pub trait GoalDiscovery: Send + Sync {
    /// Discover every goal with a valid configuration.
    ///
    /// Invalid configurations are logged and skipped, never returned.
    async fn discover_goals(&self) -> Result<Vec<Goal>>;
}

/// Reads current counter values.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Fetch the raw state of each requested counter.
    ///
    /// Counters the source does not know are absent from the map.
    async fn fetch_counts(&self, counters: &[CounterRef]) -> Result<HashMap<CounterRef, RawState>>;
}
