//! Core error types.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building core values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A goal configuration violates its invariants
    #[error("invalid config for {goal}: {reason}")]
    InvalidConfig {
        /// Goal identifier
        goal: String,
        /// What was wrong
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn invalid_config(goal: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            goal: goal.to_string(),
            reason: reason.into(),
        }
    }
}
