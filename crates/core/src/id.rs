//! Identifiers for counters exposed by the data source.

use serde::{Deserialize, Serialize};

/// Reference to a remote counter entity (e.g. `counter.gym_visits`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CounterRef(String);

impl CounterRef {
    /// Create a counter reference.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self(entity_id.into())
    }

    /// The raw entity id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the domain prefix, or the whole id when there is none.
    pub fn object_id(&self) -> &str {
        self.0
            .split_once('.')
            .map(|(_, object)| object)
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for CounterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for CounterRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for CounterRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        assert_eq!(CounterRef::new("counter.gym_visits").object_id(), "gym_visits");
        assert_eq!(CounterRef::new("gym").object_id(), "gym");
    }
}
