//! Counter values from a local JSON file.
//!
//! The file is a flat object of entity id to value:
//! `{"counter.gym": 3, "counter.read": "1"}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use habitboard_core::CounterRef;
use serde_json::Value;
use tokio::fs;

use crate::trait_::{CounterSource, RawState, Result, SourceError};

/// Reads counter values from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct CountsFile {
    path: PathBuf,
}

impl CountsFile {
    /// Use the counts file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

fn raw_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl CounterSource for CountsFile {
    async fn fetch_counts(&self, counters: &[CounterRef]) -> Result<HashMap<CounterRef, RawState>> {
        let json = fs::read_to_string(&self.path).await?;
        let parsed: Value = serde_json::from_str(&json)?;
        let Value::Object(mut values) = parsed else {
            return Err(SourceError::Other(format!(
                "{} must contain a JSON object",
                self.path.display()
            )));
        };

        Ok(counters
            .iter()
            .filter_map(|counter| {
                let value = values.remove(counter.as_str())?;
                Some((
                    counter.clone(),
                    RawState {
                        value: raw_value(value),
                        friendly_name: None,
                    },
                ))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.json");
        std::fs::write(&path, r#"{"counter.gym": 3, "counter.read": "1", "counter.walk": null}"#).unwrap();

        let counters = vec![
            CounterRef::new("counter.gym"),
            CounterRef::new("counter.read"),
            CounterRef::new("counter.walk"),
            CounterRef::new("counter.missing"),
        ];
        let counts = CountsFile::new(&path).fetch_counts(&counters).await.unwrap();

        assert_eq!(counts[&CounterRef::new("counter.gym")], RawState::value("3"));
        assert_eq!(counts[&CounterRef::new("counter.read")], RawState::value("1"));
        assert_eq!(counts[&CounterRef::new("counter.walk")].value, None);
        assert!(!counts.contains_key(&CounterRef::new("counter.missing")));
    }

    #[tokio::test]
    async fn test_non_object_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let result = CountsFile::new(&path).fetch_counts(&[]).await;
        assert!(matches!(result, Err(SourceError::Other(_))));
    }
}
