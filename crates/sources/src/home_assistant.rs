//! Counter values from the Home Assistant REST API.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use habitboard_core::CounterRef;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::trait_::{CounterSource, RawState, Result, SourceError};

/// One entry of `GET /api/states`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityState {
    /// Entity id
    pub entity_id: String,
    /// State string
    #[serde(default)]
    pub state: Option<String>,
    /// State attributes
    #[serde(default)]
    pub attributes: StateAttributes,
}

/// The attributes used from a state entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateAttributes {
    /// Display name
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// Keep the states for the requested counters.
pub fn select_states(states: Vec<EntityState>, counters: &[CounterRef]) -> HashMap<CounterRef, RawState> {
    let wanted: HashSet<&str> = counters.iter().map(CounterRef::as_str).collect();
    states
        .into_iter()
        .filter(|s| wanted.contains(s.entity_id.as_str()))
        .map(|s| {
            (
                CounterRef::new(s.entity_id),
                RawState {
                    value: s.state,
                    friendly_name: s.attributes.friendly_name,
                },
            )
        })
        .collect()
}

/// Home Assistant REST client.
#[derive(Clone)]
pub struct HomeAssistantSource {
    client: Client,
    url: String,
    token: String,
}

impl HomeAssistantSource {
    /// Create a client for the instance at `url` using a long-lived token.
    pub fn new(url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        let url: String = url.into();
        Self {
            client: ClientBuilder::new()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            url: url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every entity state.
    pub async fn states(&self) -> Result<Vec<EntityState>> {
        let response = self
            .client
            .get(format!("{}/api/states", self.url))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let states: Vec<EntityState> = response.json().await?;
        debug!("Fetched {} entity states", states.len());
        Ok(states)
    }
}

impl std::fmt::Debug for HomeAssistantSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeAssistantSource")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CounterSource for HomeAssistantSource {
    async fn fetch_counts(&self, counters: &[CounterRef]) -> Result<HashMap<CounterRef, RawState>> {
        let states = self.states().await?;
        Ok(select_states(states, counters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_states() {
        let states: Vec<EntityState> = serde_json::from_str(
            r#"[
                {"entity_id": "counter.gym", "state": "3", "attributes": {"friendly_name": "Gym"}},
                {"entity_id": "counter.read", "state": "unavailable", "attributes": {}},
                {"entity_id": "light.kitchen", "state": "on", "attributes": {"friendly_name": "Kitchen"}}
            ]"#,
        )
        .unwrap();
        let counters = vec![
            CounterRef::new("counter.gym"),
            CounterRef::new("counter.read"),
            CounterRef::new("counter.missing"),
        ];

        let counts = select_states(states, &counters);
        assert_eq!(counts.len(), 2);
        assert_eq!(
            counts[&CounterRef::new("counter.gym")],
            RawState {
                value: Some("3".to_string()),
                friendly_name: Some("Gym".to_string()),
            }
        );
        assert_eq!(counts[&CounterRef::new("counter.read")].friendly_name, None);
        assert!(!counts.contains_key(&CounterRef::new("counter.missing")));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let source = HomeAssistantSource::new("http://hub.local:8123/", "token", Duration::from_secs(5));
        assert_eq!(source.url(), "http://hub.local:8123");
        assert!(!format!("{:?}", source).contains("token"));
    }
}
