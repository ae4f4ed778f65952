//! Goal discovery from a label/entity registry export.
//!
//! The registry file mirrors the label and entity registries of the home
//! automation hub:
//!
//! ```json
//! {
//!   "labels":   [{"label_id": "gym", "name": "goal_gym", "description": "{\"weekly_target\": 4}"}],
//!   "entities": [{"entity_id": "counter.gym_visits", "name": null, "original_name": "Gym", "labels": ["gym"]}]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use habitboard_core::{CounterRef, Goal, GoalConfig};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::label::{is_goal_label, parse_label_config};
use crate::trait_::{GoalDiscovery, Result};

/// One label registry entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEntry {
    /// Internal id entities refer to
    pub label_id: String,
    /// User-visible name
    #[serde(default)]
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
}

/// One entity registry entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityEntry {
    /// Entity id such as `counter.gym_visits`
    pub entity_id: String,
    /// User-assigned name
    #[serde(default)]
    pub name: Option<String>,
    /// Integration-assigned name
    #[serde(default)]
    pub original_name: Option<String>,
    /// Label ids attached to the entity
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Parsed registry export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    /// Label registry
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
    /// Entity registry
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
}

impl Registry {
    /// Valid goal configurations keyed by label id.
    pub fn goal_configs(&self) -> HashMap<String, GoalConfig> {
        let mut configs = HashMap::new();
        for label in self.labels.iter().filter(|l| is_goal_label(&l.name)) {
            let description = label.description.as_deref().unwrap_or_default();
            match parse_label_config(&label.name, description) {
                Ok(config) => {
                    configs.insert(label.label_id.clone(), config);
                }
                Err(e) => warn!("Skipping label {}: {}", label.name, e),
            }
        }
        configs
    }

    /// Goals for every entity carrying a valid goal label.
    ///
    /// Only the first goal label on an entity is used.
    pub fn goals(&self) -> Vec<Goal> {
        let configs = self.goal_configs();
        debug!("Parsed {} valid goal configurations", configs.len());

        self.entities
            .iter()
            .filter_map(|entity| {
                let config = entity.labels.iter().find_map(|id| configs.get(id))?;
                let goal = Goal::new(
                    CounterRef::new(entity.entity_id.as_str()),
                    display_name(entity),
                    config.clone(),
                );
                debug!("Discovered goal: {} ({})", goal.display_name, goal.counter);
                Some(goal)
            })
            .collect()
    }
}

/// Name shown for an entity: `name`, then `original_name`, then the
/// title-cased object id.
pub fn display_name(entity: &EntityEntry) -> String {
    if let Some(name) = entity.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = entity.original_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let counter = CounterRef::new(entity.entity_id.as_str());
    title_case(counter.object_id())
}

fn title_case(object_id: &str) -> String {
    object_id
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Discovers goals from a registry export on disk.
#[derive(Debug, Clone)]
pub struct RegistryFile {
    path: PathBuf,
}

impl RegistryFile {
    /// Use the registry export at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and parse the export.
    pub async fn load(&self) -> Result<Registry> {
        let json = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl GoalDiscovery for RegistryFile {
    async fn discover_goals(&self) -> Result<Vec<Goal>> {
        let registry = self.load().await?;
        let goals = registry.goals();
        info!("Discovered {} goals from {}", goals.len(), self.path.display());
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitboard_core::TargetBasis;

    const REGISTRY: &str = r#"{
        "labels": [
            {"label_id": "gym", "name": "goal_gym", "description": "{\"weekly_target\": 4, \"emoji\": \"G\"}"},
            {"label_id": "read", "name": "goal_read", "description": "{\"period_target\": 3}"},
            {"label_id": "broken", "name": "goal_broken", "description": "{oops"},
            {"label_id": "zero", "name": "goal_zero", "description": "{\"weekly_target\": 0}"},
            {"label_id": "kitchen", "name": "kitchen", "description": "{\"weekly_target\": 2}"}
        ],
        "entities": [
            {"entity_id": "counter.gym_visits", "name": null, "original_name": "Gym", "labels": ["gym"]},
            {"entity_id": "counter.books_read", "labels": ["kitchen", "read", "gym"]},
            {"entity_id": "counter.broken", "labels": ["broken"]},
            {"entity_id": "counter.zero", "labels": ["zero"]},
            {"entity_id": "light.kitchen", "name": "Kitchen", "labels": ["kitchen"]}
        ]
    }"#;

    fn entity(entity_id: &str, name: Option<&str>, original_name: Option<&str>) -> EntityEntry {
        EntityEntry {
            entity_id: entity_id.to_string(),
            name: name.map(str::to_string),
            original_name: original_name.map(str::to_string),
            labels: vec![],
        }
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name(&entity("counter.gym", Some("Gym"), Some("Orig"))), "Gym");
        assert_eq!(display_name(&entity("counter.gym", Some(""), Some("Orig"))), "Orig");
        assert_eq!(display_name(&entity("counter.gym_visits", None, None)), "Gym Visits");
        assert_eq!(display_name(&entity("counter.YOGA", None, None)), "Yoga");
        assert_eq!(display_name(&entity("plain", None, None)), "Plain");
    }

    #[test]
    fn test_registry_goals() {
        let registry: Registry = serde_json::from_str(REGISTRY).unwrap();
        let goals = registry.goals();
        assert_eq!(goals.len(), 2);

        assert_eq!(goals[0].counter.as_str(), "counter.gym_visits");
        assert_eq!(goals[0].display_name, "Gym");
        assert_eq!(goals[0].config.id, "goal_gym");
        assert_eq!(goals[0].label(), "G Gym");

        // First goal label wins; non-goal labels are ignored.
        assert_eq!(goals[1].display_name, "Books Read");
        assert_eq!(goals[1].config.id, "goal_read");
        assert_eq!(goals[1].config.basis, TargetBasis::PerPeriod);
    }

    #[tokio::test]
    async fn test_registry_file_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, REGISTRY).unwrap();

        let goals = RegistryFile::new(&path).discover_goals().await.unwrap();
        assert_eq!(goals.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_registry_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RegistryFile::new(dir.path().join("missing.json")).discover_goals().await;
        assert!(matches!(result, Err(crate::SourceError::Io(_))));
    }
}
