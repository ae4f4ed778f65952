//! Goal discovery and counter sources.
//!
//! Trait-based interfaces for the two external collaborators of a refresh,
//! with a registry-file discovery, a Home Assistant REST counter source and a
//! static counts file source.

#![warn(missing_docs)]

pub mod count;
pub mod file;
pub mod home_assistant;
pub mod label;
pub mod registry;
pub mod trait_;

pub use count::parse_count;
pub use file::CountsFile;
pub use home_assistant::HomeAssistantSource;
pub use label::{is_goal_label, parse_label_config, LabelError, GOAL_LABEL_PREFIX};
pub use registry::{display_name, Registry, RegistryFile};
pub use trait_::{CounterSource, GoalDiscovery, RawState, Result, SourceError};
