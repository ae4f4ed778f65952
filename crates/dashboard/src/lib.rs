//! Habitboard dashboard
//!
//! Application config, image persistence and the refresh orchestrator that
//! ties discovery, counter sources, the progress engine and the renderer
//! together.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod store;

pub use config::{AppConfig, OutputConfig, SourceConfig, SourceKind, DEFAULT_CONFIG_PATH};
pub use error::{DashboardError, Result};
pub use orchestrator::{Orchestrator, ProgressReport, RefreshOutcome};
pub use store::{ImageStore, RenderArtifact};
