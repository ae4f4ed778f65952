//! Habitboard core data models.
//!
//! This crate defines the goal, period and progress types shared by the
//! progress engine, the renderer and the refresh orchestrator.

#![warn(missing_docs)]

mod error;
mod goal;
mod id;
mod period;
mod progress;

pub use error::{CoreError, Result};
pub use goal::{Goal, GoalConfig, TargetBasis, DAYS_PER_WEEK};
pub use id::CounterRef;
pub use period::Period;
pub use progress::{fill_fraction, GoalStatus, ProgressSnapshot};
