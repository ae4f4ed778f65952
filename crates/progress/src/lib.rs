//! Progress engine
//!
//! Period boundaries, the expected-by-now curve and status classification.
//! Everything here is a pure function of its inputs.

#![warn(missing_docs)]

pub mod curve;
pub mod engine;
pub mod period;
pub mod status;

pub use engine::{EngineConfig, ProgressEngine};
pub use period::PeriodPolicy;
pub use status::{ClassificationPolicy, TOLERANCE};
