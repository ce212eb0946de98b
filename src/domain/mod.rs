//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the observation model (`RawRecord`, `Observation`)
//! - selection enums (`WindowToken`, `Scenario`, `CompareBase`)
//! - computed outputs (`Projection`, `BestWindow`, `Forecast`, `RoiSummary`)

pub mod types;

pub use types::*;
