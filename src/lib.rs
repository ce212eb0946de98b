//! `zyptopia` library crate.
//!
//! The binary (`zyp`) is a thin wrapper around this library so that:
//!
//! - the statistical core is testable without spawning processes
//! - modules are reusable (e.g., future web/daemon front-ends)
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod calc;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod plot;
pub mod report;
pub mod series;
pub mod stats;
pub mod tui;
