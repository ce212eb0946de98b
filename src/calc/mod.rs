//! Holder-facing calculators: projections, goal-seeking, ROI/APY.

pub mod goal;
pub mod projection;
pub mod roi;

pub use goal::*;
pub use projection::*;
pub use roi::*;
