//! Pure statistics over the reward series.
//!
//! Everything here is total over its documented domain: degenerate inputs
//! (empty series, too few points, zero variance) return the documented
//! sentinel instead of erroring, so the presentation layers never need to
//! guard these calls.

pub mod describe;
pub mod rolling;
pub mod trend;

pub use describe::*;
pub use rolling::*;
pub use trend::*;
