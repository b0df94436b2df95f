//! Nodal loads, time series and load patterns

mod nodal;
mod pattern;

pub use nodal::NodalLoad;
pub use pattern::{LoadPattern, TimeSeries};
