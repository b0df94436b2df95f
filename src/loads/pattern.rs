//! Load patterns and the time series that scale them

use serde::{Deserialize, Serialize};

use super::NodalLoad;

/// Load factor as a function of pseudo-time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeSeries {
    /// λ(t) = factor · t
    Linear { factor: f64 },
}

impl TimeSeries {
    /// Linear series with unit factor
    pub fn linear() -> Self {
        TimeSeries::Linear { factor: 1.0 }
    }

    /// Load factor at pseudo-time `time`
    pub fn factor(&self, time: f64) -> f64 {
        match self {
            TimeSeries::Linear { factor } => factor * time,
        }
    }
}

/// A plain load pattern: nodal loads scaled by one time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadPattern {
    /// Tag of the time series scaling this pattern
    pub series: i32,
    /// (node id, load) in declaration order
    pub loads: Vec<(i64, NodalLoad)>,
}

impl LoadPattern {
    /// Create an empty plain pattern driven by `series`
    pub fn plain(series: i32) -> Self {
        Self {
            series,
            loads: Vec::new(),
        }
    }

    pub fn add_load(&mut self, node: i64, load: NodalLoad) {
        self.loads.push((node, load));
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }
}
