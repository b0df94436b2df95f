//! Nodal loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

/// A load applied directly to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
    /// Moment about Z axis
    pub mz: f64,
}

impl NodalLoad {
    /// Create a new nodal load with all components
    pub fn new(fx: f64, fy: f64, mz: f64) -> Self {
        Self { fx, fy, mz }
    }

    /// Create from [FX, FY, MZ]
    pub fn from_array(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }

    /// Create a load in X direction
    pub fn fx(value: f64) -> Self {
        Self::new(value, 0.0, 0.0)
    }

    /// Create a load in Y direction
    pub fn fy(value: f64) -> Self {
        Self::new(0.0, value, 0.0)
    }

    /// Create a moment about Z
    pub fn mz(value: f64) -> Self {
        Self::new(0.0, 0.0, value)
    }

    /// Get the load as an array [FX, FY, MZ]
    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.mz]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.fx * factor, self.fy * factor, self.mz * factor)
    }
}

impl Default for NodalLoad {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}
