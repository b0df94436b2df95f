//! Geometric (coordinate) transformations for frame elements

use serde::{Deserialize, Serialize};

use crate::math::{self, Mat6};

/// Maps element end displacements between global and local axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeomTransf {
    /// Small-displacement rotation by the chord direction, no P-Delta terms
    Linear,
}

impl GeomTransf {
    /// Global-to-local transformation for an element between two points
    pub fn matrix(&self, i_node: &[f64; 2], j_node: &[f64; 2]) -> Mat6 {
        match self {
            GeomTransf::Linear => math::frame_transformation_matrix(i_node, j_node),
        }
    }
}
