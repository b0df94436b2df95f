//! Elastic beam-column element - 2D frame member

use serde::{Deserialize, Serialize};

use crate::math::{self, Mat6, Vec6};

/// A linear elastic beam-column between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticBeamColumn {
    /// Id of the i-node (start)
    pub i_node: i64,
    /// Id of the j-node (end)
    pub j_node: i64,
    /// Cross-sectional area
    pub a: f64,
    /// Modulus of elasticity
    pub e: f64,
    /// Moment of inertia about the local z-axis
    pub iz: f64,
    /// Tag of the geometric transformation
    pub transf: i32,

    /// Calculated length
    #[serde(skip)]
    pub(crate) length: Option<f64>,

    /// Local end forces [N_i, V_i, M_i, N_j, V_j, M_j] of the last analysis
    #[serde(skip)]
    pub(crate) local_forces: Option<[f64; 6]>,
}

impl ElasticBeamColumn {
    /// Create a new element
    pub fn new(nodes: [i64; 2], a: f64, e: f64, iz: f64, transf: i32) -> Self {
        Self {
            i_node: nodes[0],
            j_node: nodes[1],
            a,
            e,
            iz,
            transf,
            length: None,
            local_forces: None,
        }
    }

    /// Get the element length (set when the element joins a model)
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Axial rigidity EA
    pub fn axial_rigidity(&self) -> f64 {
        self.e * self.a
    }

    /// Flexural rigidity EI
    pub fn flexural_rigidity(&self) -> f64 {
        self.e * self.iz
    }

    /// Local stiffness for a given length
    pub(crate) fn local_stiffness(&self, length: f64) -> Mat6 {
        math::frame_local_stiffness(self.e, self.a, self.iz, length)
    }

    /// End forces in local axes from global end displacements
    pub(crate) fn local_end_forces(&self, length: f64, t: &Mat6, d_global: &Vec6) -> Vec6 {
        self.local_stiffness(length) * (t * d_global)
    }

    /// Get local end forces of the last analysis
    /// Returns [N_i, V_i, M_i, N_j, V_j, M_j]
    pub fn local_force(&self) -> Option<[f64; 6]> {
        self.local_forces
    }

    /// Axial force, positive in tension
    pub fn axial(&self) -> Option<f64> {
        self.local_forces.map(|f| f[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_element_creation() {
        let element = ElasticBeamColumn::new([1, 2], 0.01, 200e9, 1e-4, 1);
        assert_eq!(element.i_node, 1);
        assert_eq!(element.j_node, 2);
        assert!(element.length().is_none());
        assert_relative_eq!(element.axial_rigidity(), 2e9);
        assert_relative_eq!(element.flexural_rigidity(), 2e7);
    }

    #[test]
    fn test_end_forces_from_axial_stretch() {
        let element = ElasticBeamColumn::new([1, 2], 0.01, 200e9, 1e-4, 1);
        let t = Mat6::identity();
        let d = Vec6::from_column_slice(&[0.0, 0.0, 0.0, 1e-3, 0.0, 0.0]);

        let f = element.local_end_forces(2.0, &t, &d);
        // EA/L * du = 2e9 / 2 * 1e-3
        assert_relative_eq!(f[3], 1e6, epsilon = 1e-6);
        assert_relative_eq!(f[0], -1e6, epsilon = 1e-6);
    }
}
