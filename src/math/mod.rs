//! Mathematical utilities for planar frame calculations

pub mod sparse;

use nalgebra::{DMatrix, DVector, SMatrix, SVector};

pub use sparse::{
    inverse_permutation, reverse_cuthill_mckee, PivotBreakdown, SkylineCholesky,
    SparseMatrixBuilder,
};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 6x6 matrix for 2D frame element stiffness / transformation
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for 2D frame element forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Length of the segment between two points
pub fn segment_length(i_node: &[f64; 2], j_node: &[f64; 2]) -> f64 {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    (dx * dx + dy * dy).sqrt()
}

/// Compute the transformation matrix for a 2D frame element
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y]
/// * `j_node` - End node coordinates [X, Y]
///
/// # Returns
/// 6x6 matrix taking global [UX, UY, RZ] pairs to local [u, v, θ] pairs.
/// The caller guarantees the nodes do not coincide.
pub fn frame_transformation_matrix(i_node: &[f64; 2], j_node: &[f64; 2]) -> Mat6 {
    let length = segment_length(i_node, j_node);
    let c = (j_node[0] - i_node[0]) / length;
    let s = (j_node[1] - i_node[1]) / length;

    let mut t = Mat6::zeros();
    for offset in [0, 3] {
        t[(offset, offset)] = c;
        t[(offset, offset + 1)] = s;
        t[(offset + 1, offset)] = -s;
        t[(offset + 1, offset + 1)] = c;
        t[(offset + 2, offset + 2)] = 1.0;
    }
    t
}

/// Compute the local stiffness matrix for a 2D Euler-Bernoulli frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `iz` - Moment of inertia about the local z-axis
/// * `length` - Element length
///
/// # Returns
/// 6x6 local stiffness matrix, DOF order [u_i, v_i, θ_i, u_j, v_j, θ_j]
pub fn frame_local_stiffness(e: f64, a: f64, iz: f64, length: f64) -> Mat6 {
    let l = length;
    let ea_l = e * a / l;
    let ei_l3 = e * iz / (l * l * l);
    let ei_l2 = e * iz / (l * l);
    let ei_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,   0.0,           0.0,          -ea_l,  0.0,           0.0,
        0.0,    12.0*ei_l3,    6.0*ei_l2,    0.0,    -12.0*ei_l3,   6.0*ei_l2,
        0.0,    6.0*ei_l2,     4.0*ei_l,     0.0,    -6.0*ei_l2,    2.0*ei_l,
        -ea_l,  0.0,           0.0,          ea_l,   0.0,           0.0,
        0.0,    -12.0*ei_l3,   -6.0*ei_l2,   0.0,    12.0*ei_l3,    -6.0*ei_l2,
        0.0,    6.0*ei_l2,     2.0*ei_l,     0.0,    -6.0*ei_l2,    4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = frame_transformation_matrix(&[0.0, 0.0], &[10.0, 0.0]);
        assert_relative_eq!(t, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let t = frame_transformation_matrix(&[0.0, 0.0], &[0.0, 4.0]);

        // local x = global Y, local y = -global X
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(3, 4)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_is_orthogonal() {
        let t = frame_transformation_matrix(&[1.0, 2.0], &[4.0, 6.0]);
        assert_relative_eq!(t.transpose() * t, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = frame_local_stiffness(200e9, 0.01, 1e-4, 5.0);
        assert_relative_eq!(k, k.transpose(), epsilon = 1e-6);
    }

    #[test]
    fn test_local_stiffness_rigid_body_translation() {
        // A rigid translation produces no end forces
        let k = frame_local_stiffness(200e9, 0.01, 1e-4, 5.0);
        let d = Vec6::from_column_slice(&[1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        assert_relative_eq!((k * d).norm(), 0.0, epsilon = 1e-3);
    }
}
