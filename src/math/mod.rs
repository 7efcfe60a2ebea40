//! Linear algebra kernel
//!
//! Global matrices use the dense [`Matrix`] type with its own tolerant
//! Cholesky factorisation; element-level work uses fixed-size nalgebra
//! matrices.

pub mod dense;
pub mod eigen;

use nalgebra::{SMatrix, SVector};

pub use dense::{solve_with_factor, Matrix, MIN_PIVOT};
pub use eigen::{
    EigenResult, GeneralizedEigenSolver, InverseIterationSettings, Normalization,
};

/// 6x6 matrix for 2D beam element stiffness/mass (3 DOF per node)
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for 2D beam end forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Transformation matrix for a 2D frame element
///
/// Rows map global `[u, v, θ]` at each node to the local frame whose x-axis
/// points along the chord with direction cosines `(cos_theta, sin_theta)`.
pub fn rotation_matrix(cos_theta: f64, sin_theta: f64) -> Mat6 {
    let c = cos_theta;
    let s = sin_theta;

    #[rustfmt::skip]
    let data = [
        c,   s,   0.0, 0.0, 0.0, 0.0,
        -s,  c,   0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, c,   s,   0.0,
        0.0, 0.0, 0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Rotate a local element matrix to global: Tᵀ * K * T
pub fn to_global(t: &Mat6, k_local: &Mat6) -> Mat6 {
    t.transpose() * k_local * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_is_orthogonal() {
        let angle: f64 = 0.7;
        let t = rotation_matrix(angle.cos(), angle.sin());
        let identity = t * t.transpose();
        for i in 0..6 {
            for j in 0..6 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(identity[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_vertical_member_rotation() {
        // Local x along global Y
        let t = rotation_matrix(0.0, 1.0);
        let local = t * Vec6::new(0.0, 2.0, 0.1, 0.0, 0.0, 0.0);
        assert_relative_eq!(local[0], 2.0);
        assert_relative_eq!(local[1], 0.0);
        assert_relative_eq!(local[2], 0.1);
    }
}
