//! Global assembly and penalty boundary conditions
//!
//! DOFs are numbered sequentially by node order, three per node
//! (ux, uy, rz).

use crate::elements::{BeamElement, Node, Support, DOFS_PER_NODE};
use crate::error::{FEAError, FEAResult};
use crate::math::{Mat6, Matrix};

/// Total number of global DOFs for `node_count` nodes
pub fn dof_count(node_count: usize) -> usize {
    node_count * DOFS_PER_NODE
}

/// Scatter-add one 6x6 element matrix into the global matrix
pub fn scatter(global: &mut Matrix, dofs: &[usize; 6], local: &Mat6) {
    for (a, &row) in dofs.iter().enumerate() {
        for (b, &col) in dofs.iter().enumerate() {
            global.add_to(row, col, local[(a, b)]);
        }
    }
}

/// Assemble a global matrix from per-element contributions
///
/// `element_matrix` receives the element's position in `elements` and
/// returns its 6x6 matrix in global coordinates.
pub fn assemble<F>(
    elements: &[BeamElement],
    nodes: &[Node],
    mut element_matrix: F,
) -> FEAResult<Matrix>
where
    F: FnMut(usize, &BeamElement) -> FEAResult<Mat6>,
{
    let n = dof_count(nodes.len());
    let mut global = Matrix::zeros(n, n);
    for (index, element) in elements.iter().enumerate() {
        let dofs = element.dofs();
        if let Some(&dof) = dofs.iter().find(|&&d| d >= n) {
            return Err(FEAError::NodeNotFound {
                index: dof / DOFS_PER_NODE,
                count: nodes.len(),
            });
        }
        scatter(&mut global, &dofs, &element_matrix(index, element)?);
    }
    Ok(global)
}

/// Validated, sorted and de-duplicated global DOFs of the supports
pub fn constrained_dofs(supports: &[Support], node_count: usize) -> FEAResult<Vec<usize>> {
    let mut dofs = supports
        .iter()
        .map(|s| s.validate(node_count).map(|_| s.global_dof()))
        .collect::<FEAResult<Vec<_>>>()?;
    dofs.sort_unstable();
    dofs.dedup();
    Ok(dofs)
}

/// Zero the row and column of every constrained DOF and set its diagonal
///
/// With a large `diagonal` this is the penalty method; with zero the DOF
/// is removed from the operator altogether.
pub fn apply_penalty(matrix: &mut Matrix, constrained: &[usize], diagonal: f64) {
    let n = matrix.rows();
    for &dof in constrained {
        for k in 0..n {
            matrix.set(dof, k, 0.0);
            matrix.set(k, dof, 0.0);
        }
        matrix.set(dof, dof, diagonal);
    }
}
