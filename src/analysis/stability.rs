//! Linear buckling analysis

use log::{debug, warn};

use super::assembly::{apply_penalty, assemble, constrained_dofs};
use super::BucklingOptions;
use crate::elements::{BeamElement, Node, Support};
use crate::error::{FEAError, FEAResult};
use crate::math::eigen::{random_unit_vector, start_rng};
use crate::math::{rotation_matrix, to_global, GeneralizedEigenSolver, InverseIterationSettings, Normalization};
use crate::results::BucklingResult;

/// Critical load factor of an assembly of beam elements
///
/// Solves `K φ = λ Kg φ` where `K` is the elastic stiffness and `Kg` the
/// geometric stiffness of the reference axial forces. Constrained DOFs use
/// the penalty method on `K` and are removed from `Kg`.
pub struct StabilityAnalysis<'a> {
    elements: &'a [BeamElement],
    nodes: &'a [Node],
    supports: &'a [Support],
}

impl<'a> StabilityAnalysis<'a> {
    pub fn new(elements: &'a [BeamElement], nodes: &'a [Node], supports: &'a [Support]) -> Self {
        Self {
            elements,
            nodes,
            supports,
        }
    }

    /// Buckling under a unit compressive force in every element
    pub fn linear_buckling(&self, options: &BucklingOptions) -> FEAResult<BucklingResult> {
        let reference = vec![-1.0; self.elements.len()];
        self.linear_buckling_with_axial_forces(&reference, options)
    }

    /// Buckling under reference axial forces, one per element (tension positive)
    ///
    /// The returned factor multiplies `axial_forces`.
    pub fn linear_buckling_with_axial_forces(
        &self,
        axial_forces: &[f64],
        options: &BucklingOptions,
    ) -> FEAResult<BucklingResult> {
        if axial_forces.len() != self.elements.len() {
            return Err(FEAError::InvalidInput(format!(
                "expected {} reference axial forces, got {}",
                self.elements.len(),
                axial_forces.len()
            )));
        }

        let constrained = constrained_dofs(self.supports, self.nodes.len())?;
        let nodes = self.nodes;

        let mut k = assemble(self.elements, nodes, |_, e| e.global_stiffness(nodes, false))?;
        let mut kg = assemble(self.elements, nodes, |index, e| {
            let g = e.geometry(nodes)?;
            let t = rotation_matrix(g.cos_theta, g.sin_theta);
            // Compression destabilises, so the operator is -Kg(N)
            Ok(to_global(&t, &e.geometric_stiffness(-axial_forces[index], g.length)))
        })?;

        apply_penalty(&mut k, &constrained, options.penalty);
        apply_penalty(&mut kg, &constrained, 0.0);
        debug!(
            "linear buckling: {} dofs, {} constrained, {} elements",
            k.rows(),
            constrained.len(),
            self.elements.len()
        );

        let solver = GeneralizedEigenSolver::new(&k, &kg);
        let mut rng = start_rng(options.seed);
        let settings = InverseIterationSettings {
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
            normalization: Normalization::Euclidean,
        };
        let result = solver.solve(random_unit_vector(&mut rng, solver.size()), &settings, &[]);

        if result.converged {
            debug!(
                "critical load factor {:.6e} after {} iterations",
                result.eigenvalue, result.iterations
            );
        } else {
            warn!(
                "buckling iteration did not converge in {} iterations (last estimate {:.6e})",
                result.iterations, result.eigenvalue
            );
        }

        Ok(BucklingResult {
            critical_load_factor: result.eigenvalue,
            mode_shape: result.eigenvector,
            converged: result.converged,
            iterations: result.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section, SectionParams, DOF_UX, DOF_UY};
    use approx::assert_relative_eq;

    fn section() -> Section {
        Section::new(SectionParams::hollow_rect(0.06, 0.03, 0.003, 0.003)).unwrap()
    }

    fn euler(ei: f64, effective_length: f64) -> f64 {
        std::f64::consts::PI.powi(2) * ei / effective_length.powi(2)
    }

    #[test]
    fn test_single_element_cantilever() {
        let length = 2.0;
        let nodes = vec![Node::new(0.0, 0.0), Node::new(length, 0.0)];
        let elements = vec![BeamElement::new(0, 1, Material::aluminum(), section())];
        let supports = Support::fixed(0);

        let result = StabilityAnalysis::new(&elements, &nodes, &supports)
            .linear_buckling(&BucklingOptions::default().with_seed(1))
            .unwrap();

        let ei = Material::aluminum().e * section().inertia();
        assert!(result.converged);
        assert_relative_eq!(
            result.critical_load_factor,
            euler(ei, 2.0 * length),
            max_relative = 0.03
        );
        // Constrained DOFs stay out of the mode
        assert!(result.mode_shape[..3].iter().all(|x| x.abs() < 1e-9));
    }

    #[test]
    fn test_pinned_column_refined() {
        let length = 3.0;
        let n = 4;
        let nodes: Vec<Node> = (0..=n)
            .map(|k| Node::new(0.0, length * k as f64 / n as f64))
            .collect();
        let elements: Vec<BeamElement> = (0..n)
            .map(|k| BeamElement::new(k, k + 1, Material::aluminum(), section()))
            .collect();
        let mut supports = Support::pinned(0);
        supports.push(Support::new(n, DOF_UX));

        let result = StabilityAnalysis::new(&elements, &nodes, &supports)
            .linear_buckling(&BucklingOptions::default().with_seed(5))
            .unwrap();

        let ei = Material::aluminum().e * section().inertia();
        assert!(result.converged);
        assert_relative_eq!(result.critical_load_factor, euler(ei, length), max_relative = 0.05);
        // Supported ends of the vertical column carry no lateral displacement
        assert!(result.mode_shape[3 * n].abs() < 1e-9);
        assert!(result.mode_shape[DOF_UY].abs() < 1e-9);
    }

    #[test]
    fn test_reference_forces_scale_factor() {
        let nodes = vec![Node::new(0.0, 0.0), Node::new(2.0, 0.0)];
        let elements = vec![BeamElement::new(0, 1, Material::aluminum(), section())];
        let supports = Support::fixed(0);
        let analysis = StabilityAnalysis::new(&elements, &nodes, &supports);
        let options = BucklingOptions::default().with_seed(2);

        let unit = analysis.linear_buckling(&options).unwrap();
        let scaled = analysis
            .linear_buckling_with_axial_forces(&[-100.0], &options)
            .unwrap();
        assert_relative_eq!(
            scaled.critical_load_factor * 100.0,
            unit.critical_load_factor,
            max_relative = 1e-6
        );

        assert!(matches!(
            analysis.linear_buckling_with_axial_forces(&[], &options),
            Err(FEAError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_support_is_error() {
        let nodes = vec![Node::new(0.0, 0.0), Node::new(2.0, 0.0)];
        let elements = vec![BeamElement::new(0, 1, Material::aluminum(), section())];
        let supports = vec![Support::new(0, 5)];
        let result = StabilityAnalysis::new(&elements, &nodes, &supports)
            .linear_buckling(&BucklingOptions::default());
        assert!(matches!(
            result,
            Err(FEAError::InvalidBoundaryCondition { node: 0, dof: 5 })
        ));
    }
}
