//! Undamped modal analysis

use log::{debug, warn};

use super::assembly::{apply_penalty, assemble, constrained_dofs};
use super::ModalOptions;
use crate::elements::{BeamElement, Node, Support, DOFS_PER_NODE, DOF_UY};
use crate::error::FEAResult;
use crate::math::eigen::{dot, random_unit_vector, start_rng};
use crate::math::{GeneralizedEigenSolver, InverseIterationSettings, Matrix, Normalization};
use crate::results::{ModalResult, Mode};

/// Natural frequencies and mode shapes of an assembly of beam elements
///
/// Solves `K φ = ω² M φ` with the consistent mass matrix. Constrained DOFs
/// get a penalty diagonal on `K` and a vanishing diagonal on `M`, which
/// pushes their eigenvalues far beyond any structural mode.
pub struct DynamicAnalysis<'a> {
    elements: &'a [BeamElement],
    nodes: &'a [Node],
    supports: &'a [Support],
}

impl<'a> DynamicAnalysis<'a> {
    pub fn new(elements: &'a [BeamElement], nodes: &'a [Node], supports: &'a [Support]) -> Self {
        Self {
            elements,
            nodes,
            supports,
        }
    }

    /// Extract the lowest modes, at most one per free DOF
    pub fn modal_analysis(&self, options: &ModalOptions) -> FEAResult<ModalResult> {
        let constrained = constrained_dofs(self.supports, self.nodes.len())?;
        let nodes = self.nodes;

        let mut k = assemble(self.elements, nodes, |_, e| e.global_stiffness(nodes, false))?;
        let mut m = assemble(self.elements, nodes, |_, e| e.mass_matrix(nodes))?;
        apply_penalty(&mut k, &constrained, options.penalty);
        apply_penalty(&mut m, &constrained, options.mass_penalty);

        let free = k.rows() - constrained.len();
        let num_modes = options.num_modes.min(free);
        debug!(
            "modal analysis: {} dofs, {} free, extracting {} modes",
            k.rows(),
            free,
            num_modes
        );

        let influence = transverse_influence(k.rows(), &constrained);
        let m_influence = m.multiply_vector(&influence);
        let total_mass = dot(&influence, &m_influence);

        let solver = GeneralizedEigenSolver::new(&k, &m);
        let mut rng = start_rng(options.seed);
        let settings = InverseIterationSettings {
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
            normalization: Normalization::BNorm,
        };

        let mut locked: Vec<Vec<f64>> = Vec::with_capacity(num_modes);
        let mut modes = Vec::with_capacity(num_modes);
        for number in 1..=num_modes {
            let start = random_unit_vector(&mut rng, solver.size());
            let result = solver.solve(start, &settings, &locked);

            let mut mode = Mode::from_eigenvalue(number, result.eigenvalue);
            mode.effective_mass = effective_mass(&m, &m_influence, &result.eigenvector);
            mode.converged = result.converged;
            mode.iterations = result.iterations;

            if result.converged {
                debug!(
                    "mode {}: f = {:.4} Hz after {} iterations",
                    number, mode.frequency, result.iterations
                );
            } else {
                warn!(
                    "mode {} did not converge in {} iterations (last estimate {:.4} Hz)",
                    number, result.iterations, mode.frequency
                );
            }

            locked.push(result.eigenvector.clone());
            mode.mode_shape = result.eigenvector;
            modes.push(mode);
        }

        Ok(ModalResult { modes, total_mass })
    }
}

/// Unit Y translation on every unconstrained UY DOF
fn transverse_influence(n: usize, constrained: &[usize]) -> Vec<f64> {
    (0..n)
        .map(|dof| {
            let is_uy = dof % DOFS_PER_NODE == DOF_UY;
            if is_uy && constrained.binary_search(&dof).is_err() {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Γ² φᵀMφ with Γ = φᵀ M r / φᵀ M φ
fn effective_mass(m: &Matrix, m_influence: &[f64], phi: &[f64]) -> f64 {
    let generalized = dot(phi, &m.multiply_vector(phi));
    if generalized <= 0.0 {
        return 0.0;
    }
    let participation = dot(phi, m_influence);
    participation * participation / generalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section, SectionParams};
    use approx::assert_relative_eq;

    fn section() -> Section {
        Section::new(SectionParams::hollow_rect(0.06, 0.03, 0.003, 0.003)).unwrap()
    }

    /// Cantilever of `n` Euler-Bernoulli elements along X
    fn cantilever(length: f64, n: usize) -> (Vec<Node>, Vec<BeamElement>, Vec<Support>) {
        let nodes = (0..=n)
            .map(|k| Node::new(length * k as f64 / n as f64, 0.0))
            .collect();
        let elements = (0..n)
            .map(|k| {
                BeamElement::new(k, k + 1, Material::aluminum(), section())
                    .without_shear_deformation()
            })
            .collect();
        (nodes, elements, Support::fixed(0))
    }

    fn cantilever_frequency(beta_l: f64, length: f64) -> f64 {
        let mat = Material::aluminum();
        let s = section();
        beta_l.powi(2) / (2.0 * std::f64::consts::PI)
            * (mat.e * s.inertia() / (mat.rho * s.area() * length.powi(4))).sqrt()
    }

    #[test]
    fn test_single_element_cantilever() {
        let (nodes, elements, supports) = cantilever(1.0, 1);
        let result = DynamicAnalysis::new(&elements, &nodes, &supports)
            .modal_analysis(&ModalOptions::modes(1).with_seed(3))
            .unwrap();

        assert_eq!(result.modes.len(), 1);
        let mode = &result.modes[0];
        assert!(mode.converged);
        assert_relative_eq!(
            mode.frequency,
            cantilever_frequency(1.875, 1.0),
            max_relative = 0.02
        );
        assert_relative_eq!(mode.period, 1.0 / mode.frequency);
        assert!(mode.effective_mass > 0.0);
    }

    #[test]
    fn test_refined_cantilever_modes() {
        let (nodes, elements, supports) = cantilever(1.0, 10);
        let result = DynamicAnalysis::new(&elements, &nodes, &supports)
            .modal_analysis(&ModalOptions::modes(3).with_seed(11))
            .unwrap();

        assert!(result.all_converged());
        let f = result.frequencies();
        assert_relative_eq!(f[0], cantilever_frequency(1.8751, 1.0), max_relative = 0.01);
        assert_relative_eq!(f[1], cantilever_frequency(4.6941, 1.0), max_relative = 0.02);
        assert!(f[0] < f[1] && f[1] < f[2]);

        // Modes are mass-orthonormal
        let m = assemble(&elements, &nodes, |_, e| e.mass_matrix(&nodes)).unwrap();
        let phi0 = &result.modes[0].mode_shape;
        let phi1 = &result.modes[1].mode_shape;
        assert!(dot(phi0, &m.multiply_vector(phi1)).abs() < 1e-6);

        // First bending mode carries most of the transverse mass
        assert!(result.modes[0].effective_mass > 0.5 * result.total_mass);
        assert!(result.mass_participation() <= 1.0 + 1e-9);
    }

    #[test]
    fn test_mode_count_capped_by_free_dofs() {
        let (nodes, elements, supports) = cantilever(1.0, 1);
        let result = DynamicAnalysis::new(&elements, &nodes, &supports)
            .modal_analysis(&ModalOptions::modes(10).with_seed(4))
            .unwrap();
        assert_eq!(result.modes.len(), 3);
        assert_eq!(result.modes[2].number, 3);
    }

    #[test]
    fn test_influence_skips_constrained() {
        let r = transverse_influence(6, &[0, 1, 2]);
        assert_eq!(r, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
