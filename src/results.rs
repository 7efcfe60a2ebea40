//! Result types for beam and eigen-analyses

use serde::{Deserialize, Serialize};

use crate::math::Vec6;

/// Resultants of a beam element in its corotational frame
///
/// `m1` and `m2` are counter-clockwise end moments acting on the element
/// nodes, `n` is positive in tension and `v = (m1 + m2) / L`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamForces {
    /// Axial force
    pub n: f64,
    /// Shear force
    pub v: f64,
    /// End moment at node i
    pub m1: f64,
    /// End moment at node j
    pub m2: f64,
}

impl BeamForces {
    /// Local end force vector `[Fx_i, Fy_i, Mz_i, Fx_j, Fy_j, Mz_j]`
    pub fn local_vector(&self) -> Vec6 {
        Vec6::new(-self.n, self.v, self.m1, self.n, -self.v, self.m2)
    }

    /// Largest end moment magnitude
    pub fn max_moment(&self) -> f64 {
        self.m1.abs().max(self.m2.abs())
    }
}

/// Outcome of a linear buckling analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucklingResult {
    /// Multiplier of the reference axial forces at which the structure buckles
    pub critical_load_factor: f64,
    /// Buckling mode over all global DOFs, unit Euclidean length
    pub mode_shape: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
}

/// One natural mode of vibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    /// 1-based mode number
    pub number: usize,
    /// Eigenvalue ω² in rad²/s²
    pub eigenvalue: f64,
    /// Circular frequency in rad/s
    pub omega: f64,
    /// Natural frequency in Hz
    pub frequency: f64,
    /// Period in s, infinite for a zero frequency
    pub period: f64,
    /// Mass-normalised mode shape over all global DOFs
    pub mode_shape: Vec<f64>,
    /// Modal effective mass for transverse (Y) excitation in kg
    pub effective_mass: f64,
    pub converged: bool,
    pub iterations: usize,
}

impl Mode {
    pub(crate) fn from_eigenvalue(number: usize, eigenvalue: f64) -> Self {
        let omega = eigenvalue.max(0.0).sqrt();
        let frequency = omega / (2.0 * std::f64::consts::PI);
        Self {
            number,
            eigenvalue,
            omega,
            frequency,
            period: if frequency > 0.0 { 1.0 / frequency } else { f64::INFINITY },
            mode_shape: Vec::new(),
            effective_mass: 0.0,
            converged: false,
            iterations: 0,
        }
    }
}

/// Outcome of a modal analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    pub modes: Vec<Mode>,
    /// Mass participating in transverse (Y) motion of the free DOFs in kg
    pub total_mass: f64,
}

impl ModalResult {
    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.frequency).collect()
    }

    /// First natural frequency in Hz
    pub fn fundamental_frequency(&self) -> Option<f64> {
        self.modes.first().map(|m| m.frequency)
    }

    pub fn all_converged(&self) -> bool {
        self.modes.iter().all(|m| m.converged)
    }

    /// Share of the transverse mass captured by the extracted modes
    pub fn mass_participation(&self) -> f64 {
        if self.total_mass > 0.0 {
            self.modes.iter().map(|m| m.effective_mass).sum::<f64>() / self.total_mass
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_vector_layout() {
        let f = BeamForces {
            n: 10.0,
            v: 3.0,
            m1: 4.0,
            m2: 2.0,
        };
        let v = f.local_vector();
        assert_eq!(v.as_slice(), &[-10.0, 3.0, 4.0, 10.0, -3.0, 2.0]);
        assert_eq!(f.max_moment(), 4.0);
    }

    #[test]
    fn test_mode_from_eigenvalue() {
        let omega = 2.0 * std::f64::consts::PI * 5.0;
        let mode = Mode::from_eigenvalue(1, omega * omega);
        assert_relative_eq!(mode.frequency, 5.0, epsilon = 1e-12);
        assert_relative_eq!(mode.period, 0.2, epsilon = 1e-12);

        let rigid = Mode::from_eigenvalue(1, -1e-9);
        assert_eq!(rigid.frequency, 0.0);
        assert!(rigid.period.is_infinite());
    }
}
