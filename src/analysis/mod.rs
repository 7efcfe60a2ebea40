//! Eigen-analyses and their options

pub mod assembly;
mod modal;
mod stability;

use serde::{Deserialize, Serialize};

use crate::error::FEAResult;

pub use modal::DynamicAnalysis;
pub use stability::StabilityAnalysis;

/// Diagonal placed on constrained stiffness rows
pub const DEFAULT_PENALTY: f64 = 1e15;

/// Options for linear buckling analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucklingOptions {
    /// Maximum inverse iterations
    pub max_iterations: usize,
    /// Relative convergence tolerance on the load factor
    pub tolerance: f64,
    /// Penalty diagonal for constrained DOFs of K
    pub penalty: f64,
    /// Seed for the start vector (None = entropy)
    pub seed: Option<u64>,
}

impl Default for BucklingOptions {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-8,
            penalty: DEFAULT_PENALTY,
            seed: None,
        }
    }
}

impl BucklingOptions {
    /// Read options from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Make the start vector reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Options for undamped modal analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalOptions {
    /// Number of modes to extract
    pub num_modes: usize,
    /// Maximum inverse iterations per mode
    pub max_iterations: usize,
    /// Relative convergence tolerance on ω²
    pub tolerance: f64,
    /// Penalty diagonal for constrained DOFs of K
    pub penalty: f64,
    /// Diagonal for constrained DOFs of M
    pub mass_penalty: f64,
    /// Seed for the start vectors (None = entropy)
    pub seed: Option<u64>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            num_modes: 5,
            max_iterations: 100,
            tolerance: 1e-10,
            penalty: DEFAULT_PENALTY,
            mass_penalty: 1e-15,
            seed: None,
        }
    }
}

impl ModalOptions {
    /// Options for the first `num_modes` modes
    pub fn modes(num_modes: usize) -> Self {
        Self {
            num_modes,
            ..Self::default()
        }
    }

    /// Read options from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Make the start vectors reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
