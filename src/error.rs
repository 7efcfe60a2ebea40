//! Error types for the profile kernel

use thiserror::Error;

/// Main error type for kernel operations
///
/// Numerical non-convergence is never an error: eigen-analyses report it
/// through their `converged` flag and the return mapping keeps its last
/// iterate. These variants cover misuse of the model description.
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node {index} not found (model has {count} nodes)")]
    NodeNotFound { index: usize, count: usize },

    #[error("Material '{0}' not found in catalog")]
    MaterialNotFound(String),

    #[error("Invalid boundary condition on node {node}, dof {dof}")]
    InvalidBoundaryCondition { node: usize, dof: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for kernel operations
pub type FEAResult<T> = Result<T, FEAError>;
