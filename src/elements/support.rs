//! Support conditions

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Local DOF index of the X translation
pub const DOF_UX: usize = 0;
/// Local DOF index of the Y translation
pub const DOF_UY: usize = 1;
/// Local DOF index of the in-plane rotation
pub const DOF_RZ: usize = 2;

/// Degrees of freedom per node
pub const DOFS_PER_NODE: usize = 3;

/// A single fully restrained degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Support {
    /// Node index into the model's node list
    pub node: usize,
    /// Local DOF (0 = ux, 1 = uy, 2 = rz)
    pub dof: usize,
}

impl Support {
    pub fn new(node: usize, dof: usize) -> Self {
        Self { node, dof }
    }

    /// Restrain all three DOFs of a node
    pub fn fixed(node: usize) -> Vec<Self> {
        vec![
            Self::new(node, DOF_UX),
            Self::new(node, DOF_UY),
            Self::new(node, DOF_RZ),
        ]
    }

    /// Restrain both translations, rotation free
    pub fn pinned(node: usize) -> Vec<Self> {
        vec![Self::new(node, DOF_UX), Self::new(node, DOF_UY)]
    }

    /// Restrain the Y translation only
    pub fn roller_y(node: usize) -> Vec<Self> {
        vec![Self::new(node, DOF_UY)]
    }

    /// Global equation number under sequential node numbering
    pub fn global_dof(&self) -> usize {
        self.node * DOFS_PER_NODE + self.dof
    }

    /// Check the support against a model with `node_count` nodes
    pub fn validate(&self, node_count: usize) -> FEAResult<()> {
        if self.node >= node_count {
            return Err(FEAError::NodeNotFound {
                index: self.node,
                count: node_count,
            });
        }
        if self.dof >= DOFS_PER_NODE {
            return Err(FEAError::InvalidBoundaryCondition {
                node: self.node,
                dof: self.dof,
            });
        }
        Ok(())
    }
}
