//! Profile FEA - structural kernel for aluminium extruded beam profiles
//!
//! This library provides the building blocks for nonlinear analysis of
//! extruded profiles in the plane:
//! - Dense linear algebra with a tolerant Cholesky solver and eigensolvers
//! - Combined isotropic/kinematic hardening with Lemaitre damage and
//!   EN 1999-1-2 temperature reduction
//! - Parametric hollow sections with fillets, grooves and holes
//! - Corotational beam elements with fiber integration
//! - Linear buckling and modal analysis
//!
//! The outer Newton-Raphson loop is left to the caller; elements expose
//! their tangent stiffness and internal force vector for it.
//!
//! ## Example
//! ```rust
//! use profile_fea::prelude::*;
//!
//! let section = Section::new(SectionParams::hollow_rect(0.06, 0.03, 0.003, 0.003)).unwrap();
//! let nodes = vec![Node::new(0.0, 0.0), Node::new(2.0, 0.0)];
//! let elements = vec![BeamElement::new(0, 1, Material::aluminum(), section)];
//! let supports = Support::fixed(0);
//!
//! let buckling = StabilityAnalysis::new(&elements, &nodes, &supports)
//!     .linear_buckling(&BucklingOptions::default().with_seed(1))
//!     .unwrap();
//! assert!(buckling.converged);
//! ```

pub mod analysis;
pub mod catalog;
pub mod constitutive;
pub mod elements;
pub mod error;
pub mod math;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{BucklingOptions, DynamicAnalysis, ModalOptions, StabilityAnalysis};
    pub use crate::catalog::MaterialCatalog;
    pub use crate::constitutive::{
        AlloyFamily, ChabochePlasticity, PlasticityState, ReturnMappingOptions, StressUpdate,
        ThermalReductionTable,
    };
    pub use crate::elements::{
        peterson_kt, BeamElement, Material, Node, Section, SectionParams, Support,
    };
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::math::{EigenResult, Matrix};
    pub use crate::results::{BeamForces, BucklingResult, ModalResult, Mode};
}
