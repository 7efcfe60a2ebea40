//! Structural elements module

mod beam;
mod material;
mod node;
mod section;
mod support;

pub use beam::{BeamElement, GaussStation, Geometry, MIN_LENGTH};
pub use material::Material;
pub use node::Node;
pub use section::{
    peterson_kt, Fiber, FiberStrain, Groove, Section, SectionParams, DEFAULT_FIBERS, MIN_AREA,
    MIN_INERTIA,
};
pub use support::{Support, DOFS_PER_NODE, DOF_RZ, DOF_UX, DOF_UY};
