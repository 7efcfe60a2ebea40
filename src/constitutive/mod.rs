//! Constitutive model for fiber-level stress integration

pub mod chaboche;
pub mod thermal;

pub use chaboche::{
    ChabochePlasticity, PlasticityState, ReturnMappingOptions, StressUpdate, MAX_DAMAGE,
};
pub use thermal::{AlloyFamily, ThermalReductionTable};
