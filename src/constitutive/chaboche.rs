//! Uniaxial return mapping with combined hardening and damage
//!
//! Voce isotropic hardening `R(r) = Q∞ (1 − e^{−b r})`, Armstrong-Frederick
//! backstress and Lemaitre damage driven by the elastic energy release
//! rate. Temperature enters one way through [`ThermalReductionTable`].

use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use super::thermal::{AlloyFamily, ThermalReductionTable};
use crate::elements::Material;

/// Upper bound on the damage variable
pub const MAX_DAMAGE: f64 = 0.99;

/// Floor of the tangent modulus as a fraction of E_T
const MIN_TANGENT_RATIO: f64 = 0.01;

/// Newton settings for the plastic multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnMappingOptions {
    pub max_iterations: usize,
    /// Residual tolerance, relative to the reduced yield stress
    pub tolerance: f64,
}

impl Default for ReturnMappingOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 1e-10,
        }
    }
}

/// History variables of one material point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlasticityState {
    pub plastic_strain: f64,
    pub backstress: f64,
    /// Accumulated plastic multiplier, never decreases
    pub r: f64,
    /// Damage in [0, 0.99], never decreases
    pub damage: f64,
}

/// Response of a single [`ChabochePlasticity::update`] call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressUpdate {
    pub stress: f64,
    pub tangent: f64,
    pub plastic: bool,
    pub damage: f64,
    pub plastic_strain: f64,
}

/// Material constants after temperature reduction
struct Reduced {
    e: f64,
    fy: f64,
    q_inf: f64,
    c: f64,
}

/// Material point integrator
#[derive(Debug, Clone)]
pub struct ChabochePlasticity {
    e: f64,
    fy: f64,
    q_inf: f64,
    b: f64,
    c: f64,
    gamma: f64,
    s_damage: f64,
    s_exponent: f64,
    epsilon_d: f64,
    alloy: AlloyFamily,
    table: Arc<ThermalReductionTable>,
    options: ReturnMappingOptions,
    state: PlasticityState,
}

impl ChabochePlasticity {
    /// Fresh material point using the EN 1999-1-2 reduction table
    pub fn new(material: &Material) -> Self {
        Self::with_reduction_table(material, Arc::new(ThermalReductionTable::default()))
    }

    /// Fresh material point with an injected reduction table
    pub fn with_reduction_table(material: &Material, table: Arc<ThermalReductionTable>) -> Self {
        Self {
            e: material.e,
            fy: material.fy,
            q_inf: material.q_inf,
            b: material.b_iso,
            c: material.c_kin,
            gamma: material.gamma_kin,
            s_damage: material.s_damage,
            s_exponent: material.s_exponent,
            epsilon_d: material.epsilon_d,
            alloy: material.alloy,
            table,
            options: ReturnMappingOptions::default(),
            state: PlasticityState::default(),
        }
    }

    pub fn with_options(mut self, options: ReturnMappingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &PlasticityState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = PlasticityState::default();
    }

    fn reduced(&self, temperature: f64) -> Reduced {
        let k_e = self.table.e_factor(temperature);
        let k_y = self.table.yield_factor(temperature, self.alloy);
        Reduced {
            e: self.e * k_e,
            fy: self.fy * k_y,
            q_inf: self.q_inf * k_y,
            c: self.c * k_y,
        }
    }

    fn isotropic(&self, q_inf: f64, r: f64) -> f64 {
        q_inf * (1.0 - (-self.b * r).exp())
    }

    /// Backstress increment for a plastic multiplier `dg` in direction `sign`
    fn backstress_increment(&self, c: f64, dg: f64, sign: f64) -> f64 {
        if self.gamma > 0.0 {
            c / self.gamma * (1.0 - (-self.gamma * dg).exp()) * sign
        } else {
            c * dg * sign
        }
    }

    /// Integrate the total strain `strain` at `temperature` (°C)
    pub fn update(&mut self, strain: f64, temperature: f64) -> StressUpdate {
        let mat = self.reduced(temperature);
        let st = self.state;
        let intact = 1.0 - st.damage;

        let sigma_trial = intact * mat.e * (strain - st.plastic_strain);
        let radius = mat.fy + self.isotropic(mat.q_inf, st.r);
        let f_trial = (sigma_trial - st.backstress).abs() - radius;

        if f_trial <= 0.0 {
            return StressUpdate {
                stress: sigma_trial,
                tangent: intact * mat.e,
                plastic: false,
                damage: st.damage,
                plastic_strain: st.plastic_strain,
            };
        }

        let sign = if sigma_trial - st.backstress >= 0.0 { 1.0 } else { -1.0 };
        let tolerance = self.options.tolerance * mat.fy.max(1.0);

        let mut dg = 0.0_f64;
        let mut converged = false;
        for _ in 0..self.options.max_iterations {
            let sigma = sigma_trial - intact * mat.e * dg * sign;
            let alpha = st.backstress + self.backstress_increment(mat.c, dg, sign);
            let f = (sigma - alpha).abs() - (mat.fy + self.isotropic(mat.q_inf, st.r + dg));
            if f.abs() < tolerance {
                converged = true;
                break;
            }

            let df = -intact * mat.e
                - mat.c * (-self.gamma * dg).exp()
                - mat.q_inf * self.b * (-self.b * (st.r + dg)).exp();
            dg = (dg - f / df).max(0.0);
        }
        if !converged {
            trace!(
                "return mapping kept last iterate after {} iterations (dγ = {:.3e})",
                self.options.max_iterations,
                dg
            );
        }

        let mut next = PlasticityState {
            plastic_strain: st.plastic_strain + dg * sign,
            backstress: st.backstress + self.backstress_increment(mat.c, dg, sign),
            r: st.r + dg,
            damage: st.damage,
        };

        if next.r > self.epsilon_d && self.s_damage > 0.0 {
            let y = 0.5 * sigma_trial * sigma_trial / mat.e;
            let dd = (y / self.s_damage).powf(self.s_exponent) * dg;
            next.damage = (st.damage + dd).min(MAX_DAMAGE);
        }
        self.state = next;

        let stress = (1.0 - next.damage) * mat.e * (strain - next.plastic_strain);
        let h = mat.q_inf * self.b * (-self.b * next.r).exp() + mat.c * (-self.gamma * dg).exp();
        let tangent = mat.e * h / (mat.e + h) * (1.0 - next.damage);

        StressUpdate {
            stress,
            tangent: tangent.max(MIN_TANGENT_RATIO * mat.e),
            plastic: true,
            damage: next.damage,
            plastic_strain: next.plastic_strain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_elastic_below_yield() {
        let material = Material::aluminum();
        let mut point = ChabochePlasticity::new(&material);
        for &strain in &[1e-4, 2e-3, -3e-3, 0.0, 3.3e-3] {
            let result = point.update(strain, 20.0);
            assert!(!result.plastic);
            assert_relative_eq!(result.stress, material.e * strain, max_relative = 1e-6);
            assert_relative_eq!(result.tangent, material.e);
        }
        assert_eq!(*point.state(), PlasticityState::default());
    }

    #[test]
    fn test_elastic_modulus_reduced_at_temperature() {
        let material = Material::aluminum();
        let mut point = ChabochePlasticity::new(&material);
        // fy,T = 0.45 * 240 MPa, E_T = 0.85 * 70 GPa
        let strain = 1e-3;
        let result = point.update(strain, 300.0);
        assert!(!result.plastic);
        assert_relative_eq!(result.stress, 0.85 * material.e * strain, max_relative = 1e-6);
    }

    #[test]
    fn test_yield_stress_reduced_at_temperature() {
        let material = Material::aluminum();
        let mut cold = ChabochePlasticity::new(&material);
        let mut hot = ChabochePlasticity::new(&material);
        let strain = 2.5e-3;
        assert!(!cold.update(strain, 20.0).plastic);
        assert!(hot.update(strain, 300.0).plastic);
    }

    #[test]
    fn test_return_mapping_lands_on_yield_surface() {
        let material = Material::aluminum();
        let mut point = ChabochePlasticity::new(&material);
        let result = point.update(0.01, 20.0);
        assert!(result.plastic);

        let st = point.state();
        let radius = material.fy + material.q_inf * (1.0 - (-material.b_iso * st.r).exp());
        assert_relative_eq!(
            (result.stress - st.backstress).abs(),
            radius,
            max_relative = 1e-6
        );
        assert!(result.tangent >= 0.01 * material.e);
        assert!(result.tangent < material.e);
    }

    #[test]
    fn test_monotonic_loading_accumulates() {
        let material = Material::aluminum().with_damage(4.0e6, 1.1, 0.01);
        let mut point = ChabochePlasticity::new(&material);
        let mut last_damage = 0.0;
        let mut last_plastic = 0.0;
        for step in 1..=60 {
            let result = point.update(step as f64 * 1e-3, 20.0);
            assert!(result.damage >= last_damage);
            assert!(result.plastic_strain.abs() >= last_plastic);
            assert!(result.damage <= MAX_DAMAGE);
            last_damage = result.damage;
            last_plastic = result.plastic_strain.abs();
        }
        assert!(last_damage > 0.0);
        assert!(point.state().r > 0.01);
    }

    #[test]
    fn test_compression_mirrors_tension() {
        let material = Material::aluminum();
        let mut tension = ChabochePlasticity::new(&material);
        let mut compression = ChabochePlasticity::new(&material);
        let t = tension.update(0.008, 20.0);
        let c = compression.update(-0.008, 20.0);
        assert_relative_eq!(t.stress, -c.stress, max_relative = 1e-9);
        assert_relative_eq!(t.plastic_strain, -c.plastic_strain, max_relative = 1e-9);
    }

    #[test]
    fn test_reset_matches_fresh_instance() {
        let material = Material::aluminum();
        let mut used = ChabochePlasticity::new(&material);
        used.update(0.02, 150.0);
        used.update(-0.01, 150.0);
        used.reset();

        let mut fresh = ChabochePlasticity::new(&material);
        assert_eq!(used.update(0.006, 150.0), fresh.update(0.006, 150.0));
    }

    #[test]
    fn test_injected_table() {
        let table = ThermalReductionTable::new(vec![
            [0.0, 1.0, 1.0, 1.0],
            [100.0, 0.5, 0.5, 0.5],
        ])
        .unwrap();
        let material = Material::aluminum();
        let mut point = ChabochePlasticity::with_reduction_table(&material, Arc::new(table));
        let result = point.update(1e-4, 100.0);
        assert_relative_eq!(result.stress, 0.5 * material.e * 1e-4, max_relative = 1e-9);
    }
}
