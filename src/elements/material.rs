//! Material properties

use serde::{Deserialize, Serialize};

use crate::constitutive::AlloyFamily;

/// Material parameter record for elasto-plastic beam analysis
///
/// All values in SI units. The record is immutable once built; the
/// builder methods consume and return it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Initial yield strength in Pa
    pub fy: f64,
    /// Saturation of isotropic hardening Q∞ in Pa
    #[serde(default = "default_q_inf")]
    pub q_inf: f64,
    /// Isotropic hardening rate b
    #[serde(default = "default_b_iso")]
    pub b_iso: f64,
    /// Kinematic hardening modulus C in Pa
    #[serde(default = "default_c_kin")]
    pub c_kin: f64,
    /// Kinematic recall rate γ
    #[serde(default = "default_gamma_kin")]
    pub gamma_kin: f64,
    /// Damage strength S in Pa
    #[serde(default = "default_s_damage")]
    pub s_damage: f64,
    /// Damage exponent s
    #[serde(default = "default_s_exponent")]
    pub s_exponent: f64,
    /// Accumulated plastic strain at which damage starts
    #[serde(default = "default_epsilon_d")]
    pub epsilon_d: f64,
    /// Selects the temperature reduction curve for the yield strength
    #[serde(default)]
    pub alloy: AlloyFamily,
}

fn default_q_inf() -> f64 {
    50e6
}
fn default_b_iso() -> f64 {
    10.0
}
fn default_c_kin() -> f64 {
    15000e6
}
fn default_gamma_kin() -> f64 {
    100.0
}
fn default_s_damage() -> f64 {
    3e6
}
fn default_s_exponent() -> f64 {
    1.0
}
fn default_epsilon_d() -> f64 {
    0.03
}

impl Material {
    /// Create a new material with default hardening and damage parameters
    pub fn new(e: f64, g: f64, nu: f64, rho: f64, fy: f64) -> Self {
        Self {
            e,
            g,
            nu,
            rho,
            fy,
            q_inf: default_q_inf(),
            b_iso: default_b_iso(),
            c_kin: default_c_kin(),
            gamma_kin: default_gamma_kin(),
            s_damage: default_s_damage(),
            s_exponent: default_s_exponent(),
            epsilon_d: default_epsilon_d(),
            alloy: AlloyFamily::default(),
        }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64, fy: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho, fy)
    }

    /// Set Voce (q_inf, b) and Armstrong-Frederick (c, gamma) parameters
    pub fn with_hardening(mut self, q_inf: f64, b: f64, c: f64, gamma: f64) -> Self {
        self.q_inf = q_inf;
        self.b_iso = b;
        self.c_kin = c;
        self.gamma_kin = gamma;
        self
    }

    /// Set Lemaitre damage strength, exponent and threshold
    pub fn with_damage(mut self, s_damage: f64, s_exponent: f64, epsilon_d: f64) -> Self {
        self.s_damage = s_damage;
        self.s_exponent = s_exponent;
        self.epsilon_d = epsilon_d;
        self
    }

    pub fn with_alloy(mut self, alloy: AlloyFamily) -> Self {
        self.alloy = alloy;
        self
    }

    /// Tag the alloy family from a designation such as "7075-T6"
    pub fn with_designation(self, designation: &str) -> Self {
        self.with_alloy(AlloyFamily::from_designation(designation))
    }

    /// Create an aluminum material (6061-T6)
    pub fn aluminum() -> Self {
        Self {
            e: 70e9,         // 70 GPa
            g: 26.3e9,       // 26.3 GPa
            nu: 0.33,
            rho: 2700.0,     // kg/m³
            fy: 240e6,       // 240 MPa
            q_inf: 75e6,
            b_iso: 12.0,
            c_kin: 20000e6,
            gamma_kin: 120.0,
            s_damage: 4.0e6,
            s_exponent: 1.1,
            epsilon_d: 0.035,
            alloy: AlloyFamily::Wrought6xxx,
        }
    }

    /// Create a high-strength aluminum material (7075-T6)
    pub fn aluminum_7075() -> Self {
        Self::isotropic(71.7e9, 0.33, 2810.0, 460e6)
            .with_hardening(60e6, 15.0, 18000e6, 140.0)
            .with_alloy(AlloyFamily::Wrought7xxx)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::aluminum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(70e9, 0.33, 2700.0, 200e6);
        let expected_g = 70e9 / (2.0 * 1.33);
        assert!((mat.g - expected_g).abs() < 1.0);
        assert_eq!(mat.q_inf, 50e6);
        assert_eq!(mat.alloy, AlloyFamily::Wrought6xxx);
    }

    #[test]
    fn test_designation_sets_alloy_once() {
        let mat = Material::aluminum().with_designation("2024-T3");
        assert_eq!(mat.alloy, AlloyFamily::Wrought2xxx);
        assert_eq!(Material::aluminum_7075().alloy, AlloyFamily::Wrought7xxx);
    }

    #[test]
    fn test_json_fills_defaults() {
        let json = r#"{"e": 69e9, "g": 26e9, "nu": 0.33, "rho": 2700.0, "fy": 215e6}"#;
        let mat: Material = serde_json::from_str(json).unwrap();
        assert_eq!(mat.gamma_kin, 100.0);
        assert_eq!(mat.epsilon_d, 0.03);
        assert_eq!(mat.alloy, AlloyFamily::Wrought6xxx);
    }
}
