//! Temperature reduction of elastic and yield properties
//!
//! Factors come from a four-column table `[T, k_E, k_yield_6xxx,
//! k_yield_7xxx]`, linearly interpolated and clamped at both ends. The
//! default table holds the EN 1999-1-2 values; callers with their own
//! thermal data inject a different table.

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Alloy family used to pick the yield-reduction curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlloyFamily {
    /// 6xxx wrought alloys (6060, 6061, 6063, 6082)
    #[default]
    Wrought6xxx,
    /// 7xxx wrought alloys (7075 "Ergal")
    Wrought7xxx,
    /// 2xxx wrought alloys (2024 "Avional")
    Wrought2xxx,
    /// Cast alloys (EN AB 4xxxx, Zamak)
    Cast,
}

impl AlloyFamily {
    /// Classify a material designation such as "6082-T6" or "EN AB 46100"
    ///
    /// Meant to be called once when a material record is built. Unknown
    /// designations fall back to 6xxx.
    pub fn from_designation(name: &str) -> Self {
        let name = name.to_uppercase();

        // Cast designations first: "46100" would otherwise read as 6xxx
        if name.contains("EN AB") || name.contains("ZAMAK") || has_number(&name, "4", 5) {
            return Self::Cast;
        }
        if has_number(&name, "70", 4) || name.contains("ERGAL") {
            return Self::Wrought7xxx;
        }
        if has_number(&name, "20", 4) || name.contains("AVIONAL") {
            return Self::Wrought2xxx;
        }
        Self::Wrought6xxx
    }

    /// Families whose yield strength degrades along the 7xxx curve
    fn uses_high_strength_curve(self) -> bool {
        matches!(self, Self::Wrought7xxx | Self::Wrought2xxx)
    }
}

/// True if `name` contains a run of `len` ASCII digits starting with `prefix`
fn has_number(name: &str, prefix: &str, len: usize) -> bool {
    let bytes = name.as_bytes();
    bytes.windows(len).any(|w| {
        w.iter().all(u8::is_ascii_digit) && w.starts_with(prefix.as_bytes())
    })
}

/// Reference temperature of the room-temperature properties (°C)
const ROOM_TEMPERATURE: f64 = 20.0;

const COL_E: usize = 1;
const COL_YIELD_6XXX: usize = 2;
const COL_YIELD_7XXX: usize = 3;

/// Piecewise-linear reduction factors keyed by temperature (°C)
///
/// Deserialization goes through [`ThermalReductionTable::new`], so a table
/// read from JSON is validated like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct ThermalReductionTable {
    rows: Vec<[f64; 4]>,
}

/// Unvalidated wire form of a table
#[derive(Deserialize)]
struct RawTable {
    rows: Vec<[f64; 4]>,
}

impl TryFrom<RawTable> for ThermalReductionTable {
    type Error = FEAError;

    fn try_from(raw: RawTable) -> FEAResult<Self> {
        Self::new(raw.rows)
    }
}

impl ThermalReductionTable {
    /// Build from `[T, k_E, k_yield_6xxx, k_yield_7xxx]` rows
    ///
    /// Temperatures must be strictly increasing.
    pub fn new(rows: Vec<[f64; 4]>) -> FEAResult<Self> {
        if rows.is_empty() {
            return Err(FEAError::InvalidInput(
                "reduction table needs at least one row".to_string(),
            ));
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(FEAError::InvalidInput(
                "reduction table entries must be finite".to_string(),
            ));
        }
        if rows.windows(2).any(|w| w[1][0] <= w[0][0]) {
            return Err(FEAError::InvalidInput(
                "reduction table temperatures must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// EN 1999-1-2 (Eurocode 9, fire design) reduction factors
    pub fn en_1999_1_2() -> Self {
        Self {
            rows: vec![
                [20.0, 1.000, 1.000, 1.000],
                [100.0, 0.980, 0.920, 0.900],
                [150.0, 0.965, 0.850, 0.780],
                [200.0, 0.940, 0.750, 0.650],
                [250.0, 0.900, 0.600, 0.500],
                [300.0, 0.850, 0.450, 0.350],
                [350.0, 0.750, 0.300, 0.200],
                [400.0, 0.600, 0.180, 0.100],
                [450.0, 0.450, 0.080, 0.050],
                [500.0, 0.300, 0.030, 0.020],
                [550.0, 0.150, 0.010, 0.005],
            ],
        }
    }

    pub fn rows(&self) -> &[[f64; 4]] {
        &self.rows
    }

    fn interpolate(&self, temperature: f64, column: usize) -> f64 {
        let first = &self.rows[0];
        let last = &self.rows[self.rows.len() - 1];
        if temperature <= first[0] {
            return first[column];
        }
        if temperature >= last[0] {
            return last[column];
        }

        for w in self.rows.windows(2) {
            let (lo, hi) = (&w[0], &w[1]);
            if temperature <= hi[0] {
                let t = (temperature - lo[0]) / (hi[0] - lo[0]);
                return lo[column] + t * (hi[column] - lo[column]);
            }
        }
        last[column]
    }

    /// Reduction factor for the elastic modulus
    pub fn e_factor(&self, temperature: f64) -> f64 {
        self.interpolate(temperature, COL_E)
    }

    /// Reduction factor for the shear modulus (follows E)
    pub fn g_factor(&self, temperature: f64) -> f64 {
        self.e_factor(temperature)
    }

    /// Growth of the thermal expansion coefficient, +0.1 % per °C above 20 °C
    pub fn expansion_factor(temperature: f64) -> f64 {
        1.0 + 0.001 * (temperature - ROOM_TEMPERATURE).max(0.0)
    }

    /// Loss of thermal conductivity, −0.02 % per °C above 20 °C, floored at 0.85
    pub fn conductivity_factor(temperature: f64) -> f64 {
        (1.0 - 0.0002 * (temperature - ROOM_TEMPERATURE).max(0.0)).max(0.85)
    }

    /// Growth of the specific heat, +0.03 % per °C above 20 °C
    pub fn specific_heat_factor(temperature: f64) -> f64 {
        1.0 + 0.0003 * (temperature - ROOM_TEMPERATURE).max(0.0)
    }

    /// Reduction factor for the yield stress of the given alloy family
    pub fn yield_factor(&self, temperature: f64, family: AlloyFamily) -> f64 {
        if family.uses_high_strength_curve() {
            self.interpolate(temperature, COL_YIELD_7XXX)
        } else {
            self.interpolate(temperature, COL_YIELD_6XXX)
        }
    }
}

impl Default for ThermalReductionTable {
    fn default() -> Self {
        Self::en_1999_1_2()
    }
}
