//! Parametric hollow rectangular section for extruded profiles
//!
//! Closed-form properties are derived from the outer box minus the inner
//! void, with corrections for inner corner fillets, a groove cut into the
//! top face and a through-hole drilled across both horizontal walls. The
//! fiber list integrates stresses through the depth for the beam element.

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Area floor for degenerate sections (m²)
pub const MIN_AREA: f64 = 1e-8;
/// Inertia floor for degenerate sections (m⁴)
pub const MIN_INERTIA: f64 = 1e-14;

pub const DEFAULT_FIBERS: usize = 10;

/// Centroid of a fillet spandrel measured from the void corner, per unit radius
const FILLET_CENTROID: f64 = 0.2234;

/// Rectangular groove removed from the top face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Groove {
    pub width: f64,
    pub height: f64,
}

/// Geometry record of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionParams {
    /// Outer width W in m
    pub width: f64,
    /// Outer height H in m
    pub height: f64,
    /// Thickness of the vertical walls in m
    pub t_v: f64,
    /// Thickness of the horizontal walls in m
    pub t_h: f64,
    /// Inner corner fillet radius in m
    #[serde(default)]
    pub fillet: f64,
    #[serde(default)]
    pub groove: Option<Groove>,
    /// Diameter of a hole through both horizontal walls in m
    #[serde(default)]
    pub hole: Option<f64>,
    #[serde(default = "default_fibers")]
    pub num_fibers: usize,
}

fn default_fibers() -> usize {
    DEFAULT_FIBERS
}

impl SectionParams {
    /// Plain hollow rectangle
    pub fn hollow_rect(width: f64, height: f64, t_v: f64, t_h: f64) -> Self {
        Self {
            width,
            height,
            t_v,
            t_h,
            fillet: 0.0,
            groove: None,
            hole: None,
            num_fibers: DEFAULT_FIBERS,
        }
    }

    pub fn with_fillet(mut self, radius: f64) -> Self {
        self.fillet = radius;
        self
    }

    pub fn with_groove(mut self, width: f64, height: f64) -> Self {
        self.groove = Some(Groove { width, height });
        self
    }

    pub fn with_hole(mut self, diameter: f64) -> Self {
        self.hole = Some(diameter);
        self
    }

    pub fn with_fibers(mut self, num_fibers: usize) -> Self {
        self.num_fibers = num_fibers;
        self
    }

    fn validate(&self) -> FEAResult<()> {
        let mut dims = vec![
            ("width", self.width),
            ("height", self.height),
            ("t_v", self.t_v),
            ("t_h", self.t_h),
            ("fillet", self.fillet),
        ];
        if let Some(g) = self.groove {
            dims.push(("groove width", g.width));
            dims.push(("groove height", g.height));
        }
        if let Some(d) = self.hole {
            dims.push(("hole diameter", d));
        }

        for (name, value) in dims {
            if !value.is_finite() || value < 0.0 {
                return Err(FEAError::InvalidGeometry(format!(
                    "section {} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.num_fibers == 0 {
            return Err(FEAError::InvalidGeometry(
                "section needs at least one fiber".to_string(),
            ));
        }
        Ok(())
    }
}

/// One integration layer of the section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    /// Elevation from the mid-height (positive up) in m
    pub y: f64,
    /// Tributary area in m²
    pub area: f64,
    /// Average material width of the layer in m
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiberStrain {
    pub y: f64,
    pub area: f64,
    pub strain: f64,
}

/// Cross-section with derived properties
///
/// Derived values are private so they can only change together through
/// [`Section::reconfigure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    params: SectionParams,
    a: f64,
    i: f64,
    a_s: f64,
    j: f64,
    s: f64,
    fibers: Vec<Fiber>,
}

impl Section {
    pub fn new(params: SectionParams) -> FEAResult<Self> {
        params.validate()?;

        let (a, i) = area_and_inertia(&params);
        let fibers = generate_fibers(&params);

        Ok(Self {
            a,
            i,
            a_s: a * 5.0 / 6.0,
            j: torsion_constant(&params),
            s: i / (params.height / 2.0).max(f64::EPSILON),
            fibers,
            params,
        })
    }

    /// Replace the geometry and every derived quantity at once
    ///
    /// On error the section is left unchanged.
    pub fn reconfigure(&mut self, params: SectionParams) -> FEAResult<()> {
        *self = Self::new(params)?;
        Ok(())
    }

    pub fn params(&self) -> &SectionParams {
        &self.params
    }

    /// Cross-sectional area in m²
    pub fn area(&self) -> f64 {
        self.a
    }

    /// Second moment of area about the bending axis in m⁴
    pub fn inertia(&self) -> f64 {
        self.i
    }

    /// Timoshenko shear area in m²
    pub fn shear_area(&self) -> f64 {
        self.a_s
    }

    /// Torsional constant in m⁴
    pub fn torsion_constant(&self) -> f64 {
        self.j
    }

    /// Elastic section modulus in m³
    pub fn section_modulus(&self) -> f64 {
        self.s
    }

    pub fn fibers(&self) -> &[Fiber] {
        &self.fibers
    }

    /// Radius of gyration
    pub fn radius_of_gyration(&self) -> f64 {
        (self.i / self.a).sqrt()
    }

    /// Peterson factor of the hole, 1.0 without a hole
    pub fn stress_concentration(&self) -> f64 {
        match self.params.hole {
            Some(d) => peterson_kt(d, self.params.width),
            None => 1.0,
        }
    }

    /// Fiber strains for axial strain `epsilon` and curvature `kappa`
    pub fn fiber_strains(&self, epsilon: f64, kappa: f64) -> Vec<FiberStrain> {
        self.fibers
            .iter()
            .map(|f| FiberStrain {
                y: f.y,
                area: f.area,
                strain: epsilon - kappa * f.y,
            })
            .collect()
    }
}

/// Peterson stress concentration for a hole of diameter `d` in a plate of width `w`
pub fn peterson_kt(d: f64, w: f64) -> f64 {
    if d <= 0.0 || w <= 0.0 {
        return 1.0;
    }
    let r = d / w;
    if r >= 0.5 {
        return 3.0;
    }
    let kt = 3.0 - 3.14 * r + 3.667 * r.powi(2) - 1.527 * r.powi(3);
    kt.clamp(1.0, 3.0)
}

fn area_and_inertia(p: &SectionParams) -> (f64, f64) {
    let (w, h) = (p.width, p.height);

    let mut a_outer = w * h;
    let mut i_outer = w * h.powi(3) / 12.0;

    let w_in = (w - 2.0 * p.t_v).max(0.0);
    let h_in = (h - 2.0 * p.t_h).max(0.0);
    let mut a_inner = w_in * h_in;
    let mut i_inner = w_in * h_in.powi(3) / 12.0;

    if p.fillet > 0.0 && a_inner > 0.0 {
        // Four spandrels of material filling the void corners
        let a_f = (4.0 - std::f64::consts::PI) * p.fillet.powi(2);
        let y_f = (h_in / 2.0 - FILLET_CENTROID * p.fillet).max(0.0);
        a_inner -= a_f;
        i_inner -= a_f * y_f * y_f;
    }

    if let Some(g) = p.groove {
        let a_g = g.width * g.height;
        let y_g = h / 2.0 - g.height / 2.0;
        a_outer -= a_g;
        i_outer -= a_g * y_g * y_g + g.width * g.height.powi(3) / 12.0;
    }

    if let Some(d) = p.hole {
        let y_w = h / 2.0 - p.t_h / 2.0;
        a_outer -= 2.0 * d * p.t_h;
        i_outer -= 2.0 * (d * p.t_h.powi(3) / 12.0 + d * p.t_h * y_w * y_w);
    }

    (
        (a_outer - a_inner).max(MIN_AREA),
        (i_outer - i_inner).max(MIN_INERTIA),
    )
}

/// Bredt's formula for a thin-walled closed rectangle on the wall midlines
fn torsion_constant(p: &SectionParams) -> f64 {
    let b_m = p.width - p.t_v;
    let h_m = p.height - p.t_h;
    let denom = p.width * p.t_v + p.height * p.t_h - p.t_v.powi(2) - p.t_h.powi(2);
    if denom <= 0.0 || b_m <= 0.0 || h_m <= 0.0 {
        return MIN_INERTIA;
    }
    (2.0 * p.t_v * p.t_h * b_m.powi(2) * h_m.powi(2) / denom).max(MIN_INERTIA)
}

/// Length of the overlap of `[lo, hi]` and `[a, b]`
fn overlap(lo: f64, hi: f64, a: f64, b: f64) -> f64 {
    (hi.min(b) - lo.max(a)).max(0.0)
}

fn generate_fibers(p: &SectionParams) -> Vec<Fiber> {
    let n = p.num_fibers;
    let h = p.height;
    let dy = h / n as f64;
    let t_h = p.t_h.min(h / 2.0);
    let web = (2.0 * p.t_v).min(p.width);

    let mut fibers: Vec<Fiber> = (0..n)
        .map(|k| {
            let lo = -h / 2.0 + k as f64 * dy;
            let hi = lo + dy;

            // Layers straddling a wall boundary get the exact width integral
            let in_walls =
                overlap(lo, hi, h / 2.0 - t_h, h / 2.0) + overlap(lo, hi, -h / 2.0, -h / 2.0 + t_h);
            let mut area = p.width * in_walls + web * (dy - in_walls);

            if let Some(g) = p.groove {
                let cut = overlap(lo, hi, h / 2.0 - g.height, h / 2.0);
                area -= g.width.min(p.width) * cut;
            }
            if let Some(d) = p.hole {
                area -= d.min(p.width) * in_walls;
            }

            let area = area.max(0.0);
            Fiber {
                y: lo + dy / 2.0,
                area,
                width: if dy > 0.0 { area / dy } else { 0.0 },
            }
        })
        .collect();

    let h_in = h - 2.0 * t_h;
    if p.fillet > 0.0 && h_in > 0.0 && !fibers.is_empty() {
        let half = (4.0 - std::f64::consts::PI) * p.fillet.powi(2) / 2.0;
        let y_f = (h_in / 2.0 - FILLET_CENTROID * p.fillet).max(0.0);
        for y in [y_f, -y_f] {
            let k = (((y + h / 2.0) / dy) as usize).min(n - 1);
            fibers[k].area += half;
            fibers[k].width = fibers[k].area / dy;
        }
    }

    fibers
}
