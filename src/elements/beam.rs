//! Two-node corotational beam element
//!
//! The element frame follows the current chord, so arbitrarily large
//! rigid-body motion never reaches the constitutive model. Only the
//! deformational part (chord stretch and end rotations relative to the
//! chord) is turned into fiber strains and integrated with two Gauss
//! stations along the length.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Material, Node, Section};
use crate::constitutive::{ChabochePlasticity, ThermalReductionTable};
use crate::error::{FEAError, FEAResult};
use crate::math::{rotation_matrix, to_global, Mat6, Vec6};
use crate::results::BeamForces;

/// Chord length floor for coincident nodes (m)
pub const MIN_LENGTH: f64 = 1e-12;

/// Gauss-Legendre abscissae for two points on [-1, 1]
const GAUSS_POINTS: [f64; 2] = [-0.577_350_269_189_625_8, 0.577_350_269_189_625_8];

/// Chord of an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub length: f64,
    pub cos_theta: f64,
    pub sin_theta: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Geometry {
    /// Coincident nodes get the minimum length and the global X direction
    fn from_chord(dx: f64, dy: f64) -> Self {
        let length = (dx * dx + dy * dy).sqrt();
        if length < MIN_LENGTH {
            return Self {
                length: MIN_LENGTH,
                cos_theta: 1.0,
                sin_theta: 0.0,
                dx,
                dy,
            };
        }
        Self {
            length,
            cos_theta: dx / length,
            sin_theta: dy / length,
            dx,
            dy,
        }
    }

    /// Signed angle that rotates `reference` onto this chord
    fn rotation_from(&self, reference: &Geometry) -> f64 {
        let sin = reference.cos_theta * self.sin_theta - reference.sin_theta * self.cos_theta;
        let cos = reference.cos_theta * self.cos_theta + reference.sin_theta * self.sin_theta;
        sin.atan2(cos)
    }
}

/// Map an angle into (-π, π]
///
/// Nodal rotations are unbounded while the chord rotation comes from
/// `atan2`, so their difference is only meaningful modulo 2π.
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Section response at one integration station
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussStation {
    /// Natural coordinate in [-1, 1]
    pub xi: f64,
    pub axial_strain: f64,
    pub curvature: f64,
    pub axial_force: f64,
    /// Internal bending moment, sagging positive
    pub moment: f64,
}

/// Corotational 2D beam with fiber plasticity
#[derive(Debug, Clone)]
pub struct BeamElement {
    /// Index of the start node
    pub i_node: usize,
    /// Index of the end node
    pub j_node: usize,
    material: Material,
    section: Section,
    shear_deformation: bool,
    /// One material point per fiber, station-major
    plasticity: Vec<ChabochePlasticity>,
    stations: [GaussStation; 2],
    forces: BeamForces,
}

impl BeamElement {
    /// Element between nodes `i_node` and `j_node` using the EN 1999-1-2 table
    pub fn new(i_node: usize, j_node: usize, material: Material, section: Section) -> Self {
        Self::with_reduction_table(
            i_node,
            j_node,
            material,
            section,
            Arc::new(ThermalReductionTable::default()),
        )
    }

    /// Element whose material points share an injected reduction table
    pub fn with_reduction_table(
        i_node: usize,
        j_node: usize,
        material: Material,
        section: Section,
        table: Arc<ThermalReductionTable>,
    ) -> Self {
        let points = GAUSS_POINTS.len() * section.fibers().len();
        let plasticity = (0..points)
            .map(|_| ChabochePlasticity::with_reduction_table(&material, Arc::clone(&table)))
            .collect();

        Self {
            i_node,
            j_node,
            material,
            section,
            shear_deformation: true,
            plasticity,
            stations: Default::default(),
            forces: BeamForces::default(),
        }
    }

    /// Use Euler-Bernoulli bending (φ = 0)
    pub fn without_shear_deformation(mut self) -> Self {
        self.shear_deformation = false;
        self
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Current resultants
    pub fn forces(&self) -> BeamForces {
        self.forces
    }

    pub fn stations(&self) -> &[GaussStation; 2] {
        &self.stations
    }

    /// Material points, all fibers of station 0 first
    pub fn plasticity(&self) -> &[ChabochePlasticity] {
        &self.plasticity
    }

    /// Global DOF numbers under sequential 3-per-node numbering
    pub fn dofs(&self) -> [usize; 6] {
        let i = self.i_node * 3;
        let j = self.j_node * 3;
        [i, i + 1, i + 2, j, j + 1, j + 2]
    }

    fn end_nodes<'a>(&self, nodes: &'a [Node]) -> FEAResult<(&'a Node, &'a Node)> {
        let lookup = |index: usize| {
            nodes.get(index).ok_or(FEAError::NodeNotFound {
                index,
                count: nodes.len(),
            })
        };
        Ok((lookup(self.i_node)?, lookup(self.j_node)?))
    }

    /// Chord of the undeformed element
    pub fn reference_geometry(&self, nodes: &[Node]) -> FEAResult<Geometry> {
        let (ni, nj) = self.end_nodes(nodes)?;
        Ok(Geometry::from_chord(nj.x - ni.x, nj.y - ni.y))
    }

    /// Chord of the displaced element
    pub fn geometry(&self, nodes: &[Node]) -> FEAResult<Geometry> {
        let (ni, nj) = self.end_nodes(nodes)?;
        let [xi, yi] = ni.current_position();
        let [xj, yj] = nj.current_position();
        Ok(Geometry::from_chord(xj - xi, yj - yi))
    }

    pub fn transformation_matrix(&self, nodes: &[Node]) -> FEAResult<Mat6> {
        let g = self.geometry(nodes)?;
        Ok(rotation_matrix(g.cos_theta, g.sin_theta))
    }

    /// Elastic stiffness in the current element frame
    pub fn local_stiffness(&self, nodes: &[Node]) -> FEAResult<Mat6> {
        let g = self.geometry(nodes)?;
        Ok(self.elastic_stiffness(g.length))
    }

    fn elastic_stiffness(&self, length: f64) -> Mat6 {
        let e = self.material.e;
        let a = self.section.area();
        let i = self.section.inertia();

        let l = length;
        let l2 = l * l;
        let l3 = l2 * l;

        let ga_s = self.material.g * self.section.shear_area();
        let phi = if self.shear_deformation && ga_s > 0.0 {
            12.0 * e * i / (ga_s * l2)
        } else {
            0.0
        };
        let factor = 1.0 / (1.0 + phi);

        let ea_l = e * a / l;
        let k11 = 12.0 * e * i / l3 * factor;
        let k12 = 6.0 * e * i / l2 * factor;
        let k22 = (4.0 + phi) * e * i / l * factor;
        let k23 = (2.0 - phi) * e * i / l * factor;

        #[rustfmt::skip]
        let data = [
            ea_l,  0.0,   0.0,   -ea_l, 0.0,   0.0,
            0.0,   k11,   k12,   0.0,   -k11,  k12,
            0.0,   k12,   k22,   0.0,   -k12,  k23,
            -ea_l, 0.0,   0.0,   ea_l,  0.0,   0.0,
            0.0,   -k11,  -k12,  0.0,   k11,   -k12,
            0.0,   k12,   k23,   0.0,   -k12,  k22,
        ];

        Mat6::from_row_slice(&data)
    }

    /// Consistent geometric stiffness for axial force `n` (tension positive)
    ///
    /// Bending terms only; the axial rows stay zero.
    pub fn geometric_stiffness(&self, n: f64, length: f64) -> Mat6 {
        let l = length.max(MIN_LENGTH);
        let f = n / l;
        let a = 6.0 / 5.0 * f;
        let b = l / 10.0 * f;
        let c = 2.0 * l * l / 15.0 * f;
        let d = -l * l / 30.0 * f;

        #[rustfmt::skip]
        let data = [
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, a,   b,   0.0, -a,  b,
            0.0, b,   c,   0.0, -b,  d,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, -a,  -b,  0.0, a,   -b,
            0.0, b,   d,   0.0, -b,  c,
        ];

        Mat6::from_row_slice(&data)
    }

    /// Tangent stiffness in global coordinates: Tᵀ (K + Kg(N)) T
    pub fn global_stiffness(&self, nodes: &[Node], include_geometric: bool) -> FEAResult<Mat6> {
        let g = self.geometry(nodes)?;
        let t = rotation_matrix(g.cos_theta, g.sin_theta);
        let mut k = self.elastic_stiffness(g.length);
        if include_geometric && self.forces.n != 0.0 {
            k += self.geometric_stiffness(self.forces.n, g.length);
        }
        Ok(to_global(&t, &k))
    }

    /// Consistent mass in global coordinates
    pub fn mass_matrix(&self, nodes: &[Node]) -> FEAResult<Mat6> {
        let g = self.geometry(nodes)?;
        let l = g.length;
        let m = self.material.rho * self.section.area() * l;

        let a1 = m / 3.0;
        let a2 = m / 6.0;
        let t1 = 13.0 * m / 35.0;
        let t2 = 11.0 * m * l / 210.0;
        let t3 = 9.0 * m / 70.0;
        let t4 = 13.0 * m * l / 420.0;
        let r1 = m * l * l / 105.0;
        let r2 = m * l * l / 140.0;

        #[rustfmt::skip]
        let data = [
            a1,  0.0, 0.0, a2,  0.0, 0.0,
            0.0, t1,  t2,  0.0, t3,  -t4,
            0.0, t2,  r1,  0.0, t4,  -r2,
            a2,  0.0, 0.0, a1,  0.0, 0.0,
            0.0, t3,  t4,  0.0, t1,  -t2,
            0.0, -t4, -r2, 0.0, -t2, r1,
        ];

        let t = rotation_matrix(g.cos_theta, g.sin_theta);
        Ok(to_global(&t, &Mat6::from_row_slice(&data)))
    }

    /// Integrate the fiber response for the current nodal displacements
    ///
    /// Advances the plasticity state of every material point; call once per
    /// converged or trial configuration of the outer solver.
    pub fn update_internal_forces(
        &mut self,
        nodes: &[Node],
        temperature: f64,
    ) -> FEAResult<BeamForces> {
        let (ni, nj) = self.end_nodes(nodes)?;
        let (theta_i, theta_j) = (ni.theta, nj.theta);
        let reference = self.reference_geometry(nodes)?;
        let current = self.geometry(nodes)?;

        let l0 = reference.length;
        let epsilon = (current.length - l0) / l0;

        // End rotations relative to the rigidly rotated chord
        let rigid = current.rotation_from(&reference);
        let rot_i = wrap_angle(theta_i - rigid);
        let rot_j = wrap_angle(theta_j - rigid);

        // Cubic Hermite curvature is linear along the element
        let kappa_i = (-4.0 * rot_i - 2.0 * rot_j) / l0;
        let kappa_j = (2.0 * rot_i + 4.0 * rot_j) / l0;

        let n_fibers = self.section.fibers().len();
        for (g, &xi) in GAUSS_POINTS.iter().enumerate() {
            let s = 0.5 * (1.0 + xi);
            let kappa = (1.0 - s) * kappa_i + s * kappa_j;

            let strains = self.section.fiber_strains(epsilon, kappa);
            let points = &mut self.plasticity[g * n_fibers..(g + 1) * n_fibers];

            let mut axial = 0.0;
            let mut moment = 0.0;
            for (fiber, point) in strains.iter().zip(points.iter_mut()) {
                let update = point.update(fiber.strain, temperature);
                axial += update.stress * fiber.area;
                moment -= update.stress * fiber.area * fiber.y;
            }

            self.stations[g] = GaussStation {
                xi,
                axial_strain: epsilon,
                curvature: kappa,
                axial_force: axial,
                moment,
            };
        }

        let [a, b] = self.stations;
        let s_a = 0.5 * (1.0 + a.xi);
        let s_b = 0.5 * (1.0 + b.xi);
        let slope = (b.moment - a.moment) / (s_b - s_a);
        let moment_i = a.moment - slope * s_a;
        let moment_j = a.moment + slope * (1.0 - s_a);

        let m1 = -moment_i;
        let m2 = moment_j;
        self.forces = BeamForces {
            n: 0.5 * (a.axial_force + b.axial_force),
            v: (m1 + m2) / current.length,
            m1,
            m2,
        };
        Ok(self.forces)
    }

    /// Element end forces in global coordinates
    pub fn internal_force_vector(&self, nodes: &[Node]) -> FEAResult<Vec6> {
        let t = self.transformation_matrix(nodes)?;
        Ok(t.transpose() * self.forces.local_vector())
    }

    /// Normal stress at natural coordinate `xi` and fiber elevation `y`
    pub fn stress(&self, xi: f64, y: f64) -> f64 {
        let s = 0.5 * (1.0 + xi);
        let moment = (1.0 - s) * (-self.forces.m1) + s * self.forces.m2;
        self.forces.n / self.section.area() - moment * y / self.section.inertia()
    }

    /// Clear plastic history and resultants
    pub fn reset(&mut self) {
        self.plasticity.iter_mut().for_each(ChabochePlasticity::reset);
        self.stations = Default::default();
        self.forces = BeamForces::default();
    }
}
