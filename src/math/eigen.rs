//! Iterative eigensolvers
//!
//! Two families live here: plain power iteration for the dominant
//! eigenvalue of a single matrix, and inverse iteration with a Rayleigh
//! quotient for the smallest eigenvalue of a generalized problem
//! `K φ = λ B φ`. Neither fails on non-convergence; the caller gets the
//! last estimate together with a `converged` flag.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::dense::{solve_with_factor, Matrix, MIN_PIVOT};

pub(crate) const POWER_MAX_ITER: usize = 100;
pub(crate) const POWER_TOLERANCE: f64 = 1e-10;

/// Outcome of an iterative eigen-solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenResult {
    pub eigenvalue: f64,
    pub eigenvector: Vec<f64>,
    pub converged: bool,
    /// Iterations actually performed
    pub iterations: usize,
}

/// How iterates are scaled between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Unit Euclidean length
    Euclidean,
    /// Unit length in the B inner product (`φᵀ B φ = 1`)
    BNorm,
}

/// Caps and scaling for [`GeneralizedEigenSolver::solve`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InverseIterationSettings {
    pub max_iterations: usize,
    /// Relative change of the eigenvalue estimate that counts as converged
    pub tolerance: f64,
    pub normalization: Normalization,
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// RNG for start vectors: seeded for reproducible runs, entropy otherwise
pub fn start_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Random vector with unit Euclidean length
pub fn random_unit_vector<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
    let mut v: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let len = norm(&v).max(MIN_PIVOT);
    v.iter_mut().for_each(|x| *x /= len);
    v
}

fn has_converged(new: f64, old: f64, tol: f64) -> bool {
    (new - old).abs() <= tol * new.abs().max(1.0)
}

/// Power iteration from a uniform start vector
///
/// The eigenvalue estimate is the Rayleigh quotient of the normalised
/// iterate, so the sign of the dominant eigenvalue is preserved for
/// symmetric input.
pub fn power_iteration(a: &Matrix, max_iter: usize, tol: f64) -> EigenResult {
    let n = a.rows();
    let mut v = vec![1.0 / (n.max(1) as f64).sqrt(); n];
    let mut lambda = 0.0;

    for iter in 0..max_iter {
        let w = a.multiply_vector(&v);
        let w_norm = norm(&w);
        if w_norm < MIN_PIVOT {
            // Start vector lies in the null space
            return EigenResult {
                eigenvalue: 0.0,
                eigenvector: v,
                converged: a.norm() < MIN_PIVOT,
                iterations: iter + 1,
            };
        }

        let lambda_new = dot(&v, &w);
        v = w.iter().map(|x| x / w_norm).collect();

        if iter > 0 && has_converged(lambda_new, lambda, tol) {
            return EigenResult {
                eigenvalue: lambda_new,
                eigenvector: v,
                converged: true,
                iterations: iter + 1,
            };
        }
        lambda = lambda_new;
    }

    EigenResult {
        eigenvalue: lambda,
        eigenvector: v,
        converged: false,
        iterations: max_iter,
    }
}

/// Inverse iteration for the smallest eigenpair of `K φ = λ B φ`
///
/// `K` is factored once on construction and the factor is reused for every
/// solve, including successive modes.
pub struct GeneralizedEigenSolver<'a> {
    k: &'a Matrix,
    b: &'a Matrix,
    factor: Matrix,
}

impl<'a> GeneralizedEigenSolver<'a> {
    /// # Panics
    /// If `k` is not square and symmetric, or `b` has a different shape.
    pub fn new(k: &'a Matrix, b: &'a Matrix) -> Self {
        assert!(
            k.rows() == b.rows() && k.cols() == b.cols(),
            "generalized eigenproblem needs equally sized K and B"
        );
        Self {
            k,
            b,
            factor: k.cholesky(),
        }
    }

    pub fn size(&self) -> usize {
        self.k.rows()
    }

    /// Iterate `K u = B v` from `start`
    ///
    /// Every iterate is B-orthogonalised against `locked` (B-normalised
    /// eigenvectors found earlier), which deflates those modes so the
    /// iteration settles on the next one.
    pub fn solve(
        &self,
        start: Vec<f64>,
        settings: &InverseIterationSettings,
        locked: &[Vec<f64>],
    ) -> EigenResult {
        let mut v = start;
        self.deflate(&mut v, locked);
        self.normalize(&mut v, settings.normalization);

        // Estimate of 1/λ
        let mut mu = 0.0;

        for iter in 0..settings.max_iterations {
            let bv = self.b.multiply_vector(&v);
            let mut u = solve_with_factor(&self.factor, &bv);
            self.deflate(&mut u, locked);

            // Rayleigh quotient of the inverse problem: uᵀBu / uᵀKu
            let u_b_u = dot(&u, &self.b.multiply_vector(&u));
            let u_k_u = dot(&u, &self.k.multiply_vector(&u));
            if u_k_u.abs() < MIN_PIVOT || u_b_u.abs() < MIN_PIVOT * u_k_u.abs() {
                // Iterate has no component the B operator can see
                return EigenResult {
                    eigenvalue: f64::INFINITY,
                    eigenvector: v,
                    converged: false,
                    iterations: iter + 1,
                };
            }
            let mu_new = u_b_u / u_k_u;

            v = u;
            self.normalize(&mut v, settings.normalization);

            if iter > 0 && (mu_new - mu).abs() <= settings.tolerance * mu_new.abs() {
                return EigenResult {
                    eigenvalue: 1.0 / mu_new,
                    eigenvector: v,
                    converged: true,
                    iterations: iter + 1,
                };
            }
            mu = mu_new;
        }

        EigenResult {
            eigenvalue: if mu.abs() > 0.0 { 1.0 / mu } else { f64::INFINITY },
            eigenvector: v,
            converged: false,
            iterations: settings.max_iterations,
        }
    }

    fn deflate(&self, u: &mut [f64], locked: &[Vec<f64>]) {
        for phi in locked {
            let coeff = dot(phi, &self.b.multiply_vector(u));
            u.iter_mut().zip(phi).for_each(|(x, p)| *x -= coeff * p);
        }
    }

    fn normalize(&self, v: &mut [f64], normalization: Normalization) {
        let len = match normalization {
            Normalization::Euclidean => norm(v),
            Normalization::BNorm => dot(v, &self.b.multiply_vector(v)).max(0.0).sqrt(),
        };
        let len = len.max(MIN_PIVOT);
        v.iter_mut().for_each(|x| *x /= len);
    }
}
