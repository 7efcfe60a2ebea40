//! Dense row-major matrix with a tolerant Cholesky solver
//!
//! Global systems for profile models are small (a few hundred DOFs at most),
//! so the kernel keeps everything dense. The factorisation is forgiving:
//! round-off residues on the diagonal are clamped to zero and near-zero
//! pivots produce zero instead of a division. The penalty boundary
//! conditions of the eigen-analyses rely on this.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::eigen::{self, EigenResult};

/// Pivot magnitude below which a substitution step yields zero
pub const MIN_PIVOT: f64 = 1e-15;

/// Relative asymmetry tolerated by `cholesky`/`solve`
const SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Dense matrix stored row by row
///
/// Value semantics: every operation except [`Matrix::set`] returns a new
/// matrix and no two matrices share storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a rows x cols matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create the n x n identity
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build from row-major data
    pub fn from_row_slice(rows: usize, cols: usize, data: &[f64]) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "row-major data has {} entries, expected {}x{}",
            data.len(),
            rows,
            cols
        );
        Self {
            rows,
            cols,
            data: data.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major view of the entries
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Accumulate into an entry (assembly helper)
    #[inline]
    pub fn add_to(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] += value;
    }

    /// Entry-wise sum
    pub fn add(&self, other: &Matrix) -> Matrix {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "cannot add {}x{} and {}x{} matrices",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    pub fn scale(&self, s: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|a| a * s).collect(),
        }
    }

    /// Matrix product self * other
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "cannot multiply {}x{} by {}x{}",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut result = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a_ik = self.get(i, k);
                if a_ik == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    result.add_to(i, j, a_ik * other.get(k, j));
                }
            }
        }
        result
    }

    /// Matrix-vector product self * v
    pub fn multiply_vector(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(
            self.cols,
            v.len(),
            "cannot multiply {}x{} matrix by vector of length {}",
            self.rows,
            self.cols,
            v.len()
        );
        (0..self.rows)
            .map(|i| {
                let row = &self.data[i * self.cols..(i + 1) * self.cols];
                row.iter().zip(v).map(|(a, b)| a * b).sum()
            })
            .collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.set(j, i, self.get(i, j));
            }
        }
        result
    }

    /// Frobenius norm
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|a| a * a).sum::<f64>().sqrt()
    }

    /// Check symmetry entry by entry
    ///
    /// Each pair `(a_ij, a_ji)` is compared relative to the larger of the
    /// pair and `sqrt(|a_ii a_jj|)`, so a penalty diagonal elsewhere in the
    /// matrix does not loosen the check on the free rows.
    pub fn is_symmetric(&self, rel_tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                let (a_ij, a_ji) = (self.get(i, j), self.get(j, i));
                let scale = a_ij
                    .abs()
                    .max(a_ji.abs())
                    .max((self.get(i, i) * self.get(j, j)).abs().sqrt())
                    .max(MIN_PIVOT);
                if (a_ij - a_ji).abs() > rel_tol * scale {
                    return false;
                }
            }
        }
        true
    }

    fn assert_symmetric_square(&self, op: &str) {
        assert!(
            self.is_square(),
            "{} requires a square matrix, got {}x{}",
            op,
            self.rows,
            self.cols
        );
        assert!(
            self.is_symmetric(SYMMETRY_TOLERANCE),
            "{} requires a symmetric matrix",
            op
        );
    }

    /// Lower-triangular Cholesky factor L with A = L * L^T
    ///
    /// Negative diagonal residues are clamped to zero before the square
    /// root, so positive semi-definite input yields a (singular) factor
    /// instead of NaNs.
    ///
    /// # Panics
    /// If the matrix is not square and symmetric.
    pub fn cholesky(&self) -> Matrix {
        self.assert_symmetric_square("cholesky");
        let n = self.rows;
        let mut l = Matrix::zeros(n, n);

        for i in 0..n {
            for j in 0..=i {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l.get(i, k) * l.get(j, k);
                }

                if i == j {
                    l.set(i, i, (self.get(i, i) - sum).max(0.0).sqrt());
                } else {
                    let l_jj = l.get(j, j);
                    let value = if l_jj.abs() < MIN_PIVOT {
                        0.0
                    } else {
                        (self.get(i, j) - sum) / l_jj
                    };
                    l.set(i, j, value);
                }
            }
        }

        l
    }

    /// Solve A * x = b through the Cholesky factor
    ///
    /// # Panics
    /// If the matrix is not square and symmetric or `b` has the wrong length.
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        assert_eq!(
            b.len(),
            self.rows,
            "right-hand side has length {}, expected {}",
            b.len(),
            self.rows
        );
        let l = self.cholesky();
        solve_with_factor(&l, b)
    }

    /// Dominant eigenvalue by power iteration (100 iterations, tol 1e-10)
    pub fn dominant_eigenvalue(&self) -> EigenResult {
        eigen::power_iteration(self, eigen::POWER_MAX_ITER, eigen::POWER_TOLERANCE)
    }

    /// Power iteration with explicit caps
    pub fn dominant_eigenvalue_with(&self, max_iter: usize, tol: f64) -> EigenResult {
        eigen::power_iteration(self, max_iter, tol)
    }
}

/// Forward/back substitution through a precomputed lower factor
///
/// Lets the eigen-iterations factor the stiffness once and reuse it.
pub fn solve_with_factor(l: &Matrix, b: &[f64]) -> Vec<f64> {
    let n = l.rows();

    // Forward substitution: L * y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l.get(i, j) * y[j];
        }
        let l_ii = l.get(i, i);
        y[i] = if l_ii.abs() < MIN_PIVOT { 0.0 } else { sum / l_ii };
    }

    // Backward substitution: L^T * x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l.get(j, i) * x[j];
        }
        let l_ii = l.get(i, i);
        x[i] = if l_ii.abs() < MIN_PIVOT { 0.0 } else { sum / l_ii };
    }

    x
}

impl From<&DMatrix<f64>> for Matrix {
    fn from(m: &DMatrix<f64>) -> Self {
        let mut result = Matrix::zeros(m.nrows(), m.ncols());
        for i in 0..m.nrows() {
            for j in 0..m.ncols() {
                result.set(i, j, m[(i, j)]);
            }
        }
        result
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(m: &Matrix) -> Self {
        DMatrix::from_row_slice(m.rows, m.cols, &m.data)
    }
}
