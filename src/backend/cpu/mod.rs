//! Pure-Rust CPU backend
//!
//! Stores matrices as [`DenseMatrix`] and solves symmetric eigenproblems with
//! cyclic Jacobi rotations. Matrix products run on Rayon when the `rayon`
//! feature is enabled and the product is large enough to pay for it.

mod jacobi;
mod kernels;
mod matrix;

pub use jacobi::JacobiConfig;
pub use matrix::DenseMatrix;

use std::ops::Range;

use super::{DerivedOps, MatrixBackend};
use crate::algorithm::decompositions::EigenDecomposition;
use crate::error::{Error, Result};

/// Pure-Rust dense backend
///
/// Stateless apart from its eigensolver settings; cheap to copy and safe to
/// share between threads.
///
/// # Example
///
/// ```
/// use mdsr::prelude::*;
///
/// let backend = CpuBackend::new();
/// let a = backend.create_from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]])?;
/// let eig = backend.eigendecompose(&a)?;
/// assert!((backend.get(&eig.eigenvalues, 0, 0)? - 3.0).abs() < 1e-12);
/// # Ok::<(), mdsr::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuBackend {
    config: JacobiConfig,
}

impl CpuBackend {
    /// Name under which the backend registers
    pub const NAME: &'static str = "cpu";

    /// Backend with the default eigensolver settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with custom eigensolver settings
    pub fn with_config(config: JacobiConfig) -> Self {
        Self { config }
    }

    /// Eigensolver settings in use
    pub fn config(&self) -> &JacobiConfig {
        &self.config
    }

    fn ensure_same_shape(a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        if a.shape() != b.shape() {
            return Err(Error::shape_mismatch(a.shape(), b.shape()));
        }
        Ok(())
    }
}

impl MatrixBackend for CpuBackend {
    type Matrix = DenseMatrix;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create(&self, rows: usize, cols: usize, value: f64) -> Result<DenseMatrix> {
        Ok(DenseMatrix::filled(rows, cols, value))
    }

    fn row_count(&self, m: &DenseMatrix) -> Result<usize> {
        Ok(m.rows())
    }

    fn col_count(&self, m: &DenseMatrix) -> Result<usize> {
        Ok(m.cols())
    }

    fn get(&self, m: &DenseMatrix, i: usize, j: usize) -> Result<f64> {
        Ok(m.as_slice()[m.offset(i, j)?])
    }

    fn set(&self, m: &mut DenseMatrix, i: usize, j: usize, value: f64) -> Result<()> {
        let idx = m.offset(i, j)?;
        m.as_mut_slice()[idx] = value;
        Ok(())
    }

    fn matmul(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        if a.cols() != b.rows() {
            return Err(Error::matmul_mismatch(a.shape(), b.shape()));
        }
        let mut out = DenseMatrix::zeros(a.rows(), b.cols());
        kernels::matmul(
            a.as_slice(),
            b.as_slice(),
            out.as_mut_slice(),
            a.rows(),
            a.cols(),
            b.cols(),
        );
        Ok(out)
    }

    fn mul_scalar(&self, a: &DenseMatrix, scalar: f64) -> Result<DenseMatrix> {
        let data = a.as_slice().iter().map(|&x| x * scalar).collect();
        DenseMatrix::from_vec(a.rows(), a.cols(), data)
    }

    fn add(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        Self::ensure_same_shape(a, b)?;
        let data = kernels::binary(a.as_slice(), b.as_slice(), |x, y| x + y);
        DenseMatrix::from_vec(a.rows(), a.cols(), data)
    }

    fn subtract(&self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        Self::ensure_same_shape(a, b)?;
        let data = kernels::binary(a.as_slice(), b.as_slice(), |x, y| x - y);
        DenseMatrix::from_vec(a.rows(), a.cols(), data)
    }

    fn transpose(&self, a: &DenseMatrix) -> Result<DenseMatrix> {
        let mut out = DenseMatrix::zeros(a.cols(), a.rows());
        kernels::transpose(a.as_slice(), out.as_mut_slice(), a.rows(), a.cols());
        Ok(out)
    }

    fn eigendecompose(&self, a: &DenseMatrix) -> Result<EigenDecomposition<DenseMatrix>> {
        let (rows, cols) = a.shape();
        if rows != cols {
            return Err(Error::invalid_argument(
                "a",
                format!("eigendecompose expects a square matrix, got {}x{}", rows, cols),
            ));
        }
        let eig = jacobi::eig_symmetric(a.as_slice(), rows, &self.config);
        Ok(EigenDecomposition {
            eigenvalues: self.create_diagonal(&eig.values)?,
            eigenvectors: DenseMatrix::from_vec(rows, rows, eig.vectors)?,
        })
    }
}

impl DerivedOps for CpuBackend {
    fn shape(&self, m: &DenseMatrix) -> Result<(usize, usize)> {
        Ok(m.shape())
    }

    fn create_from_fn(
        &self,
        rows: usize,
        cols: usize,
        f: &mut dyn FnMut(usize, usize) -> f64,
    ) -> Result<DenseMatrix> {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        DenseMatrix::from_vec(rows, cols, data)
    }

    fn diagonal_elements(&self, m: &DenseMatrix) -> Result<Vec<f64>> {
        let n = m.rows().min(m.cols());
        Ok((0..n).map(|i| m.as_slice()[i * m.cols() + i]).collect())
    }

    fn submatrix(
        &self,
        m: &DenseMatrix,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<DenseMatrix> {
        if rows.start > rows.end
            || rows.end > m.rows()
            || cols.start > cols.end
            || cols.end > m.cols()
        {
            return Err(Error::index_out_of_bounds((rows.end, cols.end), m.shape()));
        }
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for i in rows.clone() {
            data.extend_from_slice(&m.row(i)[cols.clone()]);
        }
        DenseMatrix::from_vec(rows.len(), cols.len(), data)
    }
}
