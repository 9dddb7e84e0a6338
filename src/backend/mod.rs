//! Matrix backends for the MDS engine
//!
//! A backend owns the matrix representation and supplies the numeric
//! primitives the algorithms cannot provide themselves. Everything else is
//! built on top of those primitives.
//!
//! # Architecture
//!
//! ```text
//! MatrixBackend (primitives: create, get/set, matmul, add, transpose, eigendecompose, ...)
//! └── DerivedOps (identity, diagonal, submatrix, trace, rows/columns, ...)
//!         └── default bodies delegate to derived::*, written only against MatrixBackend
//! ```
//!
//! A minimal backend implements the primitives and opts into the derived
//! layer with an empty `impl DerivedOps for MyBackend {}`. Backends that can
//! do better override individual derived operations.

pub mod cpu;
pub mod derived;
pub mod registry;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use rand::RngCore;

use crate::algorithm::decompositions::EigenDecomposition;
use crate::error::{Error, Result};

pub use cpu::{CpuBackend, DenseMatrix, JacobiConfig};
pub use registry::{BackendRegistry, PREFERRED_BACKEND_ORDER, ScopedBackend, push_scoped};

/// A backend shared through the registry
pub type SharedBackend<M> = Arc<dyn DerivedOps<Matrix = M>>;

/// Bounds every backend matrix type satisfies
pub trait MatrixValue: Clone + fmt::Debug + Send + Sync + 'static {}

impl<T: Clone + fmt::Debug + Send + Sync + 'static> MatrixValue for T {}

/// Numeric primitives every backend must supply
///
/// Each method has a default body that fails with [`Error::NotImplemented`],
/// so a backend that leaves one out is detected when the operation is used
/// instead of producing wrong numbers.
///
/// Matrices are dense, real-valued and indexed from zero. Arithmetic returns
/// new matrices; only [`set`](MatrixBackend::set) mutates one in place.
pub trait MatrixBackend: Send + Sync + 'static {
    /// Matrix representation owned by this backend
    type Matrix: MatrixValue;

    /// Unique, human-readable name of this backend
    fn name(&self) -> &'static str;

    /// Create a `rows x cols` matrix with every element equal to `value`
    fn create(&self, rows: usize, cols: usize, value: f64) -> Result<Self::Matrix> {
        let _ = (rows, cols, value);
        Err(Error::not_implemented(self.name(), "create"))
    }

    /// Number of rows
    fn row_count(&self, m: &Self::Matrix) -> Result<usize> {
        let _ = m;
        Err(Error::not_implemented(self.name(), "row_count"))
    }

    /// Number of columns
    fn col_count(&self, m: &Self::Matrix) -> Result<usize> {
        let _ = m;
        Err(Error::not_implemented(self.name(), "col_count"))
    }

    /// Read element `(i, j)`
    ///
    /// Returns `Error::IndexOutOfBounds` outside the matrix.
    fn get(&self, m: &Self::Matrix, i: usize, j: usize) -> Result<f64> {
        let _ = (m, i, j);
        Err(Error::not_implemented(self.name(), "get"))
    }

    /// Write element `(i, j)`
    ///
    /// Returns `Error::IndexOutOfBounds` outside the matrix.
    fn set(&self, m: &mut Self::Matrix, i: usize, j: usize, value: f64) -> Result<()> {
        let _ = (m, i, j, value);
        Err(Error::not_implemented(self.name(), "set"))
    }

    /// Matrix product: `[p, q] @ [q, r] -> [p, r]`
    ///
    /// Returns `Error::MatmulShapeMismatch` when the inner dimensions differ.
    fn matmul(&self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix> {
        let _ = (a, b);
        Err(Error::not_implemented(self.name(), "matmul"))
    }

    /// Multiply every element by `scalar`
    fn mul_scalar(&self, a: &Self::Matrix, scalar: f64) -> Result<Self::Matrix> {
        let _ = (a, scalar);
        Err(Error::not_implemented(self.name(), "mul_scalar"))
    }

    /// Elementwise sum; shapes must be identical
    fn add(&self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix> {
        let _ = (a, b);
        Err(Error::not_implemented(self.name(), "add"))
    }

    /// Elementwise difference; shapes must be identical
    fn subtract(&self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix> {
        let _ = (a, b);
        Err(Error::not_implemented(self.name(), "subtract"))
    }

    /// Transpose: `[p, q] -> [q, p]`
    fn transpose(&self, a: &Self::Matrix) -> Result<Self::Matrix> {
        let _ = a;
        Err(Error::not_implemented(self.name(), "transpose"))
    }

    /// Eigendecomposition of a real symmetric matrix
    ///
    /// The result must satisfy the contract documented on
    /// [`EigenDecomposition`]: eigenvalues on the diagonal sorted
    /// non-increasing, orthonormal eigenvector columns in matching order.
    /// Behaviour for non-symmetric input is left to the backend.
    fn eigendecompose(&self, a: &Self::Matrix) -> Result<EigenDecomposition<Self::Matrix>> {
        let _ = a;
        Err(Error::not_implemented(self.name(), "eigendecompose"))
    }
}

/// Convenience operations derived from [`MatrixBackend`] primitives
///
/// All methods have defaults in [`derived`]; override any of them when the
/// backend has a faster or more accurate route. Overrides must keep the
/// documented behaviour.
pub trait DerivedOps: MatrixBackend {
    /// `(rows, cols)` of a matrix
    fn shape(&self, m: &Self::Matrix) -> Result<(usize, usize)> {
        derived::shape(self, m)
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell
    fn create_from_fn(
        &self,
        rows: usize,
        cols: usize,
        f: &mut dyn FnMut(usize, usize) -> f64,
    ) -> Result<Self::Matrix> {
        derived::create_from_fn(self, rows, cols, f)
    }

    /// Build a matrix from row vectors of equal length
    fn create_from_rows(&self, rows: &[Vec<f64>]) -> Result<Self::Matrix> {
        derived::create_from_rows(self, rows)
    }

    /// `n x n` identity matrix
    fn create_identity(&self, n: usize) -> Result<Self::Matrix> {
        derived::create_identity(self, n)
    }

    /// Square diagonal matrix with `values` on the diagonal
    fn create_diagonal(&self, values: &[f64]) -> Result<Self::Matrix> {
        derived::create_diagonal(self, values)
    }

    /// Matrix of independent samples from `U[min, max]`, using the thread RNG
    fn create_random_uniform(
        &self,
        rows: usize,
        cols: usize,
        min: f64,
        max: f64,
    ) -> Result<Self::Matrix> {
        derived::create_random_uniform(self, rows, cols, min, max)
    }

    /// Matrix of independent samples from `U[min, max]` drawn from `rng`
    fn create_random_uniform_with(
        &self,
        rows: usize,
        cols: usize,
        min: f64,
        max: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self::Matrix> {
        derived::create_random_uniform_with(self, rows, cols, min, max, rng)
    }

    /// The first `min(rows, cols)` diagonal elements
    fn diagonal_elements(&self, m: &Self::Matrix) -> Result<Vec<f64>> {
        derived::diagonal_elements(self, m)
    }

    /// Sum of the diagonal elements
    fn trace(&self, m: &Self::Matrix) -> Result<f64> {
        derived::trace(self, m)
    }

    /// Copy of the block `rows x cols` (half-open ranges)
    fn submatrix(
        &self,
        m: &Self::Matrix,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<Self::Matrix> {
        derived::submatrix(self, m, rows, cols)
    }

    /// Materialize the matrix as row vectors
    fn as_rows(&self, m: &Self::Matrix) -> Result<Vec<Vec<f64>>> {
        derived::as_rows(self, m)
    }

    /// Materialize the matrix as column vectors
    fn as_columns(&self, m: &Self::Matrix) -> Result<Vec<Vec<f64>>> {
        derived::as_columns(self, m)
    }
}
