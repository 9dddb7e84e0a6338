//! Classical (metric) multidimensional scaling
//!
//! Recovers Cartesian coordinates from a matrix of squared Euclidean
//! distances analytically, without iterative optimisation:
//!
//! ```text
//! D (squared distances, n x n)
//! └── double_center            B = -1/2 J D J^T,  J = I - (1/n) 1 1^T
//!     └── eigendecompose       B = V Λ V^T        (backend)
//!         ├── select_dimensionality   (variance-ratio entry point only)
//!         └── project_eigenpairs      X = V[:, :k] sqrt(Λ[:k, :k])
//! ```
//!
//! The quality of the result depends on the backend's eigensolver; the
//! algorithms here only rely on the ordering and orthonormality contract of
//! [`EigenDecomposition`].

use tracing::debug;

use super::decompositions::EigenDecomposition;
use crate::backend::DerivedOps;
use crate::error::{Error, Result};

/// Turn a squared-distance matrix into the equivalent scalar-product matrix
///
/// `B = -0.5 * J @ D @ J^T` with the centering matrix `J = I - (1/n) ones(n, n)`.
/// Whenever `D` holds squared distances of points in some Euclidean space,
/// `B` is the Gram matrix of those points after moving their centroid to the
/// origin.
///
/// Returns `InvalidArgument` if `d` is not square.
pub fn double_center<B: DerivedOps + ?Sized>(backend: &B, d: &B::Matrix) -> Result<B::Matrix> {
    let (rows, cols) = backend.shape(d)?;
    if rows != cols {
        return Err(Error::invalid_argument(
            "d",
            format!("distance matrix must be square, got {}x{}", rows, cols),
        ));
    }
    let n = rows;
    if n == 0 {
        return backend.create(0, 0, 0.0);
    }

    let ones = backend.create(n, 1, 1.0)?;
    let weights = backend.create(1, n, 1.0 / n as f64)?;
    let j = backend.subtract(&backend.create_identity(n)?, &backend.matmul(&ones, &weights)?)?;
    let jt = backend.transpose(&j)?;

    let jdj = backend.matmul(&backend.matmul(&j, d)?, &jt)?;
    backend.mul_scalar(&jdj, -0.5)
}

/// Number of leading eigenvalues needed to retain a fraction `k` of the total
///
/// `eigenvalues` must be sorted non-increasing. Eigenvalues are accumulated
/// in order while all of these hold:
///
/// - not every eigenvalue has been taken yet
/// - the next eigenvalue is strictly positive
/// - `accumulated / total < k`, where `total` is the sum of **all**
///   eigenvalues, including non-positive ones
///
/// Because negative eigenvalues shrink `total`, the ratio can pass `k` before
/// every positive eigenvalue is taken, or never reach it. Both outcomes are
/// returned as they fall out of the rule. `k <= 0` or a non-positive leading
/// eigenvalue gives 0.
pub fn select_dimensionality(eigenvalues: &[f64], k: f64) -> usize {
    let total: f64 = eigenvalues.iter().sum();
    let mut accumulated = 0.0;
    let mut dims = 0;
    while dims < eigenvalues.len() && eigenvalues[dims] > 0.0 && accumulated / total < k {
        accumulated += eigenvalues[dims];
        dims += 1;
    }
    dims
}

/// Project onto the leading `dims` eigenpairs
///
/// Takes the first `dims` columns of V and the top-left `dims x dims` block
/// of Λ. Each retained eigenvalue λ > 0 is replaced by `sqrt(λ)`; λ <= 0 is
/// kept as stored rather than producing an imaginary axis. Returns the
/// `[n, dims]` matrix `V[:, :dims] @ Λ'`.
///
/// `dims` is not checked against `n`: the backend's `submatrix` reports the
/// out-of-range block.
pub fn project_eigenpairs<B: DerivedOps + ?Sized>(
    backend: &B,
    eig: &EigenDecomposition<B::Matrix>,
    dims: usize,
) -> Result<B::Matrix> {
    let n = backend.row_count(&eig.eigenvectors)?;
    let vectors = backend.submatrix(&eig.eigenvectors, 0..n, 0..dims)?;
    let mut scale = backend.submatrix(&eig.eigenvalues, 0..dims, 0..dims)?;

    for i in 0..dims {
        let lambda = backend.get(&scale, i, i)?;
        if lambda > 0.0 {
            backend.set(&mut scale, i, i, lambda.sqrt())?;
        }
    }

    backend.matmul(&vectors, &scale)
}

/// Embed squared distances `d` in exactly `dims` dimensions
///
/// Returns an `[n, dims]` coordinate matrix whose pairwise squared distances
/// approximate `d`. Coordinates are defined up to rotation and reflection.
///
/// # Example
///
/// ```
/// use mdsr::prelude::*;
/// use mdsr::algorithm::{project_to_dimension, squared_distances};
///
/// let backend = CpuBackend::new();
/// let d = backend.create_from_rows(&[
///     vec![0.0, 10.0, 2.0],
///     vec![10.0, 0.0, 20.0],
///     vec![2.0, 20.0, 0.0],
/// ])?;
/// let x = project_to_dimension(&backend, &d, 2)?;
/// let dd = squared_distances(&backend, &x)?;
/// assert!((backend.get(&dd, 1, 2)? - 20.0).abs() < 1e-9);
/// # Ok::<(), mdsr::error::Error>(())
/// ```
pub fn project_to_dimension<B: DerivedOps + ?Sized>(
    backend: &B,
    d: &B::Matrix,
    dims: usize,
) -> Result<B::Matrix> {
    let b = double_center(backend, d)?;
    let eig = backend.eigendecompose(&b)?;
    project_eigenpairs(backend, &eig, dims)
}

/// Embed squared distances `d`, keeping a fraction `k` of their variance
///
/// The dimensionality is chosen by [`select_dimensionality`] on the
/// eigenvalues of the double-centered matrix. If no eigenvalue is positive
/// the result is an `[n, 0]` matrix.
///
/// Returns `InvalidArgument` unless `0 < k <= 1`.
pub fn project_to_variance_ratio<B: DerivedOps + ?Sized>(
    backend: &B,
    d: &B::Matrix,
    k: f64,
) -> Result<B::Matrix> {
    validate_variance_ratio(k)?;
    let b = double_center(backend, d)?;
    let eig = backend.eigendecompose(&b)?;
    let dims = select_dimensionality(&backend.diagonal_elements(&eig.eigenvalues)?, k);
    debug!(k, dims, "selected embedding dimensionality");
    project_eigenpairs(backend, &eig, dims)
}

/// Dimensionality that [`project_to_variance_ratio`] would choose for `d` and `k`
pub fn variance_ratio_dimensions<B: DerivedOps + ?Sized>(
    backend: &B,
    d: &B::Matrix,
    k: f64,
) -> Result<usize> {
    validate_variance_ratio(k)?;
    let b = double_center(backend, d)?;
    let eig = backend.eigendecompose(&b)?;
    Ok(select_dimensionality(
        &backend.diagonal_elements(&eig.eigenvalues)?,
        k,
    ))
}

fn validate_variance_ratio(k: f64) -> Result<()> {
    if !(k > 0.0 && k <= 1.0) {
        return Err(Error::invalid_argument(
            "k",
            format!("variance ratio must lie in (0, 1], got {}", k),
        ));
    }
    Ok(())
}
