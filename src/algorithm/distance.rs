//! Squared Euclidean distances between observations

use crate::backend::DerivedOps;
use crate::error::Result;

/// Pairwise squared Euclidean distances between the rows of `x`
///
/// For an `[n, d]` observation matrix returns the `[n, n]` matrix
/// `D[i, j] = ||x_i||² + ||x_j||² - 2 x_i·x_j`, composed entirely from
/// backend primitives:
///
/// ```text
/// G = X @ X^T                     Gram matrix
/// c = diag(G) as an [n, 1] column
/// D = c @ 1 + (c @ 1)^T - 2 G     1 is a [1, n] row of ones
/// ```
///
/// The result is symmetric by construction; its diagonal is zero up to
/// rounding.
///
/// # Example
///
/// ```
/// use mdsr::prelude::*;
/// use mdsr::algorithm::squared_distances;
///
/// let backend = CpuBackend::new();
/// let x = backend.create_from_rows(&[vec![1.0, 2.0], vec![4.0, 3.0], vec![0.0, 1.0]])?;
/// let d = squared_distances(&backend, &x)?;
/// assert_eq!(backend.as_rows(&d)?[0], vec![0.0, 10.0, 2.0]);
/// # Ok::<(), mdsr::error::Error>(())
/// ```
pub fn squared_distances<B: DerivedOps + ?Sized>(backend: &B, x: &B::Matrix) -> Result<B::Matrix> {
    let xt = backend.transpose(x)?;
    let gram = backend.matmul(x, &xt)?;
    let n = backend.row_count(&gram)?;

    let norms = backend.diagonal_elements(&gram)?;
    let c = backend.create_from_fn(n, 1, &mut |i, _| norms[i])?;
    let ones = backend.create(1, n, 1.0)?;

    let row_norms = backend.matmul(&c, &ones)?;
    let col_norms = backend.transpose(&row_norms)?;
    let cross = backend.mul_scalar(&gram, 2.0)?;

    backend.subtract(&backend.add(&row_norms, &col_norms)?, &cross)
}
