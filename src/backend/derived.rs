//! Generic implementations of derived matrix operations.
//!
//! These are the default bodies behind [`DerivedOps`]. They only talk to a
//! backend through its primitives (and through other derived operations, so
//! a backend override is picked up by everything composed on top of it).
//!
//! ```text
//! derived::create_random_uniform_with()
//!     └── DerivedOps::create_from_fn()       (default: derived::create_from_fn)
//!             ├── MatrixBackend::create()
//!             └── MatrixBackend::set()
//! ```

use std::ops::Range;

use rand::{Rng, RngCore};

use super::DerivedOps;
use crate::error::{Error, Result};

/// `(rows, cols)` via `row_count` and `col_count`
pub fn shape<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Result<(usize, usize)> {
    Ok((backend.row_count(m)?, backend.col_count(m)?))
}

/// Build a matrix with `create` and fill each cell with `f(i, j)` via `set`
pub fn create_from_fn<B: DerivedOps + ?Sized>(
    backend: &B,
    rows: usize,
    cols: usize,
    f: &mut dyn FnMut(usize, usize) -> f64,
) -> Result<B::Matrix> {
    let mut m = backend.create(rows, cols, 0.0)?;
    for i in 0..rows {
        for j in 0..cols {
            backend.set(&mut m, i, j, f(i, j))?;
        }
    }
    Ok(m)
}

/// Build a matrix from row vectors
///
/// An empty slice gives a `0 x 0` matrix. Rows of different lengths are
/// rejected with `InvalidArgument`.
pub fn create_from_rows<B: DerivedOps + ?Sized>(
    backend: &B,
    rows: &[Vec<f64>],
) -> Result<B::Matrix> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(Error::invalid_argument(
            "rows",
            format!(
                "row {} has {} elements, expected {} like row 0",
                i,
                row.len(),
                ncols
            ),
        ));
    }
    backend.create_from_fn(rows.len(), ncols, &mut |i, j| rows[i][j])
}

/// Identity matrix as a diagonal of ones
pub fn create_identity<B: DerivedOps + ?Sized>(backend: &B, n: usize) -> Result<B::Matrix> {
    backend.create_diagonal(&vec![1.0; n])
}

/// Zero matrix with `values` written onto the diagonal
pub fn create_diagonal<B: DerivedOps + ?Sized>(backend: &B, values: &[f64]) -> Result<B::Matrix> {
    let n = values.len();
    let mut m = backend.create(n, n, 0.0)?;
    for (i, &v) in values.iter().enumerate() {
        backend.set(&mut m, i, i, v)?;
    }
    Ok(m)
}

/// Uniform random matrix drawn from the thread-local RNG
pub fn create_random_uniform<B: DerivedOps + ?Sized>(
    backend: &B,
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
) -> Result<B::Matrix> {
    let mut rng = rand::rng();
    backend.create_random_uniform_with(rows, cols, min, max, &mut rng)
}

/// Uniform random matrix, one sample from `[min, max]` per cell
pub fn create_random_uniform_with<B: DerivedOps + ?Sized>(
    backend: &B,
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
    rng: &mut dyn RngCore,
) -> Result<B::Matrix> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(Error::invalid_argument(
            "min/max",
            format!("expected finite bounds with min <= max, got [{}, {}]", min, max),
        ));
    }
    backend.create_from_fn(rows, cols, &mut |_, _| rng.random_range(min..=max))
}

/// The first `min(rows, cols)` diagonal elements
pub fn diagonal_elements<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Result<Vec<f64>> {
    let (rows, cols) = backend.shape(m)?;
    (0..rows.min(cols)).map(|i| backend.get(m, i, i)).collect()
}

/// Sum of `diagonal_elements`
pub fn trace<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Result<f64> {
    Ok(backend.diagonal_elements(m)?.iter().sum())
}

/// Copy of a rectangular block, indices offset by the range starts
///
/// Ranges are half-open. Reversed ranges or ranges reaching past the matrix
/// are rejected with `IndexOutOfBounds`; empty ranges give an empty matrix.
pub fn submatrix<B: DerivedOps + ?Sized>(
    backend: &B,
    m: &B::Matrix,
    rows: Range<usize>,
    cols: Range<usize>,
) -> Result<B::Matrix> {
    let shape = backend.shape(m)?;
    if rows.start > rows.end || rows.end > shape.0 || cols.start > cols.end || cols.end > shape.1 {
        return Err(Error::index_out_of_bounds((rows.end, cols.end), shape));
    }

    // Read first so a failing `get` surfaces before anything is built.
    let mut values = Vec::with_capacity(rows.len() * cols.len());
    for i in rows.clone() {
        for j in cols.clone() {
            values.push(backend.get(m, i, j)?);
        }
    }
    let ncols = cols.len();
    backend.create_from_fn(rows.len(), ncols, &mut |i, j| values[i * ncols + j])
}

/// Row vectors of the matrix
pub fn as_rows<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Result<Vec<Vec<f64>>> {
    let (rows, cols) = backend.shape(m)?;
    (0..rows)
        .map(|i| (0..cols).map(|j| backend.get(m, i, j)).collect())
        .collect()
}

/// Column vectors of the matrix
pub fn as_columns<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Result<Vec<Vec<f64>>> {
    let (rows, cols) = backend.shape(m)?;
    (0..cols)
        .map(|j| (0..rows).map(|i| backend.get(m, i, j)).collect())
        .collect()
}
