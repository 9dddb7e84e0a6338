//! Reusable conformance checks for backend implementations
//!
//! A new backend can prove it honours the [`MatrixBackend`](crate::backend::MatrixBackend) and
//! [`DerivedOps`] contracts by running these checks from its own tests:
//!
//! ```
//! use mdsr::prelude::*;
//! use mdsr::conformance;
//!
//! let backend = CpuBackend::new();
//! conformance::check_matrix_backend(&backend);
//! conformance::check_metric_projection(&backend);
//! ```
//!
//! Every check panics with the backend name and the failing operation, so
//! they are meant to be called from `#[test]` functions.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::algorithm::{project_to_dimension, project_to_variance_ratio, squared_distances};
use crate::backend::DerivedOps;
use crate::error::Result;

/// Symmetric fixture with eigenvalues of both signs
const EIGEN_FIXTURE: [[f64; 3]; 3] = [[0.0, 10.0, 2.0], [10.0, 0.0, 20.0], [2.0, 20.0, 0.0]];

const EIGEN_FIXTURE_VALUES: [f64; 3] = [23.2051, -1.5954, -21.6097];

const EIGEN_FIXTURE_VECTORS: [[f64; 3]; 3] = [
    [0.3529, 0.6934, 0.6281],
    [0.8948, -0.0541, -0.4430],
    [-0.2732, 0.7184, -0.6396],
];

/// Unwrap `result`, panicking with the backend and operation on error
fn ok<B: DerivedOps + ?Sized, T>(backend: &B, op: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("[{}] {} failed: {}", backend.name(), op, err),
    }
}

fn rows<B: DerivedOps + ?Sized>(backend: &B, data: &[&[f64]]) -> B::Matrix {
    let owned: Vec<Vec<f64>> = data.iter().map(|r| r.to_vec()).collect();
    ok(backend, "create_from_rows", backend.create_from_rows(&owned))
}

fn assert_matrix_close<B: DerivedOps + ?Sized>(
    backend: &B,
    op: &str,
    got: &B::Matrix,
    expected: &B::Matrix,
    atol: f64,
) {
    let got_shape = ok(backend, "shape", backend.shape(got));
    let expected_shape = ok(backend, "shape", backend.shape(expected));
    assert_eq!(
        got_shape,
        expected_shape,
        "[{}] {}: shape mismatch",
        backend.name(),
        op
    );

    let got = ok(backend, "as_rows", backend.as_rows(got));
    let expected = ok(backend, "as_rows", backend.as_rows(expected));
    for (i, (g, e)) in got.iter().zip(&expected).enumerate() {
        for (j, (x, y)) in g.iter().zip(e).enumerate() {
            assert!(
                (x - y).abs() <= atol,
                "[{}] {}: element ({}, {}) differs: {} vs {} (atol={})",
                backend.name(),
                op,
                i,
                j,
                x,
                y,
                atol
            );
        }
    }
}

fn dot_columns<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix, a: usize, b: usize) -> f64 {
    let n = ok(backend, "row_count", backend.row_count(m));
    let mut sum = 0.0;
    for i in 0..n {
        sum += ok(backend, "get", backend.get(m, i, a)) * ok(backend, "get", backend.get(m, i, b));
    }
    sum
}

/// Check every primitive and derived operation against fixed fixtures
///
/// Covers creation, element access, products, elementwise arithmetic,
/// transpose, diagonals, submatrix, trace, column extraction and the
/// eigendecomposition contract (ordering, orthonormality, orientation up to
/// sign).
pub fn check_matrix_backend<B: DerivedOps + ?Sized>(backend: &B) {
    check_creation(backend);
    check_element_access(backend);
    check_views(backend);
    check_arithmetic(backend);
    check_eigendecomposition(backend);
}

fn check_creation<B: DerivedOps + ?Sized>(backend: &B) {
    let m = ok(backend, "create", backend.create(2, 3, 0.0));
    assert_eq!(ok(backend, "row_count", backend.row_count(&m)), 2);
    assert_eq!(ok(backend, "col_count", backend.col_count(&m)), 3);
    for row in ok(backend, "as_rows", backend.as_rows(&m)) {
        assert!(row.iter().all(|&x| x == 0.0), "[{}] create", backend.name());
    }

    let identity = ok(backend, "create_identity", backend.create_identity(3));
    let diagonal = ok(backend, "create_diagonal", backend.create_diagonal(&[1.0, 1.0, 1.0]));
    assert_matrix_close(backend, "create_identity", &identity, &diagonal, 0.0);

    let diagonal = ok(backend, "create_diagonal", backend.create_diagonal(&[1.0, 2.0, 3.0]));
    let expected = rows(backend, &[&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0], &[0.0, 0.0, 3.0]]);
    assert_matrix_close(backend, "create_diagonal", &diagonal, &expected, 0.0);

    let block = ok(
        backend,
        "create_from_fn",
        backend.create_from_fn(2, 3, &mut |i, j| (i * 3 + j + 1) as f64),
    );
    let expected = rows(backend, &[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    assert_matrix_close(backend, "create_from_fn", &block, &expected, 0.0);

    let mut rng = StdRng::seed_from_u64(7);
    let random = ok(
        backend,
        "create_random_uniform_with",
        backend.create_random_uniform_with(4, 3, -2.0, 5.0, &mut rng),
    );
    for row in ok(backend, "as_rows", backend.as_rows(&random)) {
        assert!(
            row.iter().all(|x| (-2.0..=5.0).contains(x)),
            "[{}] create_random_uniform_with: sample outside range",
            backend.name()
        );
    }
}

fn check_element_access<B: DerivedOps + ?Sized>(backend: &B) {
    let mut a = ok(backend, "create", backend.create(2, 2, 1.0));
    for (i, j, v) in [(0, 0, 1.0), (0, 1, 2.0), (1, 0, 3.0), (1, 1, 4.0)] {
        ok(backend, "set", backend.set(&mut a, i, j, v));
    }
    for (i, j, v) in [(0, 0, 1.0), (0, 1, 2.0), (1, 0, 3.0), (1, 1, 4.0)] {
        assert_eq!(ok(backend, "get", backend.get(&a, i, j)), v);
    }
    assert!(
        backend.get(&a, 2, 0).is_err(),
        "[{}] get outside the matrix must fail",
        backend.name()
    );
}

fn check_views<B: DerivedOps + ?Sized>(backend: &B) {
    let a = rows(backend, &[&[2.0, 3.0, 4.0], &[1.0, 4.0, 3.0]]);

    let t = ok(backend, "transpose", backend.transpose(&a));
    let expected = rows(backend, &[&[2.0, 1.0], &[3.0, 4.0], &[4.0, 3.0]]);
    assert_matrix_close(backend, "transpose", &t, &expected, 0.0);

    assert_eq!(
        ok(backend, "diagonal_elements", backend.diagonal_elements(&a)),
        vec![2.0, 4.0]
    );

    let minor = ok(backend, "submatrix", backend.submatrix(&a, 0..2, 2..3));
    let expected = rows(backend, &[&[4.0], &[3.0]]);
    assert_matrix_close(backend, "submatrix", &minor, &expected, 0.0);

    assert_eq!(ok(backend, "trace", backend.trace(&a)), 6.0);
    assert_eq!(
        ok(backend, "as_columns", backend.as_columns(&a)),
        vec![vec![2.0, 1.0], vec![3.0, 4.0], vec![4.0, 3.0]]
    );
}

fn check_arithmetic<B: DerivedOps + ?Sized>(backend: &B) {
    let a = rows(backend, &[&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]]);

    let b = rows(backend, &[&[3.0, 1.0], &[1.0, 2.0], &[3.0, -4.0]]);
    let product = ok(backend, "matmul", backend.matmul(&a, &b));
    let expected = rows(backend, &[&[21.0, -8.0], &[14.0, -7.0]]);
    assert_matrix_close(backend, "matmul", &product, &expected, 1e-12);

    let scaled = ok(backend, "mul_scalar", backend.mul_scalar(&a, 2.0));
    let expected = rows(backend, &[&[4.0, 6.0, 8.0], &[2.0, 4.0, 6.0]]);
    assert_matrix_close(backend, "mul_scalar", &scaled, &expected, 1e-12);

    let b = rows(backend, &[&[1.0, 2.0, 3.0], &[0.0, 0.0, 2.0]]);
    let sum = ok(backend, "add", backend.add(&a, &b));
    let expected = rows(backend, &[&[3.0, 5.0, 7.0], &[1.0, 2.0, 5.0]]);
    assert_matrix_close(backend, "add", &sum, &expected, 1e-12);

    let b = rows(backend, &[&[1.0, 2.0, 2.0], &[0.0, 0.0, 2.0]]);
    let diff = ok(backend, "subtract", backend.subtract(&a, &b));
    let expected = rows(backend, &[&[1.0, 1.0, 2.0], &[1.0, 2.0, 1.0]]);
    assert_matrix_close(backend, "subtract", &diff, &expected, 1e-12);

    assert!(
        backend.matmul(&a, &a).is_err(),
        "[{}] matmul with mismatched inner dimensions must fail",
        backend.name()
    );
    assert!(
        backend.add(&a, &product).is_err(),
        "[{}] add with mismatched shapes must fail",
        backend.name()
    );
}

fn check_eigendecomposition<B: DerivedOps + ?Sized>(backend: &B) {
    let fixture: Vec<&[f64]> = EIGEN_FIXTURE.iter().map(|r| r.as_slice()).collect();
    let a = rows(backend, &fixture);
    let eig = ok(backend, "eigendecompose", backend.eigendecompose(&a));

    let values = ok(
        backend,
        "diagonal_elements",
        backend.diagonal_elements(&eig.eigenvalues),
    );
    assert_eq!(values.len(), 3, "[{}] eigenvalue count", backend.name());
    for (got, want) in values.iter().zip(EIGEN_FIXTURE_VALUES) {
        assert!(
            (got - want).abs() < 1e-3,
            "[{}] eigenvalue {} expected {}",
            backend.name(),
            got,
            want
        );
    }
    for i in 0..3 {
        for j in (0..3).filter(|&j| j != i) {
            let off = ok(backend, "get", backend.get(&eig.eigenvalues, i, j));
            assert!(
                off.abs() < 1e-9,
                "[{}] eigenvalue matrix is not diagonal",
                backend.name()
            );
        }
    }

    let v = &eig.eigenvectors;
    for p in 0..3 {
        for q in p..3 {
            let expected = if p == q { 1.0 } else { 0.0 };
            let dot = dot_columns(backend, v, p, q);
            assert!(
                (dot - expected).abs() < 1e-3,
                "[{}] eigenvectors {} and {} are not orthonormal: {}",
                backend.name(),
                p,
                q,
                dot
            );
        }
    }

    for (col, reference) in EIGEN_FIXTURE_VECTORS.iter().enumerate() {
        let mut dot = 0.0;
        for (i, r) in reference.iter().enumerate() {
            dot += r * ok(backend, "get", backend.get(v, i, col));
        }
        assert!(
            (dot.abs() - 1.0).abs() < 1e-3,
            "[{}] eigenvector {} has the wrong orientation",
            backend.name(),
            col
        );
    }
}

/// Check distances and both projections on fixed and seeded random data
///
/// Projections are compared through their recomputed squared distances, so
/// the unspecified sign of each eigenvector does not matter.
pub fn check_metric_projection<B: DerivedOps + ?Sized>(backend: &B) {
    let x = rows(backend, &[&[1.0, 2.0], &[4.0, 3.0], &[0.0, 1.0]]);
    let d = ok(backend, "squared_distances", squared_distances(backend, &x));
    let expected = rows(
        backend,
        &[&[0.0, 10.0, 2.0], &[10.0, 0.0, 20.0], &[2.0, 20.0, 0.0]],
    );
    assert_matrix_close(backend, "squared_distances", &d, &expected, 1e-9);

    let proj = ok(
        backend,
        "project_to_variance_ratio",
        project_to_variance_ratio(backend, &d, 0.99),
    );
    let dd = ok(backend, "squared_distances", squared_distances(backend, &proj));
    assert_matrix_close(backend, "project_to_variance_ratio(0.99)", &dd, &d, 1e-5);

    let proj = ok(backend, "project_to_dimension", project_to_dimension(backend, &d, 2));
    let dd = ok(backend, "squared_distances", squared_distances(backend, &proj));
    assert_matrix_close(backend, "project_to_dimension(2)", &dd, &d, 1e-5);

    let mut rng = StdRng::seed_from_u64(42);
    let x = ok(
        backend,
        "create_random_uniform_with",
        backend.create_random_uniform_with(10, 5, -10.0, 10.0, &mut rng),
    );
    let d = ok(backend, "squared_distances", squared_distances(backend, &x));

    let proj = ok(
        backend,
        "project_to_variance_ratio",
        project_to_variance_ratio(backend, &d, 1.0),
    );
    let dd = ok(backend, "squared_distances", squared_distances(backend, &proj));
    assert_matrix_close(backend, "project_to_variance_ratio(1.0)", &dd, &d, 1e-5);

    let proj = ok(
        backend,
        "project_to_variance_ratio",
        project_to_variance_ratio(backend, &d, 0.8),
    );
    let dd = ok(backend, "squared_distances", squared_distances(backend, &proj));
    assert_matrix_close(backend, "project_to_variance_ratio(0.8)", &dd, &d, 5e2);

    let proj = ok(backend, "project_to_dimension", project_to_dimension(backend, &d, 10));
    let dd = ok(backend, "squared_distances", squared_distances(backend, &proj));
    assert_matrix_close(backend, "project_to_dimension(10)", &dd, &d, 1e-5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_cpu_backend_conforms() {
        let backend = CpuBackend::new();
        check_matrix_backend(&backend);
        check_metric_projection(&backend);
    }

    #[test]
    #[should_panic(expected = "[primitive-free] create failed")]
    fn test_missing_primitive_is_reported() {
        use crate::backend::{DenseMatrix, MatrixBackend};

        struct Empty;

        impl MatrixBackend for Empty {
            type Matrix = DenseMatrix;

            fn name(&self) -> &'static str {
                "primitive-free"
            }
        }

        impl DerivedOps for Empty {}

        check_matrix_backend(&Empty);
    }
}
