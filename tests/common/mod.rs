//! Common test utilities
#![allow(dead_code)]

use mdsr::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Create the built-in CPU backend for testing
pub fn create_cpu_backend() -> CpuBackend {
    CpuBackend::new()
}

/// Build a matrix from nested row slices
pub fn matrix<B: DerivedOps + ?Sized>(backend: &B, rows: &[&[f64]]) -> B::Matrix {
    let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
    backend.create_from_rows(&rows).unwrap()
}

/// `n` observations of dimension `d`, uniform in `[-10, 10]`, reproducible from `seed`
pub fn random_observations<B: DerivedOps + ?Sized>(
    backend: &B,
    n: usize,
    d: usize,
    seed: u64,
) -> B::Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    backend
        .create_random_uniform_with(n, d, -10.0, 10.0, &mut rng)
        .unwrap()
}

/// Row-major copy of a matrix
pub fn flatten<B: DerivedOps + ?Sized>(backend: &B, m: &B::Matrix) -> Vec<f64> {
    backend.as_rows(m).unwrap().into_iter().flatten().collect()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two matrices have the same shape and close elements
pub fn assert_matrix_allclose<B: DerivedOps + ?Sized>(
    backend: &B,
    a: &B::Matrix,
    b: &B::Matrix,
    atol: f64,
    msg: &str,
) {
    assert_eq!(
        backend.shape(a).unwrap(),
        backend.shape(b).unwrap(),
        "{}: shape mismatch",
        msg
    );
    assert_allclose_f64(&flatten(backend, a), &flatten(backend, b), 0.0, atol, msg);
}
