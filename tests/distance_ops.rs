//! Integration tests for pairwise squared distances
//!
//! Tests verify:
//! - Known three-point scenario
//! - Symmetry and zero diagonal on random observations
//! - Agreement with a direct per-pair computation
//! - Degenerate shapes: one observation, zero-dimensional observations

use mdsr::algorithm::squared_distances;
use mdsr::prelude::*;

mod common;

use common::{assert_allclose_f64, create_cpu_backend, flatten, matrix, random_observations};

#[test]
fn test_three_points() {
    let backend = create_cpu_backend();
    let x = matrix(&backend, &[&[1.0, 2.0], &[4.0, 3.0], &[0.0, 1.0]]);
    let d = squared_distances(&backend, &x).unwrap();
    assert_eq!(
        flatten(&backend, &d),
        vec![0.0, 10.0, 2.0, 10.0, 0.0, 20.0, 2.0, 20.0, 0.0]
    );
}

#[test]
fn test_symmetric_with_zero_diagonal() {
    let backend = create_cpu_backend();
    let x = random_observations(&backend, 25, 7, 3);
    let d = squared_distances(&backend, &x).unwrap();
    let dt = backend.transpose(&d).unwrap();
    assert_allclose_f64(&flatten(&backend, &d), &flatten(&backend, &dt), 0.0, 0.0, "D vs D^T");
    for v in backend.diagonal_elements(&d).unwrap() {
        assert!(v.abs() < 1e-10, "diagonal element {}", v);
    }
}

#[test]
fn test_matches_direct_computation() {
    let backend = create_cpu_backend();
    let x = random_observations(&backend, 12, 4, 9);
    let d = squared_distances(&backend, &x).unwrap();

    let rows = backend.as_rows(&x).unwrap();
    let mut expected = Vec::with_capacity(rows.len() * rows.len());
    for a in &rows {
        for b in &rows {
            expected.push(a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum::<f64>());
        }
    }
    assert_allclose_f64(&flatten(&backend, &d), &expected, 1e-12, 1e-10, "direct");
}

#[test]
fn test_single_observation() {
    let backend = create_cpu_backend();
    let x = matrix(&backend, &[&[5.0, -1.0, 0.5]]);
    let d = squared_distances(&backend, &x).unwrap();
    assert_eq!(backend.shape(&d).unwrap(), (1, 1));
    assert_eq!(backend.get(&d, 0, 0).unwrap(), 0.0);
}

#[test]
fn test_zero_dimensional_observations() {
    let backend = create_cpu_backend();
    let x = backend.create(4, 0, 0.0).unwrap();
    let d = squared_distances(&backend, &x).unwrap();
    assert_eq!(backend.shape(&d).unwrap(), (4, 4));
    assert!(flatten(&backend, &d).iter().all(|&v| v == 0.0));
}

#[test]
fn test_translation_invariance() {
    let backend = create_cpu_backend();
    let x = random_observations(&backend, 6, 3, 21);
    let shift = backend.create(6, 3, 100.0).unwrap();
    let shifted = backend.add(&x, &shift).unwrap();

    let d = squared_distances(&backend, &x).unwrap();
    let ds = squared_distances(&backend, &shifted).unwrap();
    assert_allclose_f64(&flatten(&backend, &ds), &flatten(&backend, &d), 0.0, 1e-8, "shifted");
}
