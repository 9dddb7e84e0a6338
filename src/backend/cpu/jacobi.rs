//! Cyclic Jacobi eigensolver for real symmetric matrices
//!
//! Rotation parameters use the numerically stable LAPACK formula to avoid
//! catastrophic cancellation. All buffers are row-major `n x n`.

use tracing::{trace, warn};

/// Convergence settings for the Jacobi eigensolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiConfig {
    /// Upper bound on full sweeps over the off-diagonal
    pub max_sweeps: usize,
    /// Relative tolerance; the iteration stops once every off-diagonal
    /// element is at most `n * tolerance * ||A||_F`
    pub tolerance: f64,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 30,
            tolerance: f64::EPSILON,
        }
    }
}

/// Eigenpairs sorted by eigenvalue, largest first
///
/// `vectors` is row-major `n x n`; column `i` belongs to `values[i]`.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    pub values: Vec<f64>,
    pub vectors: Vec<f64>,
}

/// Jacobi rotation parameters (cosine and sine of rotation angle).
///
/// ```text
/// J = [ c  -s ]
///     [ s   c ]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JacobiRotation {
    pub c: f64,
    pub s: f64,
}

impl JacobiRotation {
    /// Rotation that zeroes the off-diagonal element of a 2x2 symmetric block.
    ///
    /// ```text
    /// τ = (a_qq - a_pp) / (2 * a_pq)
    /// t = sign(τ) / (|τ| + sqrt(1 + τ²))
    /// c = 1 / sqrt(1 + t²)
    /// s = t * c
    /// ```
    #[inline]
    pub fn compute(a_pp: f64, a_qq: f64, a_pq: f64) -> Self {
        let tau_den = 2.0 * a_pq;
        if tau_den.abs() < 1e-300 {
            return Self { c: 1.0, s: 0.0 };
        }

        let tau = (a_qq - a_pp) / tau_den;
        let t = if tau >= 0.0 {
            1.0 / (tau + (1.0 + tau * tau).sqrt())
        } else {
            -1.0 / (-tau + (1.0 + tau * tau).sqrt())
        };

        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: t * c }
    }
}

/// `[col_p', col_q'] = [col_p, col_q] @ [[c, s], [-s, c]]`
#[inline]
fn rotate_columns(data: &mut [f64], n: usize, p: usize, q: usize, rot: JacobiRotation) {
    let JacobiRotation { c, s } = rot;
    for i in 0..n {
        let val_p = data[i * n + p];
        let val_q = data[i * n + q];
        data[i * n + p] = c * val_p - s * val_q;
        data[i * n + q] = s * val_p + c * val_q;
    }
}

/// `A' = J^T @ A @ J`, which zeroes `A[p,q]` and `A[q,p]`
#[inline]
fn rotate_two_sided(work: &mut [f64], n: usize, p: usize, q: usize, rot: JacobiRotation) {
    let JacobiRotation { c, s } = rot;
    let a_pp = work[p * n + p];
    let a_qq = work[q * n + q];
    let a_pq = work[p * n + q];

    for k in 0..n {
        if k == p || k == q {
            continue;
        }
        let a_kp = work[k * n + p];
        let a_kq = work[k * n + q];

        let new_kp = c * a_kp - s * a_kq;
        let new_kq = s * a_kp + c * a_kq;

        work[k * n + p] = new_kp;
        work[p * n + k] = new_kp;
        work[k * n + q] = new_kq;
        work[q * n + k] = new_kq;
    }

    let (c2, s2, cs2) = (c * c, s * s, 2.0 * c * s);
    work[p * n + p] = c2 * a_pp - cs2 * a_pq + s2 * a_qq;
    work[q * n + q] = s2 * a_pp + cs2 * a_pq + c2 * a_qq;
    work[p * n + q] = 0.0;
    work[q * n + p] = 0.0;
}

fn max_off_diagonal(work: &[f64], n: usize) -> f64 {
    let mut max = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            max = max.max(work[i * n + j].abs());
        }
    }
    max
}

/// Indices that sort `values` descending by signed value
fn argsort_desc(values: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&i, &j| {
        values[j]
            .partial_cmp(&values[i])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Reorder the columns of a row-major `n x n` matrix
fn permute_columns(data: &[f64], n: usize, indices: &[usize]) -> Vec<f64> {
    let mut result = vec![0.0; n * n];
    for (new_idx, &old_idx) in indices.iter().enumerate() {
        for i in 0..n {
            result[i * n + new_idx] = data[i * n + old_idx];
        }
    }
    result
}

/// Eigendecomposition of the symmetric part of `a` (lower triangle is read)
///
/// 1. V = I
/// 2. Sweep every pair (p, q), p < q, rotating away `A[p,q]` and
///    accumulating `V = V @ J`, until the largest off-diagonal element is
///    within tolerance or `max_sweeps` is exhausted
/// 3. Eigenvalues are the diagonal; sort them descending and permute the
///    columns of V to match
pub fn eig_symmetric(a: &[f64], n: usize, config: &JacobiConfig) -> SymmetricEigen {
    debug_assert_eq!(a.len(), n * n);

    let mut work = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let val = a[i * n + j];
            work[i * n + j] = val;
            work[j * n + i] = val;
        }
    }

    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    let frobenius = work.iter().map(|x| x * x).sum::<f64>().sqrt();
    let tol = (n as f64) * config.tolerance * frobenius;

    let mut sweeps = 0;
    loop {
        let off = max_off_diagonal(&work, n);
        if off <= tol {
            trace!(n, sweeps, off, "jacobi converged");
            break;
        }
        if sweeps == config.max_sweeps {
            warn!(
                n,
                sweeps,
                off,
                tol,
                "jacobi eigensolver hit the sweep limit before converging"
            );
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let a_pq = work[p * n + q];
                if a_pq.abs() <= tol {
                    continue;
                }
                let rot = JacobiRotation::compute(work[p * n + p], work[q * n + q], a_pq);
                rotate_two_sided(&mut work, n, p, q, rot);
                rotate_columns(&mut v, n, p, q, rot);
            }
        }
        sweeps += 1;
    }

    let diagonal: Vec<f64> = (0..n).map(|i| work[i * n + i]).collect();
    let order = argsort_desc(&diagonal);

    SymmetricEigen {
        values: order.iter().map(|&i| diagonal[i]).collect(),
        vectors: permute_columns(&v, n, &order),
    }
}
