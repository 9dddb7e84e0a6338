//! Dense kernels for the CPU backend

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parallelization threshold in multiply-adds: below this Rayon costs more than it saves
#[cfg(feature = "rayon")]
const PARALLEL_THRESHOLD: usize = 1 << 15;

/// `out[m, n] = a[m, k] @ b[k, n]`; `out` must be zeroed
pub fn matmul(a: &[f64], b: &[f64], out: &mut [f64], m: usize, k: usize, n: usize) {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(out.len(), m * n);

    if out.is_empty() {
        return;
    }

    #[cfg(feature = "rayon")]
    if m * k * n >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, row)| matmul_row(&a[i * k..(i + 1) * k], b, row, n));
        return;
    }

    for (i, row) in out.chunks_mut(n).enumerate() {
        matmul_row(&a[i * k..(i + 1) * k], b, row, n);
    }
}

/// One output row: `row = a_row @ b`, accumulated in i-k-j order
#[inline]
fn matmul_row(a_row: &[f64], b: &[f64], row: &mut [f64], n: usize) {
    for (p, &a_ip) in a_row.iter().enumerate() {
        let b_row = &b[p * n..(p + 1) * n];
        for (acc, &b_pj) in row.iter_mut().zip(b_row) {
            *acc += a_ip * b_pj;
        }
    }
}

/// `out[j, i] = a[i, j]` for `a` of shape `[rows, cols]`
pub fn transpose(a: &[f64], out: &mut [f64], rows: usize, cols: usize) {
    for i in 0..rows {
        for j in 0..cols {
            out[j * rows + i] = a[i * cols + j];
        }
    }
}

/// Elementwise `out = op(a, b)`
#[inline]
pub fn binary(a: &[f64], b: &[f64], op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_2x3_3x2() {
        let a = [2.0, 3.0, 4.0, 1.0, 2.0, 3.0];
        let b = [3.0, 1.0, 1.0, 2.0, 3.0, -4.0];
        let mut out = [0.0; 4];
        matmul(&a, &b, &mut out, 2, 3, 2);
        assert_eq!(out, [21.0, -8.0, 14.0, -7.0]);
    }

    #[test]
    fn test_matmul_empty_inner_dimension_is_zero() {
        let mut out = [0.0; 4];
        matmul(&[], &[], &mut out, 2, 0, 2);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn test_matmul_large_matches_naive() {
        let (m, k, n) = (40, 30, 35);
        let a: Vec<f64> = (0..m * k).map(|x| (x % 7) as f64 - 3.0).collect();
        let b: Vec<f64> = (0..k * n).map(|x| (x % 5) as f64 * 0.5).collect();
        let mut out = vec![0.0; m * n];
        matmul(&a, &b, &mut out, m, k, n);

        for i in 0..m {
            for j in 0..n {
                let expected: f64 = (0..k).map(|p| a[i * k + p] * b[p * n + j]).sum();
                assert!((out[i * n + j] - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_transpose() {
        let a = [2.0, 3.0, 4.0, 1.0, 2.0, 3.0];
        let mut out = [0.0; 6];
        transpose(&a, &mut out, 2, 3);
        assert_eq!(out, [2.0, 1.0, 3.0, 2.0, 4.0, 3.0]);
    }
}
