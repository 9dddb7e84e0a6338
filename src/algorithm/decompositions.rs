//! Decomposition result types

/// Eigendecomposition of a real symmetric matrix: `A = V @ Λ @ V^T`
///
/// Contract every backend must honour:
/// - `eigenvalues` (Λ) is a square diagonal matrix whose diagonal is sorted
///   non-increasing by signed value (negative eigenvalues come last)
/// - `eigenvectors` (V) has orthonormal columns: `V^T @ V = I`
/// - column `i` of V is the eigenvector for `Λ[i, i]`
/// - the sign of each eigenvector is unspecified
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition<M> {
    /// Diagonal matrix of eigenvalues Λ `[n, n]`
    pub eigenvalues: M,

    /// Eigenvector matrix V `[n, n]`, one eigenvector per column
    pub eigenvectors: M,
}
