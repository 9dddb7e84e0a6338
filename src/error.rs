//! Error types for mdsr

use thiserror::Error;

/// Result type alias using mdsr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdsr operations
///
/// Every variant is a deterministic, programmer-facing condition. Nothing in
/// this crate retries or recovers from them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Elementwise operation on matrices of different shapes
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape `[rows, cols]`
        expected: [usize; 2],
        /// Actual shape `[rows, cols]`
        got: [usize; 2],
    },

    /// Matrix product with non-conforming inner dimensions
    #[error("Cannot multiply {lhs:?} by {rhs:?}: inner dimensions differ")]
    MatmulShapeMismatch {
        /// Left-hand side shape `[rows, cols]`
        lhs: [usize; 2],
        /// Right-hand side shape `[rows, cols]`
        rhs: [usize; 2],
    },

    /// Element access outside the matrix
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows in the matrix
        rows: usize,
        /// Number of columns in the matrix
        cols: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// No backend has been made active
    #[error("No active backend: push or set one before running matrix operations")]
    NoActiveBackend,

    /// No backend matches the preferences and none is registered at all
    #[error("No backend available: no backend has been registered")]
    NoBackendAvailable,

    /// A backend does not provide a required operation
    #[error("Not implemented: backend '{backend}' does not provide '{operation}'")]
    NotImplemented {
        /// Name of the backend
        backend: &'static str,
        /// Name of the missing operation
        operation: &'static str,
    },

    /// Backend-specific error
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            expected: [expected.0, expected.1],
            got: [got.0, got.1],
        }
    }

    /// Create a matmul shape mismatch error
    pub fn matmul_mismatch(lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self::MatmulShapeMismatch {
            lhs: [lhs.0, lhs.1],
            rhs: [rhs.0, rhs.1],
        }
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: (usize, usize), shape: (usize, usize)) -> Self {
        Self::IndexOutOfBounds {
            row: index.0,
            col: index.1,
            rows: shape.0,
            cols: shape.1,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(backend: &'static str, operation: &'static str) -> Self {
        Self::NotImplemented { backend, operation }
    }
}
