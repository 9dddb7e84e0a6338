//! # mdsr
//!
//! **Classical (metric) multidimensional scaling over pluggable matrix backends.**
//!
//! mdsr recovers point coordinates from a matrix of squared pairwise
//! distances. The algorithm is written once against a small set of matrix
//! primitives; any backend that supplies them can run it.
//!
//! ## Why mdsr?
//!
//! - **Analytic**: double-centering plus one symmetric eigendecomposition, no
//!   iterative optimisation
//! - **Backend-agnostic**: algorithms are generic over [`backend::DerivedOps`]
//! - **Explicit**: every algorithm takes its backend as an argument; the
//!   registry is only a convenience for choosing one
//! - **Pure Rust**: the built-in CPU backend needs no BLAS or LAPACK
//!
//! ## Quick Start
//!
//! ```rust
//! use mdsr::prelude::*;
//! use mdsr::algorithm::{project_to_variance_ratio, squared_distances};
//!
//! let backend = CpuBackend::new();
//! let x = backend.create_from_rows(&[vec![1.0, 2.0], vec![4.0, 3.0], vec![0.0, 1.0]])?;
//!
//! let d = squared_distances(&backend, &x)?;
//! let embedding = project_to_variance_ratio(&backend, &d, 0.99)?;
//! assert_eq!(backend.shape(&embedding)?, (3, 2));
//! # Ok::<(), mdsr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded matrix products in the CPU backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod backend;
pub mod conformance;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::EigenDecomposition;
    pub use crate::backend::{
        BackendRegistry, CpuBackend, DenseMatrix, DerivedOps, JacobiConfig, MatrixBackend,
        SharedBackend,
    };
    pub use crate::error::{Error, Result};
}
