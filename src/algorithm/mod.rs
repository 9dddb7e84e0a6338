//! Classical multidimensional scaling, written against the backend traits
//!
//! Every algorithm here is generic over [`DerivedOps`](crate::backend::DerivedOps)
//! and takes the backend as its first argument. Nothing reads ambient state,
//! so the same code runs on any backend, and two backends can be used side by
//! side in the same process.
//!
//! # Pipeline
//!
//! ```text
//! observations X [n, d]
//!   └── squared_distances ──► D [n, n]
//!         ├── project_to_dimension(D, dims)   ──► [n, dims]
//!         └── project_to_variance_ratio(D, k) ──► [n, dims(k)]
//! ```

pub mod decompositions;
pub mod distance;
pub mod mds;

pub use decompositions::EigenDecomposition;
pub use distance::squared_distances;
pub use mds::{
    double_center, project_eigenpairs, project_to_dimension, project_to_variance_ratio,
    select_dimensionality, variance_ratio_dimensions,
};
